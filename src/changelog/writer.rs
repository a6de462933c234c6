use std::path::Path;

use crate::error::{ChangelogError, Result};

/// Destination for rendered changelogs.
pub trait ReportWriter {
    fn write(&self, path: &Path, content: &str) -> Result<()>;
}

/// Writes to the local file system, creating missing parent directories.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsWriter;

impl ReportWriter for FsWriter {
    fn write(&self, path: &Path, content: &str) -> Result<()> {
        let output_error = |source| ChangelogError::Output {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(output_error)?;
        }
        std::fs::write(path, content).map_err(output_error)
    }
}
