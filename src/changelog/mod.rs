pub mod collectors;
pub mod entities;
pub mod extract;
pub mod pipeline;
pub mod report;
pub mod writer;

pub use pipeline::ChangelogPipeline;
pub use report::{OutputFormat, ReportGenerator};
pub use writer::FsWriter;
