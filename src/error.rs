use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChangelogError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("milestone '{0}' is not one of the active milestones")]
    MilestoneNotFound(String),

    #[error("{operation} failed: {reason}")]
    Gateway { operation: String, reason: String },

    #[error("could not write {}: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("template error: {0}")]
    Template(String),

    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
}

impl ChangelogError {
    pub fn gateway(operation: impl Into<String>, reason: impl ToString) -> Self {
        ChangelogError::Gateway {
            operation: operation.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ChangelogError>;
