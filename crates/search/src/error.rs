use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// No line compiled, or the combined disjunction was rejected.
    #[error("invalid regex `{pattern}`: {message}")]
    InvalidPattern { pattern: String, message: String },
}

impl SearchError {
    pub(crate) fn invalid(pattern: impl Into<String>, err: &regex::Error) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read document {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse document {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
