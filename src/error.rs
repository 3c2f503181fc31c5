// Error taxonomy for report composition and output.
//
// Missing optional data is never an error here: composers fall back to
// placeholders. Only the parameter boundary, the rendering backend and the
// filesystem can fail.
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    /// A recognized parameter key holds a value of the wrong shape.
    #[error("parameter '{key}' is malformed: expected {expected}, found {found}")]
    MalformedParameter {
        key: &'static str,
        expected: &'static str,
        found: String,
    },

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("failed to write report to {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to load records from {}: {message}", path.display())]
    Load { path: PathBuf, message: String },
}

impl ReportError {
    pub(crate) fn malformed(key: &'static str, expected: &'static str, found: impl ToString) -> Self {
        ReportError::MalformedParameter {
            key,
            expected,
            found: found.to_string(),
        }
    }

    pub(crate) fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ReportError::Storage {
            path: path.into(),
            source,
        }
    }
}

/// Failure raised by a rendering backend while materializing a block tree.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("text rendering failed: {0}")]
    Text(#[from] std::fmt::Error),
}
