use thiserror::Error;

/// Errors surfaced by the paper catalog.
///
/// Per-file upload problems and best-effort file removal failures are not
/// errors; they are reported as warnings in the operation's report.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Upload metadata failed validation; the whole batch is rejected.
    #[error("Invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// The backing JSON collection is unreadable or malformed.
    #[error("Paper store unavailable: {0}")]
    StoreUnavailable(String),

    /// No record carries the requested ID.
    #[error("Paper {0} not found")]
    NotFound(u64),

    /// Every record ID up to and including this one has been handed out.
    #[error("No record IDs left after {0}")]
    IdsExhausted(u64),

    /// The requested file does not exist under the upload root.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// The requested path would resolve outside the upload root.
    #[error("Path rejected: {0}")]
    PathRejected(String),

    #[error("Storage IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CatalogError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}
