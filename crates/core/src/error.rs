use thiserror::Error;

pub type ReportResult<T> = Result<T, ReportError>;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Access token invalid or expired: {0}")]
    InvalidCredential(String),

    #[error("Access token lacks required permission: {0}")]
    PermissionDenied(String),

    #[error("Meta API error (code {code}): {message}")]
    Upstream { code: i64, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
