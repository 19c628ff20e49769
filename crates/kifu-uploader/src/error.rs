//! Uploader error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Configuration error: {0}")]
    Config(&'static str),

    #[error("Invalid arguments: {0}")]
    Args(String),

    #[error("Path does not exist: {0}")]
    MissingPath(String),

    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Kifu(#[from] kifu_core::KifuError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
