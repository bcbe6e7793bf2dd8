use thiserror::Error;

#[derive(Error, Debug)]
pub enum VakilError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("PDF extraction error: {0}")]
    ExtractionError(String),

    #[error("PDF render error: {0}")]
    RenderError(String),

    #[error("Mail error: {0}")]
    MailError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Model error: {0}")]
    ModelError(String),
}

impl From<&str> for VakilError {
    fn from(error: &str) -> Self {
        VakilError::ConfigError(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, VakilError>;
