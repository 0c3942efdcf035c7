use thiserror::Error;

#[derive(Error, Debug)]
pub enum MergedListrError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("GitLab rejected the credentials (status {status}): {message}")]
    Auth { status: u16, message: String },

    #[error("GitLab API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MergedListrError>;
