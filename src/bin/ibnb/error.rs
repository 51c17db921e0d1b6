use interval_bnb::SearchError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Search(#[from] SearchError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize result: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Input ended before a {0} was entered")]
    InputClosed(&'static str),

    #[error("Failed to install log subscriber: {0}")]
    Logging(String),
}
