/// Errors raised by the tagger and its model provider.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Empty observation sequence or empty tag set
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    /// Malformed model tables
    #[error("invalid model: {0}")]
    InvalidModel(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed model file: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
