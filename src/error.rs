use thiserror::Error;

/// Errors surfaced by the quiz core and its host
#[derive(Debug, Error)]
pub enum QuizError {
    /// A caller-side precondition was violated (empty pool, bad bounds, bad answer)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("stats database error: {0}")]
    Stats(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("kana data error: {0}")]
    Data(#[from] serde_json::Error),

    #[error("csv export error: {0}")]
    Export(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, QuizError>;

impl QuizError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        QuizError::InvalidArgument(msg.into())
    }
}
