use thiserror::Error;

/// Main error type for HAN decoding operations
#[derive(Error, Debug)]
pub enum HanError {
    #[error("Connection error: {0}")]
    Connection(#[from] std::io::Error),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Frame invalid: {0}")]
    FrameInvalid(String),
}

/// Result type alias for HAN decoding operations
pub type HanResult<T> = Result<T, HanError>;
