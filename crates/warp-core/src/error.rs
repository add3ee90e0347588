use thiserror::Error;

#[derive(Debug, Error)]
pub enum WarpError {
    #[error("Codec error: {0}")]
    Codec(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, WarpError>;
