use parley_client::ClientError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Thread not found: {0}")]
    ThreadNotFound(String),

    #[error("A send is already in flight for thread {0}")]
    SendInFlight(String),

    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    #[error("Expected a JSON object")]
    NotAnObject,

    #[error("Invalid number: {0}")]
    InvalidNumber(String),

    #[error(transparent)]
    Backend(#[from] ClientError),

    #[error("Settings storage error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;
