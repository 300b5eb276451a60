use thiserror::Error;

#[derive(Error, Debug)]
pub enum DBError {
    #[error(transparent)]
    InMemoryError(#[from] InMemoryError),
    #[error("unknown product")]
    UnknownProduct,
    #[error("unknown sync status: {0}")]
    UnknownStatus(String),
}

#[derive(Error, Debug)]
pub enum InMemoryError {
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("failed to read with serde: {0}")]
    SerdeError(#[from] serde_json::error::Error),
}
