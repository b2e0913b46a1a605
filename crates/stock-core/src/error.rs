use thiserror::Error;

use crate::entry::FormError;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("storage error: {0}")]
    Storage(#[from] stock_storage::StorageError),

    #[error("stock document error: {0}")]
    Codec(#[from] stock_types::TypeError),

    #[error(transparent)]
    Form(#[from] FormError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CoreResult<T> = Result<T, CoreError>;
