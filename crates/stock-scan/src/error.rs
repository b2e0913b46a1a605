use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    /// The scanner was closed and cannot produce further events.
    #[error("scanner is closed")]
    Closed,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ScanError>;
