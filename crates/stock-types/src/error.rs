use thiserror::Error;

/// Errors produced while encoding or decoding stock documents.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("malformed stock document: {0}")]
    Malformed(String),

    #[error("stock document root must be an object, found {found}")]
    InvalidRoot { found: &'static str },

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for TypeError {
    fn from(e: serde_json::Error) -> Self {
        if e.is_data() || e.is_syntax() || e.is_eof() {
            TypeError::Malformed(e.to_string())
        } else {
            TypeError::Serialization(e.to_string())
        }
    }
}

/// Result alias for type-level operations.
pub type Result<T> = std::result::Result<T, TypeError>;
