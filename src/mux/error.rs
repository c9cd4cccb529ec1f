use thiserror::Error;

use crate::path::PathError;
use crate::radix::RadixError;

#[derive(Debug, Error)]
pub enum MuxError {
    #[error(transparent)]
    Radix(#[from] RadixError),
    #[error(transparent)]
    Path(#[from] PathError),
    #[error(
        "duplicate registration: method {method} already has a handler bound to pattern '{pattern}'"
    )]
    DuplicateRegistration { method: String, pattern: String },
    #[error("mux is sealed; cannot {operation} after seal()")]
    AlreadySealed { operation: &'static str },
    #[error("mux is not sealed; cannot serve requests before seal()")]
    NotSealed,
}

pub type MuxResult<T> = Result<T, MuxError>;
