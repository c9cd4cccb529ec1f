use thiserror::Error;

use crate::pattern::PatternError;

#[derive(Debug, Error)]
pub enum RadixError {
    #[error(transparent)]
    Pattern(#[from] PatternError),
    #[error(
        "parameter name conflict at a shared path: existing capture is ':{existing}', new pattern wants ':{found}'"
    )]
    ConflictingParamName { existing: String, found: String },
    #[error(
        "parameter kind conflict at a shared path: node already has a {existing} child, new pattern wants a {found} child"
    )]
    ConflictingParamKind {
        existing: &'static str,
        found: &'static str,
    },
    #[error("tree has already been optimized; further Add calls are rejected")]
    AlreadyOptimized,
    #[error("tree has already been optimized; Optimize may run only once")]
    OptimizeAlreadyRan,
}

pub type RadixResult<T> = Result<T, RadixError>;
