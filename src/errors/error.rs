use thiserror::Error;

use crate::mux::MuxError;
use crate::path::PathError;
use crate::pattern::PatternError;
use crate::radix::RadixError;

use super::codes::RouterErrorCode;

/// The crate's umbrella error type. Each module raises its own `thiserror` enum
/// (`PatternError`, `RadixError`, `PathError`, `MuxError`); this type composes them via
/// `#[from]` so a host driving the crate end-to-end (through [`Mux`](crate::mux::Mux))
/// only has to match on one type, while a caller using `radix::Tree` or `path`
/// standalone still gets the precise, narrower error from that module.
#[derive(Debug, Error)]
pub enum RouterError {
    #[error(transparent)]
    Pattern(#[from] PatternError),
    #[error(transparent)]
    Radix(#[from] RadixError),
    #[error(transparent)]
    Path(#[from] PathError),
    #[error(transparent)]
    Mux(#[from] MuxError),
}

impl RouterError {
    /// The stable wire code for this error, see [`RouterErrorCode`].
    pub fn code(&self) -> RouterErrorCode {
        match self {
            RouterError::Pattern(e) => pattern_code(e),
            RouterError::Radix(e) => radix_code(e),
            RouterError::Path(e) => path_code(e),
            RouterError::Mux(e) => mux_code(e),
        }
    }
}

fn pattern_code(e: &PatternError) -> RouterErrorCode {
    match e {
        PatternError::CaptureRestNotLast { .. } => RouterErrorCode::CaptureRestNotLast,
        PatternError::MissingCaptureName { .. } => RouterErrorCode::MissingCaptureName,
    }
}

fn radix_code(e: &RadixError) -> RouterErrorCode {
    match e {
        RadixError::Pattern(e) => pattern_code(e),
        RadixError::ConflictingParamName { .. } => RouterErrorCode::ConflictingParamName,
        RadixError::ConflictingParamKind { .. } => RouterErrorCode::ConflictingParamKind,
        RadixError::AlreadyOptimized => RouterErrorCode::TreeAlreadyOptimized,
        RadixError::OptimizeAlreadyRan => RouterErrorCode::TreeOptimizeAlreadyRan,
    }
}

fn path_code(e: &PathError) -> RouterErrorCode {
    match e {
        PathError::TruncatedPercentEscape { .. } => RouterErrorCode::TruncatedPercentEscape,
        PathError::InvalidPercentEscape { .. } => RouterErrorCode::InvalidPercentEscape,
    }
}

fn mux_code(e: &MuxError) -> RouterErrorCode {
    match e {
        MuxError::Radix(e) => radix_code(e),
        MuxError::Path(e) => path_code(e),
        MuxError::DuplicateRegistration { .. } => RouterErrorCode::DuplicateRegistration,
        MuxError::AlreadySealed { .. } => RouterErrorCode::MuxAlreadySealed,
        MuxError::NotSealed => RouterErrorCode::MuxNotSealed,
    }
}

pub type RouterResult<T> = Result<T, RouterError>;
