use thiserror::Error;

#[derive(Debug, Error)]
pub enum PatternError {
    #[error(
        "capture-rest segment '*{name}' must be the last segment of pattern '{pattern}' (found at segment {index} of {total})"
    )]
    CaptureRestNotLast {
        pattern: String,
        name: String,
        index: usize,
        total: usize,
    },
    #[error("capture segment in pattern '{pattern}' is missing a name")]
    MissingCaptureName { pattern: String },
}

pub type PatternResult<T> = Result<T, PatternError>;
