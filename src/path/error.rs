use thiserror::Error;

#[derive(Debug, Error)]
pub enum PathError {
    #[error("path '{input}' has a truncated percent-escape at byte offset {offset}")]
    TruncatedPercentEscape { input: String, offset: usize },
    #[error(
        "path '{input}' has a non-hex-digit percent-escape '%{a}{b}' at byte offset {offset}"
    )]
    InvalidPercentEscape {
        input: String,
        offset: usize,
        a: char,
        b: char,
    },
}

pub type PathResult<T> = Result<T, PathError>;
