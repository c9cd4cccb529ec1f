/// A stable, wire-friendly discriminant for every leaf error case the crate can
/// produce, independent of the `Display`/`Debug` text carried by [`RouterError`](super::RouterError).
///
/// Hosts that need to serialize a failure across a process boundary (a REST error
/// body, a metrics label) should match on this code rather than on the error's
/// `Display` string, which may change wording without notice.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum RouterErrorCode {
    /// `pattern::PatternError::CaptureRestNotLast`.
    CaptureRestNotLast = 1,
    /// `pattern::PatternError::MissingCaptureName`.
    MissingCaptureName = 2,
    /// `radix::RadixError::ConflictingParamName`.
    ConflictingParamName = 3,
    /// `radix::RadixError::ConflictingParamKind`.
    ConflictingParamKind = 4,
    /// `radix::RadixError::AlreadyOptimized`.
    TreeAlreadyOptimized = 5,
    /// `radix::RadixError::OptimizeAlreadyRan`.
    TreeOptimizeAlreadyRan = 6,
    /// `path::PathError::TruncatedPercentEscape`.
    TruncatedPercentEscape = 7,
    /// `path::PathError::InvalidPercentEscape`.
    InvalidPercentEscape = 8,
    /// `mux::MuxError::DuplicateRegistration`.
    DuplicateRegistration = 9,
    /// `mux::MuxError::AlreadySealed`.
    MuxAlreadySealed = 10,
    /// `mux::MuxError::NotSealed`.
    MuxNotSealed = 11,
}

impl RouterErrorCode {
    pub fn as_u16(self) -> u16 {
        self as u16
    }
}
