use std::fmt;

/// One `/`-delimited chunk of a registered pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal bytes, never starting with `:` or `*`.
    Static(Box<str>),
    /// `:name` — matches exactly one path segment.
    CaptureOne(Box<str>),
    /// `*name` — matches the remainder of the path, including slashes.
    CaptureRest(Box<str>),
}

impl Segment {
    pub fn parse(raw: &str) -> Segment {
        match raw.as_bytes().first() {
            Some(b':') => Segment::CaptureOne(raw[1..].into()),
            Some(b'*') => Segment::CaptureRest(raw[1..].into()),
            _ => Segment::Static(raw.into()),
        }
    }

    pub fn is_wildcard(&self) -> bool {
        !matches!(self, Segment::Static(_))
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Segment::Static(_) => None,
            Segment::CaptureOne(name) | Segment::CaptureRest(name) => Some(name),
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Static(s) => write!(f, "{s}"),
            Segment::CaptureOne(name) => write!(f, ":{name}"),
            Segment::CaptureRest(name) => write!(f, "*{name}"),
        }
    }
}
