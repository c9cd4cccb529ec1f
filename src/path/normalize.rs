use std::borrow::Cow;

use super::PathResult;
use super::error::PathError;

/// Selects one of the four request-path normalization modes a [`Mux`](crate::mux::Mux)
/// can be built with: which axis is `UseEncodedPath` and which is `CleanPath` in the
/// source matrix, reproduced here as a pair of booleans rather than four named variants
/// so a host can flip either independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NormalizeOptions {
    /// `true`: feed the matcher the percent-escaped path exactly as received (no
    /// percent-decoding; `%2F` stays three literal bytes, never a `/` separator).
    /// `false`: percent-decode first (`%2F` becomes a literal `/` byte, indistinguishable
    /// from a real segment boundary).
    pub use_encoded_path: bool,
    /// Lexically clean the selected path (collapse `.`, `..`, and repeated `/`) before
    /// it reaches the trie, mirroring `net/http`'s `CleanPath` family.
    pub clean_path: bool,
}

/// Normalizes a raw, possibly percent-escaped request path per `options`, implementing
/// the four-mode matrix: `(use_encoded_path, clean_path) -> path fed to the matcher`.
#[tracing::instrument(level = "trace", skip(raw), fields(raw_len = raw.len() as u64))]
pub fn normalize_path<'a>(raw: &'a str, options: &NormalizeOptions) -> PathResult<Cow<'a, str>> {
    let selected = if options.use_encoded_path {
        Cow::Borrowed(raw)
    } else {
        percent_decode(raw)?
    };

    if options.clean_path {
        Ok(Cow::Owned(clean_path(&selected)))
    } else {
        Ok(selected)
    }
}

/// Percent-decodes `input`. Treats `%2F` (and any other escape) as a literal byte after
/// decoding — the caller only reaches this function when `UseEncodedPath` is off, so
/// decoded `%2F` is indistinguishable from a real `/` separator by design (spec.md §9).
fn percent_decode(input: &str) -> PathResult<Cow<'_, str>> {
    let bytes = input.as_bytes();
    if !bytes.contains(&b'%') {
        return Ok(Cow::Borrowed(input));
    }

    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'%' {
            out.push(bytes[i]);
            i += 1;
            continue;
        }

        let a = *bytes
            .get(i + 1)
            .ok_or_else(|| PathError::TruncatedPercentEscape {
                input: input.to_string(),
                offset: i,
            })?;
        let b = *bytes
            .get(i + 2)
            .ok_or_else(|| PathError::TruncatedPercentEscape {
                input: input.to_string(),
                offset: i,
            })?;
        let (hi, lo) = match (hex_digit(a), hex_digit(b)) {
            (Some(hi), Some(lo)) => (hi, lo),
            _ => {
                return Err(PathError::InvalidPercentEscape {
                    input: input.to_string(),
                    offset: i,
                    a: a as char,
                    b: b as char,
                });
            }
        };
        out.push((hi << 4) | lo);
        i += 3;
    }

    Ok(Cow::Owned(String::from_utf8_lossy(&out).into_owned()))
}

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Lexically cleans `p`: collapses repeated `/`, drops `.` elements, and resolves `..`
/// against the preceding element (a leading `..` on an absolute path is simply dropped,
/// matching `net/http`'s `CleanPath`). Preserves a leading `/` and a trailing `/`, and
/// leaves the empty pattern `""` untouched — it is a legal path distinct from `"/"`
/// (spec.md §3) and has nothing to lexically clean.
pub fn clean_path(p: &str) -> String {
    if p.is_empty() {
        return String::new();
    }

    let is_absolute = p.starts_with('/');
    let trailing_slash = p.len() > 1 && p.ends_with('/');

    let mut stack: Vec<&str> = Vec::new();
    for segment in p.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                stack.pop();
            }
            s => stack.push(s),
        }
    }

    let mut out = String::new();
    if is_absolute {
        out.push('/');
    }
    out.push_str(&stack.join("/"));
    if trailing_slash && !out.ends_with('/') {
        out.push('/');
    }
    if out.is_empty() {
        out.push('.');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_path_collapses_duplicate_slashes() {
        assert_eq!(clean_path("/a//b///c"), "/a/b/c");
    }

    #[test]
    fn clean_path_drops_dot_segments() {
        assert_eq!(clean_path("/a/./b"), "/a/b");
    }

    #[test]
    fn clean_path_resolves_dot_dot() {
        assert_eq!(clean_path("/a/b/../c"), "/a/c");
    }

    #[test]
    fn clean_path_drops_leading_dot_dot_on_absolute_path() {
        assert_eq!(clean_path("/../a"), "/a");
    }

    #[test]
    fn clean_path_preserves_trailing_slash() {
        assert_eq!(clean_path("/a/b/"), "/a/b/");
        assert_eq!(clean_path("/a/b/.."), "/a/");
    }

    #[test]
    fn clean_path_preserves_empty_distinct_from_root() {
        assert_eq!(clean_path(""), "");
    }

    #[test]
    fn percent_decode_turns_escaped_slash_into_literal_separator() {
        let options = NormalizeOptions {
            use_encoded_path: false,
            clean_path: false,
        };
        let decoded = normalize_path("/a%2Fb", &options).unwrap();
        assert_eq!(decoded, "/a/b");
    }

    #[test]
    fn use_encoded_path_keeps_escape_literal() {
        let options = NormalizeOptions {
            use_encoded_path: true,
            clean_path: false,
        };
        let decoded = normalize_path("/a%2Fb", &options).unwrap();
        assert_eq!(decoded, "/a%2Fb");
    }

    #[test]
    fn truncated_escape_is_rejected() {
        let options = NormalizeOptions::default();
        let err = normalize_path("/a%2", &options).unwrap_err();
        assert!(matches!(err, PathError::TruncatedPercentEscape { .. }));
    }

    #[test]
    fn non_hex_escape_is_rejected() {
        let options = NormalizeOptions::default();
        let err = normalize_path("/a%zz", &options).unwrap_err();
        assert!(matches!(err, PathError::InvalidPercentEscape { .. }));
    }
}
