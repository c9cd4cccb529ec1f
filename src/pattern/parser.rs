use super::segment::Segment;
use super::{PatternError, PatternResult};

/// Splits a pattern into its raw `/`-delimited segments and validates that a
/// capture-rest segment, if present, is the last one.
///
/// Segments are returned in raw form — consecutive static segments are
/// *not* joined here. Fusing consecutive static segments into one compound
/// node path is a radix-tree insertion concern (new nodes join a run of
/// static tokens, but a wildcard token always gets its own node), not a
/// property of the pattern string itself.
pub fn parse_pattern(pattern: &str) -> PatternResult<Vec<Segment>> {
    let raw: Vec<Segment> = pattern.split('/').map(Segment::parse).collect();

    for (index, segment) in raw.iter().enumerate() {
        match segment {
            Segment::CaptureOne(name) | Segment::CaptureRest(name) if name.is_empty() => {
                return Err(PatternError::MissingCaptureName {
                    pattern: pattern.to_string(),
                });
            }
            Segment::CaptureRest(name) if index + 1 != raw.len() => {
                return Err(PatternError::CaptureRestNotLast {
                    pattern: pattern.to_string(),
                    name: name.to_string(),
                    index,
                    total: raw.len(),
                });
            }
            _ => {}
        }
    }

    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_pattern_is_a_single_static_segment() {
        let segments = parse_pattern("").unwrap();
        assert_eq!(segments, vec![Segment::Static("".into())]);
    }

    #[test]
    fn root_pattern_splits_into_two_empty_segments() {
        let segments = parse_pattern("/").unwrap();
        assert_eq!(
            segments,
            vec![Segment::Static("".into()), Segment::Static("".into())]
        );
    }

    #[test]
    fn segments_are_kept_raw_not_fused() {
        let segments = parse_pattern("/pkg/:first/:second/*rest").unwrap();
        assert_eq!(
            segments,
            vec![
                Segment::Static("".into()),
                Segment::Static("pkg".into()),
                Segment::CaptureOne("first".into()),
                Segment::CaptureOne("second".into()),
                Segment::CaptureRest("rest".into()),
            ]
        );
    }

    #[test]
    fn capture_rest_not_last_is_rejected() {
        let err = parse_pattern("/a/*rest/tail").unwrap_err();
        assert!(matches!(err, PatternError::CaptureRestNotLast { .. }));
    }

    #[test]
    fn missing_capture_name_is_rejected() {
        let err = parse_pattern("/a/:").unwrap_err();
        assert!(matches!(err, PatternError::MissingCaptureName { .. }));
    }
}
