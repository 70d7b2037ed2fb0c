//! HTTP Range header parsing (RFC 7233, single `bytes` range only)

/// Byte range resolved against a known file size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeRequest {
    /// Start byte position
    pub start: usize,
    /// End byte position, None means until end of file
    pub end: Option<usize>,
}

impl RangeRequest {
    /// Calculate actual end position (considering file size)
    #[inline]
    pub fn end_position(&self, file_size: usize) -> usize {
        self.end.unwrap_or_else(|| file_size.saturating_sub(1))
    }
}

/// Range header parse result
#[derive(Debug)]
pub enum RangeParseResult {
    /// Valid range request
    Valid(RangeRequest),
    /// Range not satisfiable (start >= `file_size`) - should return 416
    NotSatisfiable,
    /// No Range header or malformed (ignore, return full content)
    None,
}

/// Parse an HTTP Range header value against the file size.
///
/// Supported forms: `bytes=start-end`, `bytes=start-` and `bytes=-suffix`.
/// Multi-range requests and non-byte units are ignored (treated as no
/// header), matching how the full content is then served.
///
/// # Examples
/// ```
/// use script_runner::http::range::{parse_range_header, RangeParseResult};
///
/// let result = parse_range_header(Some("bytes=0-99"), 1000);
/// assert!(matches!(result, RangeParseResult::Valid(_)));
///
/// let result = parse_range_header(None, 1000);
/// assert!(matches!(result, RangeParseResult::None));
/// ```
pub fn parse_range_header(range_header: Option<&str>, file_size: usize) -> RangeParseResult {
    let Some(spec) = range_header.and_then(|h| h.strip_prefix("bytes=")) else {
        return RangeParseResult::None;
    };

    // Single range only; a comma means a multi-range request
    let Some((start_str, end_str)) = spec.split_once('-') else {
        return RangeParseResult::None;
    };
    if end_str.contains('-') || spec.contains(',') {
        return RangeParseResult::None;
    }

    let (start_str, end_str) = (start_str.trim(), end_str.trim());

    // Suffix form "-N": the last N bytes of the file
    if start_str.is_empty() {
        let Ok(suffix) = end_str.parse::<usize>() else {
            return RangeParseResult::None;
        };
        if suffix == 0 || file_size == 0 {
            return RangeParseResult::NotSatisfiable;
        }
        // A suffix longer than the file is clamped to the whole file
        return RangeParseResult::Valid(RangeRequest {
            start: file_size.saturating_sub(suffix),
            end: Some(file_size - 1),
        });
    }

    // Standard form "start-" or "start-end"
    let Ok(start) = start_str.parse::<usize>() else {
        return RangeParseResult::None;
    };
    if start >= file_size {
        return RangeParseResult::NotSatisfiable;
    }

    let end = if end_str.is_empty() {
        None
    } else {
        match end_str.parse::<usize>() {
            // End runs past the file: clamp to the last byte
            Ok(e) if e >= start => Some(e.min(file_size - 1)),
            Ok(_) => return RangeParseResult::NotSatisfiable,
            Err(_) => return RangeParseResult::None,
        }
    };

    RangeParseResult::Valid(RangeRequest { start, end })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid(header: &str, file_size: usize) -> RangeRequest {
        match parse_range_header(Some(header), file_size) {
            RangeParseResult::Valid(r) => r,
            other => panic!("expected Valid for '{header}', got {other:?}"),
        }
    }

    #[test]
    fn test_absent_header() {
        assert!(matches!(
            parse_range_header(None, 100),
            RangeParseResult::None
        ));
    }

    #[test]
    fn test_fixed_range() {
        let r = valid("bytes=0-9", 100);
        assert_eq!((r.start, r.end), (0, Some(9)));
        assert_eq!(r.end_position(100), 9);
    }

    #[test]
    fn test_open_ended_range() {
        let r = valid("bytes=50-", 100);
        assert_eq!((r.start, r.end), (50, None));
        assert_eq!(r.end_position(100), 99);
    }

    #[test]
    fn test_suffix_range() {
        let r = valid("bytes=-20", 100);
        assert_eq!((r.start, r.end), (80, Some(99)));
    }

    #[test]
    fn test_suffix_longer_than_file() {
        let r = valid("bytes=-500", 100);
        assert_eq!((r.start, r.end), (0, Some(99)));
    }

    #[test]
    fn test_end_clamped_to_file_size() {
        let r = valid("bytes=90-200", 100);
        assert_eq!((r.start, r.end), (90, Some(99)));
    }

    #[test]
    fn test_start_past_end_of_file() {
        assert!(matches!(
            parse_range_header(Some("bytes=200-"), 100),
            RangeParseResult::NotSatisfiable
        ));
        assert!(matches!(
            parse_range_header(Some("bytes=-0"), 100),
            RangeParseResult::NotSatisfiable
        ));
    }

    #[test]
    fn test_empty_file_has_no_satisfiable_range() {
        assert!(matches!(
            parse_range_header(Some("bytes=-5"), 0),
            RangeParseResult::NotSatisfiable
        ));
        assert!(matches!(
            parse_range_header(Some("bytes=0-"), 0),
            RangeParseResult::NotSatisfiable
        ));
    }

    #[test]
    fn test_malformed_is_ignored() {
        for header in ["bytes=a-b", "bytes=0-9,20-29", "items=0-9", "bytes=0"] {
            assert!(
                matches!(parse_range_header(Some(header), 100), RangeParseResult::None),
                "'{header}' should be ignored"
            );
        }
    }
}
