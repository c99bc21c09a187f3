//! HTTP Range request parsing module
//!
//! Only a single `bytes=<start>-<end?>` range is understood. Everything else
//! (suffix ranges, multiple ranges, other units) is reported as unsupported so
//! the caller can fall back to a full response.

use std::fmt;

/// Syntactically valid range, not yet checked against a file size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSpec {
    /// First byte requested
    pub start: Bound,
    /// Last byte requested, `None` means until end of file
    pub end: Option<Bound>,
}

/// A byte offset as written by the client
///
/// Offsets that do not fit in `u64` are kept as `Overflow`: they lie past the
/// end of any file we could serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Offset(u64),
    Overflow,
}

/// Validated inclusive byte window inside a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    /// Inclusive
    pub end: u64,
}

/// The requested window does not fit in the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeNotSatisfiable {
    pub file_size: u64,
}

// A validated window always holds at least one byte
#[allow(clippy::len_without_is_empty)]
impl ByteRange {
    /// Number of bytes in the window
    #[inline]
    pub const fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// Value of the `Content-Range` response header
    pub fn content_range(&self, file_size: u64) -> String {
        format!("bytes {}-{}/{file_size}", self.start, self.end)
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

impl RangeSpec {
    /// Check the range against the current file size.
    ///
    /// A missing end means the last byte of the file. Fails when
    /// `start >= file_size`, `end >= file_size` or `start > end`; nothing is
    /// clamped. An empty file can never satisfy a range.
    pub fn resolve(&self, file_size: u64) -> Result<ByteRange, RangeNotSatisfiable> {
        let not_satisfiable = RangeNotSatisfiable { file_size };

        let Bound::Offset(start) = self.start else {
            return Err(not_satisfiable);
        };
        let end = match self.end {
            Some(Bound::Offset(end)) => end,
            Some(Bound::Overflow) => return Err(not_satisfiable),
            None => file_size.checked_sub(1).ok_or(not_satisfiable)?,
        };

        if start >= file_size || end >= file_size || start > end {
            return Err(not_satisfiable);
        }

        Ok(ByteRange { start, end })
    }
}

/// Parse a `Range` header value (single range only, bytes unit)
///
/// Supported formats:
/// - `bytes=start-end` - Specific range
/// - `bytes=start-` - From start to end of file
///
/// Returns `None` for anything else, including suffix ranges (`bytes=-500`)
/// and multiple ranges (`bytes=0-1,5-9`).
///
/// # Examples
/// ```
/// use range_server::http::range::parse_range_header;
///
/// let spec = parse_range_header("bytes=100-199").unwrap();
/// assert_eq!(spec.resolve(1000).unwrap().len(), 100);
///
/// assert!(parse_range_header("bytes=-500").is_none());
/// ```
pub fn parse_range_header(value: &str) -> Option<RangeSpec> {
    let range = value.trim().strip_prefix("bytes=")?;
    let (start_str, end_str) = range.split_once('-')?;

    let start = parse_bound(start_str)?;
    let end = if end_str.is_empty() {
        None
    } else {
        Some(parse_bound(end_str)?)
    };

    Some(RangeSpec { start, end })
}

/// Parse a run of ASCII digits. Signs, whitespace and empty input are rejected.
fn parse_bound(digits: &str) -> Option<Bound> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(
        digits
            .parse::<u64>()
            .map_or(Bound::Overflow, Bound::Offset),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(header: &str, size: u64) -> Result<ByteRange, RangeNotSatisfiable> {
        parse_range_header(header)
            .expect("header should parse")
            .resolve(size)
    }

    #[test]
    fn test_standard_range() {
        let r = window("bytes=100-199", 1000).unwrap();
        assert_eq!(r, ByteRange { start: 100, end: 199 });
        assert_eq!(r.len(), 100);
        assert_eq!(r.content_range(1000), "bytes 100-199/1000");
    }

    #[test]
    fn test_open_range() {
        let r = window("bytes=900-", 1000).unwrap();
        assert_eq!(r, ByteRange { start: 900, end: 999 });
        assert_eq!(r.len(), 100);
    }

    #[test]
    fn test_whole_file_and_single_byte() {
        assert_eq!(window("bytes=0-", 1).unwrap(), ByteRange { start: 0, end: 0 });
        assert_eq!(window("bytes=0-999", 1000).unwrap().len(), 1000);
        assert_eq!(window("bytes=5-5", 10).unwrap().len(), 1);
    }

    #[test]
    fn test_not_satisfiable() {
        assert!(window("bytes=1000-1010", 1000).is_err());
        assert!(window("bytes=1000-", 1000).is_err());
        assert!(window("bytes=0-1000", 1000).is_err());
        assert!(window("bytes=20-10", 1000).is_err());
        assert!(window("bytes=0-", 0).is_err());
        assert!(window("bytes=0-0", 0).is_err());
    }

    #[test]
    fn test_end_is_not_clamped() {
        let err = window("bytes=0-5000", 1000).unwrap_err();
        assert_eq!(err.file_size, 1000);
    }

    #[test]
    fn test_overflowing_offsets_are_out_of_range() {
        assert!(window("bytes=99999999999999999999999-", 1000).is_err());
        assert!(window("bytes=0-99999999999999999999999", 1000).is_err());
    }

    #[test]
    fn test_unsupported_forms() {
        for header in [
            "bytes=abc-def",
            "bytes=0-10,20-30",
            "bytes=-500",
            "bytes=+1-5",
            "bytes=1",
            "bytes=",
            "items=0-10",
            "bytes = 0-10",
            "0-10",
        ] {
            assert!(
                parse_range_header(header).is_none(),
                "expected {header:?} to be unsupported"
            );
        }
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        let spec = parse_range_header("  bytes=1-2 ").unwrap();
        assert_eq!(spec.start, Bound::Offset(1));
        assert_eq!(spec.end, Some(Bound::Offset(2)));
    }
}
