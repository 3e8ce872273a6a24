//! Feed timestamps.

use chrono::NaiveDateTime;

use super::FeedError;

/// Timestamp as written by the submission form.
pub type Timestamp = NaiveDateTime;

/// Text format of feed timestamps, day first.
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Parse a feed timestamp. Blank text means "no submission" and yields `None`,
/// which orders before every real timestamp.
///
/// # Errors
///
/// Returns [`FeedError::BadTimestamp`] for non-blank text in the wrong format.
pub fn parse_timestamp(text: &str) -> Result<Option<Timestamp>, FeedError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT)
        .map(Some)
        .map_err(|_| FeedError::BadTimestamp(text.to_string()))
}

/// Format a timestamp the way the feed writes it.
#[must_use]
pub fn format_timestamp(ts: Timestamp) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_blank() {
        assert_eq!(parse_timestamp(""), Ok(None));
        assert_eq!(parse_timestamp("   "), Ok(None));
    }

    #[test]
    fn test_parse_day_first() {
        let ts = parse_timestamp("02/11/2020 13:05:09").unwrap().unwrap();
        assert_eq!(format_timestamp(ts), "02/11/2020 13:05:09");

        let later = parse_timestamp("01/12/2020 00:00:00").unwrap().unwrap();
        assert!(later > ts);
    }

    #[test]
    fn test_blank_sorts_first() {
        let ts = parse_timestamp("01/01/2000 00:00:00").unwrap();
        assert!(None < ts);
    }

    #[test]
    fn test_parse_garbage() {
        assert_eq!(
            parse_timestamp("yesterday"),
            Err(FeedError::BadTimestamp("yesterday".to_string()))
        );
        assert!(parse_timestamp("13/13/2020 10:00:00").is_err());
    }
}
