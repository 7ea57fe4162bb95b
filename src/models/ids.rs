//! Row identifiers.
//!
//! All identifiers are SQLite `INTEGER PRIMARY KEY` values.

/// Player row id.
pub type PlayerId = i64;

/// Match row id.
pub type MatchId = i64;

/// Season row id.
pub type SeasonId = i64;

/// Parse a positive row id from a request parameter.
pub fn parse_row_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|id| *id > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_row_id_valid() {
        assert_eq!(parse_row_id("42"), Some(42));
        assert_eq!(parse_row_id(" 7 "), Some(7));
    }

    #[test]
    fn test_parse_row_id_rejects_non_positive() {
        assert_eq!(parse_row_id("0"), None);
        assert_eq!(parse_row_id("-3"), None);
    }

    #[test]
    fn test_parse_row_id_rejects_garbage() {
        assert_eq!(parse_row_id("abc"), None);
        assert_eq!(parse_row_id(""), None);
        assert_eq!(parse_row_id("1.5"), None);
    }
}
