// ABOUTME: Date conversion for youtube-dl upload dates.
// ABOUTME: Turns YYYYMMDD into an RFC 2822 date at midnight with the unknown -0000 offset.

use chrono::NaiveDate;

use crate::error::FeedError;

/// Converts a date in YYYYMMDD format to RFC 2822 for RSS.
///
/// The result is midnight of that calendar day with the `-0000` zone, which
/// RFC 2822 defines as "local time, offset unknown". It does not depend on the
/// timezone of the running process.
pub fn ymd_to_rfc2822(datestr: &str) -> Result<String, FeedError> {
    let date = parse_ymd(datestr)?;
    Ok(date.format("%a, %d %b %Y 00:00:00 -0000").to_string())
}

/// Parses an 8-digit YYYYMMDD date.
pub fn parse_ymd(datestr: &str) -> Result<NaiveDate, FeedError> {
    // chrono also accepts signed and short years; those are not YYYYMMDD.
    let strict = datestr.len() == 8 && datestr.bytes().all(|b| b.is_ascii_digit());
    let input = if strict { datestr } else { "" };
    NaiveDate::parse_from_str(input, "%Y%m%d").map_err(|source| FeedError::InvalidDate {
        value: datestr.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_new_year() {
        assert_eq!(
            ymd_to_rfc2822("20200101").unwrap(),
            "Wed, 01 Jan 2020 00:00:00 -0000"
        );
    }

    #[test]
    fn test_leap_day() {
        assert_eq!(
            ymd_to_rfc2822("20160229").unwrap(),
            "Mon, 29 Feb 2016 00:00:00 -0000"
        );
    }

    #[test]
    fn test_parse_ymd() {
        let date = parse_ymd("19991231").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (1999, 12, 31));
    }

    #[test]
    fn test_invalid_dates_rejected() {
        for bad in ["", "2020011", "202001011", "2020-1-01", "20200230", "20201301", "abcdefgh"] {
            let err = ymd_to_rfc2822(bad).unwrap_err();
            assert!(
                matches!(err, FeedError::InvalidDate { ref value, .. } if value == bad),
                "expected InvalidDate for {:?}",
                bad
            );
        }
    }
}
