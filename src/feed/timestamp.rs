//! Publication date parsing.
//!
//! Feeds disagree wildly on date formats, so parsing walks an ordered table of
//! layouts and takes the first one that matches. Nothing here returns an error:
//! an absent or unrecognized date becomes [`fallback_time`].

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Weekday};

use crate::config::Config;

/// How the zone is written after the date and time.
#[derive(Debug, Clone, Copy)]
enum Zone {
    /// An abbreviation such as `GMT` or `PST`
    Named,
    /// A numeric offset such as `+0000`, already part of the format as `%z`
    Offset,
}

#[derive(Debug, Clone, Copy)]
enum Grammar {
    /// A leading weekday name, then `format`, then the zone
    Weekday { format: &'static str, zone: Zone },
    Rfc3339,
}

/// Tried in order; first match wins.
const GRAMMARS: &[(&str, Grammar)] = &[
    // Slashdot: Sat, 29 Jun 2013 18:20:00 GMT
    (
        "RFC 1123",
        Grammar::Weekday {
            format: "%d %b %Y %H:%M:%S",
            zone: Zone::Named,
        },
    ),
    // Torrentfreak: Sun, 30 Jun 2013 21:26:26 +0000
    (
        "RFC 1123 with numeric offset",
        Grammar::Weekday {
            format: "%d %b %Y %H:%M:%S %z",
            zone: Zone::Offset,
        },
    ),
    // Slashdot RDF: 2015-03-03T21:29:00+00:00
    ("RFC 3339", Grammar::Rfc3339),
    // Wednesday, 01 April 2015 04:54:21 PDT
    (
        "long form",
        Grammar::Weekday {
            format: "%d %B %Y %H:%M:%S",
            zone: Zone::Named,
        },
    ),
    (
        "long form with numeric offset",
        Grammar::Weekday {
            format: "%d %B %Y %H:%M:%S %z",
            zone: Zone::Offset,
        },
    ),
    (
        "long form without seconds",
        Grammar::Weekday {
            format: "%d %B %Y %H:%M",
            zone: Zone::Named,
        },
    ),
    // Wednesday, April 01, 2015 04:54:21 PDT
    (
        "long form, month first",
        Grammar::Weekday {
            format: "%B %d, %Y %H:%M:%S",
            zone: Zone::Named,
        },
    ),
    (
        "long form, month first, without seconds",
        Grammar::Weekday {
            format: "%B %d, %Y %H:%M",
            zone: Zone::Named,
        },
    ),
    // Wednesday April 01 2015 04:54:21 PDT
    (
        "long form, month first, no commas",
        Grammar::Weekday {
            format: "%B %d %Y %H:%M:%S",
            zone: Zone::Named,
        },
    ),
    (
        "long form, month first, no commas, without seconds",
        Grammar::Weekday {
            format: "%B %d %Y %H:%M",
            zone: Zone::Named,
        },
    ),
    // Sun, 09 Apr 2017 05:06 GMT
    (
        "RFC 1123 without seconds",
        Grammar::Weekday {
            format: "%d %b %Y %H:%M",
            zone: Zone::Named,
        },
    ),
];

impl Grammar {
    fn parse(self, s: &str) -> Option<DateTime<FixedOffset>> {
        match self {
            Grammar::Rfc3339 => DateTime::parse_from_rfc3339(s).ok(),
            Grammar::Weekday { format, zone } => {
                let rest = strip_weekday(s)?;
                match zone {
                    Zone::Offset => DateTime::parse_from_str(rest, format).ok(),
                    Zone::Named => {
                        let (datetime, abbreviation) = rest.rsplit_once(' ')?;
                        let offset = zone_offset(abbreviation)?;
                        let naive = NaiveDateTime::parse_from_str(datetime.trim_end(), format).ok()?;
                        offset.from_local_datetime(&naive).single()
                    }
                }
            }
        }
    }
}

/// Removes a leading weekday name (`Sun`, `Sunday`) and an optional comma.
///
/// The weekday itself is not checked against the date.
fn strip_weekday(s: &str) -> Option<&str> {
    let end = s.find(|c: char| !c.is_ascii_alphabetic())?;
    let (name, rest) = s.split_at(end);
    name.parse::<Weekday>().ok()?;
    let rest = rest.strip_prefix(',').unwrap_or(rest);
    Some(rest.trim_start())
}

/// Resolves a zone abbreviation to an offset.
///
/// Unknown alphabetic abbreviations are treated as UTC.
fn zone_offset(abbreviation: &str) -> Option<FixedOffset> {
    if abbreviation.is_empty() || !abbreviation.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let hours = match abbreviation.to_ascii_uppercase().as_str() {
        "EDT" => -4,
        "EST" | "CDT" => -5,
        "CST" | "MDT" => -6,
        "MST" | "PDT" => -7,
        "PST" => -8,
        // GMT, UT, UTC, Z and anything unrecognized
        _ => 0,
    };
    FixedOffset::east_opt(hours * 3600)
}

/// The instant used when a date is missing or unparseable: the Unix epoch.
pub fn fallback_time() -> DateTime<FixedOffset> {
    DateTime::<FixedOffset>::default()
}

/// Parse a feed date string, keeping its original offset.
///
/// Leading and trailing whitespace are ignored. Returns `None` for an empty
/// string or when no known layout matches.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use feedkit::feed::parse_timestamp;
///
/// let parsed = parse_timestamp("Sun, 09 Apr 2017 05:06 GMT").unwrap();
/// assert_eq!(parsed, Utc.with_ymd_and_hms(2017, 4, 9, 5, 6, 0).unwrap());
/// assert!(parse_timestamp("yesterday").is_none());
/// ```
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    GRAMMARS
        .iter()
        .find_map(|(_, grammar)| grammar.parse(trimmed))
}

/// Like [`parse_timestamp`], but degrades to [`fallback_time`] instead of failing.
pub fn timestamp_or_fallback(raw: &str, config: &Config) -> DateTime<FixedOffset> {
    if let Some(parsed) = parse_timestamp(raw) {
        return parsed;
    }
    if config.verbose {
        if raw.trim().is_empty() {
            tracing::info!("No publication date given, using fallback");
        } else {
            tracing::info!(date = %raw, "No date layout matched, using fallback");
        }
    }
    fallback_time()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Timelike, Utc};

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    fn parsed(raw: &str) -> DateTime<FixedOffset> {
        parse_timestamp(raw).unwrap_or_else(|| panic!("{:?} should parse", raw))
    }

    #[test]
    fn test_rfc1123_named_zone() {
        assert_eq!(
            parsed("Sat, 29 Jun 2013 18:20:00 GMT"),
            utc(2013, 6, 29, 18, 20, 0)
        );
    }

    #[test]
    fn test_rfc1123_numeric_offset_keeps_offset() {
        let time = parsed("Mon, 08 Apr 2019 10:20:30 -0700");
        assert_eq!(time, utc(2019, 4, 8, 17, 20, 30));
        assert_eq!(time.offset().local_minus_utc(), -7 * 3600);
        assert_eq!(time.hour(), 10);
    }

    #[test]
    fn test_rfc3339() {
        assert_eq!(
            parsed("2015-03-03T21:29:00+00:00"),
            utc(2015, 3, 3, 21, 29, 0)
        );
        assert_eq!(
            parsed("2017-01-11T20:30:23-05:00"),
            utc(2017, 1, 12, 1, 30, 23)
        );
    }

    #[test]
    fn test_named_zone_offsets() {
        assert_eq!(
            parsed("Sat, 29 Jun 2013 18:20:00 PST"),
            utc(2013, 6, 30, 2, 20, 0)
        );
        assert_eq!(
            parsed("Sat, 29 Jun 2013 18:20:00 EDT"),
            utc(2013, 6, 29, 22, 20, 0)
        );
        // Unknown abbreviations read as UTC
        assert_eq!(
            parsed("Sat, 29 Jun 2013 18:20:00 XYZ"),
            utc(2013, 6, 29, 18, 20, 0)
        );
    }

    #[test]
    fn test_long_forms() {
        let expected = utc(2015, 4, 1, 11, 54, 21);
        assert_eq!(parsed("Wednesday, 01 April 2015 04:54:21 PDT"), expected);
        assert_eq!(parsed("Wednesday, 01 April 2015 04:54:21 -0700"), expected);
        assert_eq!(parsed("Wednesday, April 01, 2015 04:54:21 PDT"), expected);
        assert_eq!(parsed("Wednesday April 01 2015 04:54:21 PDT"), expected);
        assert_eq!(
            parsed("Wednesday, April 01, 2015 04:54 PDT"),
            utc(2015, 4, 1, 11, 54, 0)
        );
    }

    #[test]
    fn test_hour_minute_named_zone() {
        assert_eq!(parsed("Sun, 09 Apr 2017 05:06 GMT"), utc(2017, 4, 9, 5, 6, 0));
    }

    #[test]
    fn test_surrounding_whitespace_trimmed() {
        assert_eq!(
            parsed("\n   Sat, 29 Jun 2013 18:20:00 GMT \t"),
            utc(2013, 6, 29, 18, 20, 0)
        );
    }

    #[test]
    fn test_wrong_weekday_tolerated() {
        assert_eq!(
            parsed("Mon, 29 Jun 2013 18:20:00 GMT"),
            utc(2013, 6, 29, 18, 20, 0)
        );
    }

    #[test]
    fn test_unparseable_returns_none() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("   ").is_none());
        assert!(parse_timestamp("not a date").is_none());
        assert!(parse_timestamp("Funday, 01 Jan 2020 00:00:00 GMT").is_none());
        assert!(parse_timestamp("1970-01-01T00:00+00:00").is_none());
    }

    #[test]
    fn test_fallback_is_epoch() {
        let config = Config::default();
        assert_eq!(timestamp_or_fallback("", &config), fallback_time());
        assert_eq!(timestamp_or_fallback("garbage", &config), fallback_time());
        assert_eq!(fallback_time().timestamp(), 0);
    }

    #[test]
    fn test_verbosity_does_not_change_result() {
        let quiet = Config::default();
        let verbose = Config { verbose: true };
        for raw in ["", "garbage", "Sun, 09 Apr 2017 05:06 GMT"] {
            assert_eq!(
                timestamp_or_fallback(raw, &quiet),
                timestamp_or_fallback(raw, &verbose)
            );
        }
    }
}
