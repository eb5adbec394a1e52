//! Timestamp parsing and day-boundary policy.
//!
//! The bot service hands out timestamps as text, sometimes with an offset and
//! sometimes without. A [`CalendarPolicy`] decides which zone naive values
//! belong to and where one calendar day ends and the next begins.

use chrono::{
    DateTime, FixedOffset, Local, LocalResult, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc,
};
use std::fmt;
use std::str::FromStr;

const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalendarPolicy {
    /// Zone of the running process.
    #[default]
    Local,
    Fixed(FixedOffset),
}

impl CalendarPolicy {
    pub fn utc() -> Self {
        CalendarPolicy::Fixed(Utc.fix())
    }

    /// Parse a service timestamp into an instant. Returns `None` when the
    /// text is not a recognised timestamp or names a local time that does
    /// not exist.
    ///
    /// Values without an offset, bare dates included, are read in this
    /// policy's zone. A bare `YYYY-MM-DD` is midnight of that day in the
    /// policy zone, so [`day_of`](Self::day_of) always gives back the same
    /// date. Browsers read a bare date as UTC midnight instead; under a
    /// negative offset the two disagree by one day.
    pub fn parse_instant(&self, raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }

        let naive = NAIVE_DATETIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })?;

        self.resolve_naive(&naive)
    }

    /// Calendar day of `instant` in this policy's zone.
    pub fn day_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        match self {
            CalendarPolicy::Local => instant.with_timezone(&Local).date_naive(),
            CalendarPolicy::Fixed(offset) => instant.with_timezone(offset).date_naive(),
        }
    }

    fn resolve_naive(&self, naive: &NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            CalendarPolicy::Local => earliest(Local.from_local_datetime(naive)),
            CalendarPolicy::Fixed(offset) => earliest(offset.from_local_datetime(naive)),
        }
    }
}

fn earliest<Tz: TimeZone>(result: LocalResult<DateTime<Tz>>) -> Option<DateTime<Utc>> {
    result.earliest().map(|dt| dt.with_timezone(&Utc))
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid timezone {0:?} (expected local, utc or an offset like +02:00)")]
pub struct InvalidTimezone(pub String);

impl FromStr for CalendarPolicy {
    type Err = InvalidTimezone;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "local" => return Ok(CalendarPolicy::Local),
            "utc" | "z" => return Ok(CalendarPolicy::utc()),
            _ => {}
        }
        parse_offset(trimmed)
            .map(CalendarPolicy::Fixed)
            .ok_or_else(|| InvalidTimezone(s.to_string()))
    }
}

fn parse_offset(s: &str) -> Option<FixedOffset> {
    let (sign, rest) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => return None,
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let (hours, minutes) = match digits.len() {
        2 => (digits.parse::<i32>().ok()?, 0),
        4 => (digits[..2].parse::<i32>().ok()?, digits[2..].parse::<i32>().ok()?),
        _ => return None,
    };
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

impl fmt::Display for CalendarPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalendarPolicy::Local => write!(f, "local"),
            CalendarPolicy::Fixed(offset) => write!(f, "{}", offset),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn offset(hours: i32) -> CalendarPolicy {
        CalendarPolicy::Fixed(FixedOffset::east_opt(hours * 3600).unwrap())
    }

    #[test]
    fn parses_rfc3339_with_zulu() {
        let instant = CalendarPolicy::utc()
            .parse_instant("2024-03-01T10:00:00Z")
            .unwrap();
        assert_eq!(instant.hour(), 10);
        assert_eq!(instant.day(), 1);
    }

    #[test]
    fn rfc3339_offset_wins_over_policy() {
        let a = offset(9).parse_instant("2024-03-01T10:00:00+02:00").unwrap();
        let b = CalendarPolicy::utc()
            .parse_instant("2024-03-01T08:00:00Z")
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn parses_fractional_seconds() {
        let instant = CalendarPolicy::utc()
            .parse_instant("2024-03-01T10:00:00.123456")
            .unwrap();
        assert_eq!(instant.nanosecond(), 123_456_000);
    }

    #[test]
    fn naive_values_use_policy_zone() {
        let instant = offset(2).parse_instant("2024-03-01 01:30:00").unwrap();
        assert_eq!(instant.day(), 29);
        assert_eq!(instant.month(), 2);
        assert_eq!(instant.hour(), 23);
    }

    #[test]
    fn bare_date_is_midnight() {
        let instant = CalendarPolicy::utc().parse_instant("2024-03-05").unwrap();
        assert_eq!(instant.hour(), 0);
        assert_eq!(instant.day(), 5);
    }

    #[test]
    fn bare_date_keeps_its_day_under_any_offset() {
        for hours in [-10, -5, 0, 5, 13] {
            let policy = offset(hours);
            let instant = policy.parse_instant("2024-03-05").unwrap();
            assert_eq!(
                policy.day_of(instant),
                NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
                "offset {}",
                hours
            );
        }
    }

    #[test]
    fn garbage_is_rejected() {
        let policy = CalendarPolicy::utc();
        assert!(policy.parse_instant("").is_none());
        assert!(policy.parse_instant("   ").is_none());
        assert!(policy.parse_instant("not a date").is_none());
        assert!(policy.parse_instant("2024-13-01").is_none());
        assert!(policy.parse_instant("03/01/2024").is_none());
    }

    #[test]
    fn day_of_respects_offset() {
        let instant = CalendarPolicy::utc()
            .parse_instant("2024-03-01T23:30:00Z")
            .unwrap();
        assert_eq!(
            CalendarPolicy::utc().day_of(instant),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
        assert_eq!(
            offset(2).day_of(instant),
            NaiveDate::from_ymd_opt(2024, 3, 2).unwrap()
        );
        assert_eq!(
            offset(-5).day_of(instant),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
    }

    #[test]
    fn local_day_matches_chrono_local() {
        let instant = CalendarPolicy::utc()
            .parse_instant("2024-06-15T12:00:00Z")
            .unwrap();
        assert_eq!(
            CalendarPolicy::Local.day_of(instant),
            instant.with_timezone(&Local).date_naive()
        );
    }

    #[test]
    fn from_str_accepts_named_zones() {
        assert_eq!("local".parse::<CalendarPolicy>(), Ok(CalendarPolicy::Local));
        assert_eq!("UTC".parse::<CalendarPolicy>(), Ok(CalendarPolicy::utc()));
        assert_eq!("Z".parse::<CalendarPolicy>(), Ok(CalendarPolicy::utc()));
    }

    #[test]
    fn from_str_accepts_offsets() {
        let expected = CalendarPolicy::Fixed(FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap());
        assert_eq!("+05:30".parse::<CalendarPolicy>(), Ok(expected));
        assert_eq!("+0530".parse::<CalendarPolicy>(), Ok(expected));
        assert_eq!("-08".parse::<CalendarPolicy>(), Ok(offset(-8)));
    }

    #[test]
    fn from_str_rejects_bad_zones() {
        assert!("Europe/Paris".parse::<CalendarPolicy>().is_err());
        assert!("+25:00".parse::<CalendarPolicy>().is_err());
        assert!("+5".parse::<CalendarPolicy>().is_err());
        assert!("".parse::<CalendarPolicy>().is_err());
    }

    #[test]
    fn display_round_trips_through_from_str() {
        let policy = offset(-3);
        assert_eq!(policy.to_string().parse::<CalendarPolicy>(), Ok(policy));
        assert_eq!(CalendarPolicy::Local.to_string(), "local");
    }
}
