//! Calendar-date handling.
//!
//! All marketplace dates are plain calendar days (`chrono::NaiveDate`): no
//! time of day and no timezone. Text input is accepted only as `YYYY-MM-DD`
//! (days) or `YYYY-MM` (months), split into explicit integer components. We
//! never go through a timestamp type, so a day can not drift across a
//! timezone boundary on its way in.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Errors produced while reading dates at an input boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    /// Text is not a well-formed `YYYY-MM-DD` / `YYYY-MM` value, or names a
    /// day that does not exist.
    #[error("Invalid date '{input}': {reason}")]
    Parse { input: String, reason: String },

    /// Month outside of chrono's representable calendar.
    #[error("Month out of range: {year}-{month:02}")]
    MonthOutOfRange { year: i32, month: u32 },
}

impl DateError {
    fn parse(input: &str, reason: impl Into<String>) -> Self {
        DateError::Parse {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// Split `input` on `-` and check every component is ASCII digits of the
/// given width.
fn numeric_components<'a>(
    input: &'a str,
    widths: &[usize],
) -> Result<Vec<&'a str>, DateError> {
    let parts: Vec<&str> = input.split('-').collect();
    if parts.len() != widths.len() {
        return Err(DateError::parse(
            input,
            format!("expected {} dash-separated components", widths.len()),
        ));
    }

    for (part, width) in parts.iter().zip(widths) {
        if part.len() != *width || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DateError::parse(
                input,
                format!("component '{}' must be {} digits", part, width),
            ));
        }
    }

    Ok(parts)
}

fn parse_component<T: FromStr>(input: &str, part: &str) -> Result<T, DateError> {
    part.parse::<T>()
        .map_err(|_| DateError::parse(input, format!("component '{}' is not a number", part)))
}

/// Parse a `YYYY-MM-DD` calendar date.
///
/// Surrounding whitespace is ignored. Impossible days such as `2023-02-29`
/// are rejected rather than rolled over.
pub fn parse_calendar_date(input: &str) -> Result<NaiveDate, DateError> {
    let trimmed = input.trim();
    let parts = numeric_components(trimmed, &[4, 2, 2])?;

    let year: i32 = parse_component(trimmed, parts[0])?;
    let month: u32 = parse_component(trimmed, parts[1])?;
    let day: u32 = parse_component(trimmed, parts[2])?;

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| DateError::parse(trimmed, "no such calendar day"))
}

/// Format a date as `YYYY-MM-DD`.
pub fn format_calendar_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// A calendar month, the unit a producer calendar is rendered in.
///
/// Construction validates that the month and the month after it are
/// representable, so every accessor is infallible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    year: i32,
    month: u32,
    first: NaiveDate,
    days: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, DateError> {
        let out_of_range = || DateError::MonthOutOfRange { year, month };

        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(out_of_range)?;
        let next = first
            .checked_add_months(Months::new(1))
            .ok_or_else(out_of_range)?;
        let days = next.signed_duration_since(first).num_days() as u32;

        Ok(Self {
            year,
            month,
            first,
            days,
        })
    }

    /// Month containing `date`.
    pub fn containing(date: NaiveDate) -> Result<Self, DateError> {
        Self::new(date.year(), date.month())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Month number, 1-based.
    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn days_in_month(&self) -> u32 {
        self.days
    }

    /// Weekday of day 1, counted from Sunday = 0. Calendar widgets use this
    /// as the number of blank cells before the first day.
    pub fn first_weekday_offset(&self) -> u32 {
        self.first.weekday().num_days_from_sunday()
    }

    /// Every day of the month in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        self.first.iter_days().take(self.days as usize)
    }

    pub fn next(&self) -> Option<Self> {
        let date = self.first.checked_add_months(Months::new(1))?;
        Self::containing(date).ok()
    }

    pub fn previous(&self) -> Option<Self> {
        let date = self.first.checked_sub_months(Months::new(1))?;
        Self::containing(date).ok()
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let parts = numeric_components(trimmed, &[4, 2])?;
        let year: i32 = parse_component(trimmed, parts[0])?;
        let month: u32 = parse_component(trimmed, parts[1])?;

        if !(1..=12).contains(&month) {
            return Err(DateError::parse(trimmed, "month must be between 01 and 12"));
        }

        Self::new(year, month)
    }
}

impl TryFrom<String> for YearMonth {
    type Error = DateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}

/// Serde adapter for `NaiveDate` fields stored as `YYYY-MM-DD`.
pub mod serde_calendar_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_calendar_date(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_calendar_date(&raw).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for optional `YYYY-MM-DD` fields. Empty strings and `null`
/// both read as `None`.
pub mod serde_optional_calendar_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        date: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => serializer.serialize_some(&super::format_calendar_date(*d)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            Some(s) if !s.trim().is_empty() => super::parse_calendar_date(&s)
                .map(Some)
                .map_err(serde::de::Error::custom),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_valid_date() {
        assert_eq!(parse_calendar_date("2024-06-01").unwrap(), ymd(2024, 6, 1));
        assert_eq!(parse_calendar_date(" 2024-12-31 ").unwrap(), ymd(2024, 12, 31));
    }

    #[test]
    fn test_parse_leap_day() {
        assert_eq!(parse_calendar_date("2024-02-29").unwrap(), ymd(2024, 2, 29));
        assert!(parse_calendar_date("2023-02-29").is_err());
    }

    #[test]
    fn test_parse_rejects_malformed_input() {
        for input in [
            "",
            "2024",
            "2024-6-01",
            "2024-06-1",
            "24-06-01",
            "2024/06/01",
            "2024-06-01T00:00:00Z",
            "2024-06-01-01",
            "abcd-ef-gh",
            "+202-06-01",
        ] {
            let err = parse_calendar_date(input).unwrap_err();
            assert!(matches!(err, DateError::Parse { .. }), "accepted {input:?}");
        }
    }

    #[test]
    fn test_parse_rejects_impossible_days() {
        assert!(parse_calendar_date("2024-13-01").is_err());
        assert!(parse_calendar_date("2024-00-10").is_err());
        assert!(parse_calendar_date("2024-04-31").is_err());
        assert!(parse_calendar_date("2024-01-00").is_err());
    }

    #[test]
    fn test_format_roundtrip() {
        let date = ymd(2023, 5, 7);
        assert_eq!(format_calendar_date(date), "2023-05-07");
        assert_eq!(parse_calendar_date(&format_calendar_date(date)).unwrap(), date);
    }

    #[test]
    fn test_days_in_month() {
        let cases = [
            (2024, 1, 31),
            (2024, 2, 29),
            (2023, 2, 28),
            (1900, 2, 28),
            (2000, 2, 29),
            (2024, 4, 30),
            (2024, 12, 31),
        ];
        for (y, m, expected) in cases {
            assert_eq!(YearMonth::new(y, m).unwrap().days_in_month(), expected);
        }
    }

    #[test]
    fn test_year_month_rejects_bad_month() {
        assert!(YearMonth::new(2024, 0).is_err());
        assert!(YearMonth::new(2024, 13).is_err());
        assert!("2024-13".parse::<YearMonth>().is_err());
        assert!("2024-6".parse::<YearMonth>().is_err());
    }

    #[test]
    fn test_year_month_navigation() {
        let dec = YearMonth::new(2023, 12).unwrap();
        let jan = dec.next().unwrap();
        assert_eq!((jan.year(), jan.month()), (2024, 1));
        assert_eq!(jan.previous().unwrap(), dec);
    }

    #[test]
    fn test_year_month_days_and_offset() {
        // June 2023 starts on a Thursday
        let june = "2023-06".parse::<YearMonth>().unwrap();
        assert_eq!(june.first_weekday_offset(), 4);
        let days: Vec<NaiveDate> = june.days().collect();
        assert_eq!(days.len(), 30);
        assert_eq!(days[0], ymd(2023, 6, 1));
        assert_eq!(days[29], ymd(2023, 6, 30));
    }

    #[test]
    fn test_year_month_serde() {
        let month: YearMonth = serde_json::from_str("\"2024-02\"").unwrap();
        assert_eq!(month.days_in_month(), 29);
        assert_eq!(serde_json::to_string(&month).unwrap(), "\"2024-02\"");
    }
}
