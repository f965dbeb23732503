//! Availability windows, query ranges and the missing-bound policy.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::date::{format_calendar_date, parse_calendar_date, serde_optional_calendar_date, DateError};

/// Inclusive range of calendar days during which an item can be obtained.
///
/// `from <= until` is expected but not enforced: an inverted window is kept
/// as entered and simply never overlaps anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateWindow {
    pub from: NaiveDate,
    pub until: NaiveDate,
}

impl DateWindow {
    pub fn new(from: NaiveDate, until: NaiveDate) -> Self {
        Self { from, until }
    }

    pub fn single_day(day: NaiveDate) -> Self {
        Self::new(day, day)
    }

    /// Closed-interval overlap. Symmetric in `self` and `other`; an inverted
    /// window is empty and overlaps nothing.
    pub fn overlaps(&self, other: &DateWindow) -> bool {
        if self.is_inverted() || other.is_inverted() {
            return false;
        }
        self.from <= other.until && self.until >= other.from
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.from <= day && day <= self.until
    }

    pub fn is_inverted(&self) -> bool {
        self.from > self.until
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}..={}",
            format_calendar_date(self.from),
            format_calendar_date(self.until)
        )
    }
}

/// Declared availability of a catalog item.
///
/// Only a complete window takes part in matching. When either bound is
/// missing the item is `Unbounded`; any single bound the producer did enter
/// is retained for display and date sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "AvailabilityBounds", into = "AvailabilityBounds")]
pub enum Availability {
    Unbounded {
        from: Option<NaiveDate>,
        until: Option<NaiveDate>,
    },
    Window(DateWindow),
}

impl Availability {
    /// No availability declared at all.
    pub const fn unknown() -> Self {
        Availability::Unbounded {
            from: None,
            until: None,
        }
    }

    pub fn window(from: NaiveDate, until: NaiveDate) -> Self {
        Availability::Window(DateWindow::new(from, until))
    }

    pub fn from_bounds(from: Option<NaiveDate>, until: Option<NaiveDate>) -> Self {
        match (from, until) {
            (Some(from), Some(until)) => Availability::window(from, until),
            (from, until) => Availability::Unbounded { from, until },
        }
    }

    pub fn as_window(&self) -> Option<&DateWindow> {
        match self {
            Availability::Window(w) => Some(w),
            Availability::Unbounded { .. } => None,
        }
    }

    /// First day of availability, if the producer declared one.
    pub fn starts_on(&self) -> Option<NaiveDate> {
        match self {
            Availability::Window(w) => Some(w.from),
            Availability::Unbounded { from, .. } => *from,
        }
    }

    pub fn ends_on(&self) -> Option<NaiveDate> {
        match self {
            Availability::Window(w) => Some(w.until),
            Availability::Unbounded { until, .. } => *until,
        }
    }
}

impl Default for Availability {
    fn default() -> Self {
        Availability::unknown()
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Availability::Window(w) => fmt::Display::fmt(w, f),
            Availability::Unbounded { from, until } => {
                let bound = |d: &Option<NaiveDate>| d.map(format_calendar_date).unwrap_or_default();
                write!(f, "{}..={} (unbounded)", bound(from), bound(until))
            }
        }
    }
}

/// Wire shape of [`Availability`]: the two optional `YYYY-MM-DD` fields
/// listings carry.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityBounds {
    #[serde(
        default,
        with = "serde_optional_calendar_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub available_from: Option<NaiveDate>,
    #[serde(
        default,
        with = "serde_optional_calendar_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub available_until: Option<NaiveDate>,
}

impl From<AvailabilityBounds> for Availability {
    fn from(b: AvailabilityBounds) -> Self {
        Availability::from_bounds(b.available_from, b.available_until)
    }
}

impl From<Availability> for AvailabilityBounds {
    fn from(a: Availability) -> Self {
        AvailabilityBounds {
            available_from: a.starts_on(),
            available_until: a.ends_on(),
        }
    }
}

/// How an item without a complete window answers availability queries.
///
/// Earlier iterations of the marketplace disagreed here, so both behaviours
/// exist and the caller picks one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingBoundPolicy {
    /// Unknown availability never matches. Used by "show available only".
    #[default]
    Strict,
    /// Unknown availability always matches.
    Permissive,
}

impl MissingBoundPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissingBoundPolicy::Strict => "strict",
            MissingBoundPolicy::Permissive => "permissive",
        }
    }
}

impl fmt::Display for MissingBoundPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MissingBoundPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Ok(MissingBoundPolicy::Strict),
            "permissive" => Ok(MissingBoundPolicy::Permissive),
            other => Err(format!(
                "Unknown missing-bound policy '{}'. Use strict or permissive.",
                other
            )),
        }
    }
}

/// Errors raised when building a query range.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AvailabilityError {
    #[error("Invalid query range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error(transparent)]
    Date(#[from] DateError),
}

/// Consumer-chosen date range, validated so that `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct QueryRange {
    #[serde(with = "super::date::serde_calendar_date")]
    start: NaiveDate,
    #[serde(with = "super::date::serde_calendar_date")]
    end: NaiveDate,
}

impl QueryRange {
    /// Build a range; an inverted range is rejected, never swapped.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, AvailabilityError> {
        if start > end {
            return Err(AvailabilityError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn single_day(day: NaiveDate) -> Self {
        Self { start: day, end: day }
    }

    /// Parse form input. A missing or blank `end` collapses the range to the
    /// start day.
    pub fn parse(start: &str, end: Option<&str>) -> Result<Self, AvailabilityError> {
        let start = parse_calendar_date(start)?;
        let end = match end.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => parse_calendar_date(raw)?,
            None => start,
        };
        Self::new(start, end)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn is_single_day(&self) -> bool {
        self.start == self.end
    }

    pub fn as_window(&self) -> DateWindow {
        DateWindow::new(self.start, self.end)
    }
}

impl fmt::Display for QueryRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.as_window(), f)
    }
}
