//! Availability matching.
//!
//! Decides whether catalog items overlap a consumer's date range and whether
//! they are on offer on a given day. Inputs are already-parsed dates and a
//! validated [`QueryRange`], so every operation here is total: string
//! handling and range validation happen at the input boundary.
//!
//! ## Matching rule
//! - Item with a complete window: closed-interval overlap,
//!   `from <= query.end && until >= query.start`.
//! - Item without one: answered by the [`MissingBoundPolicy`].

use chrono::NaiveDate;

use crate::models::{Availability, MissingBoundPolicy, Product, QueryRange, YearMonth};

use super::calendar::MonthGrid;

/// Anything carrying a declared availability.
pub trait HasAvailability {
    fn availability(&self) -> &Availability;
}

impl HasAvailability for Availability {
    fn availability(&self) -> &Availability {
        self
    }
}

impl HasAvailability for Product {
    fn availability(&self) -> &Availability {
        &self.availability
    }
}

impl<T: HasAvailability + ?Sized> HasAvailability for &T {
    fn availability(&self) -> &Availability {
        (**self).availability()
    }
}

/// Availability matcher configured with a missing-bound policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AvailabilityMatcher {
    policy: MissingBoundPolicy,
}

impl AvailabilityMatcher {
    pub fn new(policy: MissingBoundPolicy) -> Self {
        Self { policy }
    }

    /// Unknown availability never matches.
    pub fn strict() -> Self {
        Self::new(MissingBoundPolicy::Strict)
    }

    /// Unknown availability always matches.
    pub fn permissive() -> Self {
        Self::new(MissingBoundPolicy::Permissive)
    }

    pub fn policy(&self) -> MissingBoundPolicy {
        self.policy
    }

    /// Does `item` overlap the query range?
    pub fn overlaps<T: HasAvailability + ?Sized>(&self, item: &T, range: &QueryRange) -> bool {
        match item.availability() {
            Availability::Window(window) => window.overlaps(&range.as_window()),
            Availability::Unbounded { .. } => self.policy == MissingBoundPolicy::Permissive,
        }
    }

    /// Is `item` on offer on `date`? Same as a single-day [`overlaps`](Self::overlaps).
    pub fn is_available_on_date<T: HasAvailability + ?Sized>(
        &self,
        item: &T,
        date: NaiveDate,
    ) -> bool {
        self.overlaps(item, &QueryRange::single_day(date))
    }

    /// Items overlapping `range`, in input order.
    pub fn filter<'a, T: HasAvailability>(&self, items: &'a [T], range: &QueryRange) -> Vec<&'a T> {
        items.iter().filter(|item| self.overlaps(*item, range)).collect()
    }

    /// Calendar cells for `month`: one per day, each listing the items
    /// available that day in input order.
    pub fn build_month_grid<'a, T: HasAvailability>(
        &self,
        month: YearMonth,
        items: &'a [T],
    ) -> MonthGrid<&'a T> {
        let cells = month
            .days()
            .map(|day| {
                let available = items
                    .iter()
                    .filter(|item| self.is_available_on_date(*item, day))
                    .collect();
                (day, available)
            })
            .collect();

        MonthGrid::from_cells(month, cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_calendar_date;

    fn d(s: &str) -> NaiveDate {
        parse_calendar_date(s).unwrap()
    }

    fn window(from: &str, until: &str) -> Availability {
        Availability::window(d(from), d(until))
    }

    #[test]
    fn test_mid_window_day_matches() {
        let item = window("2024-06-01", "2024-08-30");
        let range = QueryRange::parse("2024-07-15", None).unwrap();
        assert!(AvailabilityMatcher::strict().overlaps(&item, &range));
    }

    #[test]
    fn test_day_after_window_does_not_match() {
        let item = window("2024-06-01", "2024-08-30");
        let range = QueryRange::parse("2024-09-01", None).unwrap();
        assert!(!AvailabilityMatcher::strict().overlaps(&item, &range));
    }

    #[test]
    fn test_partial_overlap_matches() {
        let item = window("2024-06-01", "2024-08-30");
        let range = QueryRange::parse("2024-05-01", Some("2024-06-02")).unwrap();
        assert!(AvailabilityMatcher::strict().overlaps(&item, &range));
    }

    #[test]
    fn test_query_range_covering_window_matches() {
        let item = window("2024-06-10", "2024-06-12");
        let range = QueryRange::parse("2024-06-01", Some("2024-06-30")).unwrap();
        assert!(AvailabilityMatcher::strict().overlaps(&item, &range));
    }

    #[test]
    fn test_leap_day_inside_window() {
        let item = window("2024-02-28", "2024-03-01");
        assert!(AvailabilityMatcher::strict().is_available_on_date(&item, d("2024-02-29")));
    }

    #[test]
    fn test_unbounded_follows_policy() {
        let range = QueryRange::parse("2024-07-15", None).unwrap();
        let items = [
            Availability::unknown(),
            Availability::from_bounds(Some(d("2024-06-01")), None),
            Availability::from_bounds(None, Some(d("2024-08-30"))),
        ];
        for item in &items {
            assert!(!AvailabilityMatcher::strict().overlaps(item, &range));
            assert!(AvailabilityMatcher::permissive().overlaps(item, &range));
        }
    }

    #[test]
    fn test_policy_does_not_affect_windows() {
        let item = window("2024-06-01", "2024-08-30");
        let range = QueryRange::parse("2024-09-01", None).unwrap();
        assert!(!AvailabilityMatcher::permissive().overlaps(&item, &range));
    }

    #[test]
    fn test_inverted_window_is_never_listed() {
        let item = window("2024-08-30", "2024-06-01");
        let spanning = QueryRange::parse("2024-06-01", Some("2024-08-30")).unwrap();
        for matcher in [AvailabilityMatcher::strict(), AvailabilityMatcher::permissive()] {
            assert!(!matcher.overlaps(&item, &spanning));
            assert!(!matcher.is_available_on_date(&item, d("2024-07-01")));
            assert!(matcher.filter(std::slice::from_ref(&item), &spanning).is_empty());
        }
    }

    #[test]
    fn test_filter_preserves_order() {
        let items = vec![
            window("2024-01-01", "2024-01-31"),
            Availability::unknown(),
            window("2024-01-15", "2024-02-15"),
            window("2024-03-01", "2024-03-31"),
        ];
        let range = QueryRange::parse("2024-01-20", Some("2024-02-01")).unwrap();
        let matched = AvailabilityMatcher::strict().filter(&items, &range);
        assert_eq!(matched, vec![&items[0], &items[2]]);
    }

    #[test]
    fn test_month_grid_cells() {
        let items = vec![
            window("2024-02-28", "2024-03-01"),
            window("2024-02-01", "2024-02-01"),
        ];
        let month = YearMonth::new(2024, 2).unwrap();
        let grid = AvailabilityMatcher::strict().build_month_grid(month, &items);

        assert_eq!(grid.len(), 29);
        assert_eq!(grid.items_on(d("2024-02-01")).unwrap(), &[&items[1]]);
        assert!(grid.items_on(d("2024-02-15")).unwrap().is_empty());
        assert_eq!(grid.items_on(d("2024-02-29")).unwrap(), &[&items[0]]);
        assert!(grid.items_on(d("2024-03-01")).is_none());
    }
}
