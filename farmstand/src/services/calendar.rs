//! Month grids for producer availability calendars.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::models::date::serde_calendar_date;
use crate::models::YearMonth;

/// One day of a month grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayCell<T> {
    #[serde(with = "serde_calendar_date")]
    pub date: NaiveDate,
    pub items: Vec<T>,
}

impl<T> DayCell<T> {
    pub fn day(&self) -> u32 {
        self.date.day()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A month of day cells, exactly `days_in_month` long, in day order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthGrid<T> {
    month: YearMonth,
    /// Blank cells before day 1 when weeks start on Sunday.
    leading_blanks: u32,
    cells: Vec<DayCell<T>>,
}

impl<T> MonthGrid<T> {
    pub(crate) fn from_cells(month: YearMonth, cells: Vec<(NaiveDate, Vec<T>)>) -> Self {
        Self {
            month,
            leading_blanks: month.first_weekday_offset(),
            cells: cells
                .into_iter()
                .map(|(date, items)| DayCell { date, items })
                .collect(),
        }
    }

    pub fn month(&self) -> YearMonth {
        self.month
    }

    pub fn leading_blanks(&self) -> u32 {
        self.leading_blanks
    }

    pub fn cells(&self) -> &[DayCell<T>] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Items on `date`, or `None` when the date is outside this month.
    pub fn items_on(&self, date: NaiveDate) -> Option<&[T]> {
        if date.year() != self.month.year() || date.month() != self.month.month() {
            return None;
        }
        self.cells
            .get(date.day0() as usize)
            .map(|cell| cell.items.as_slice())
    }

    /// Days on which at least one item is available.
    pub fn busy_days(&self) -> impl Iterator<Item = &DayCell<T>> {
        self.cells.iter().filter(|cell| !cell.is_empty())
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> MonthGrid<U> {
        MonthGrid {
            month: self.month,
            leading_blanks: self.leading_blanks,
            cells: self
                .cells
                .into_iter()
                .map(|cell| DayCell {
                    date: cell.date,
                    items: cell.items.into_iter().map(&mut f).collect(),
                })
                .collect(),
        }
    }
}

impl<T: Clone> MonthGrid<&T> {
    /// Detach the grid from the borrowed catalog.
    pub fn cloned(self) -> MonthGrid<T> {
        self.map(T::clone)
    }
}
