use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};

use crate::calendar::{month_grid, MonthGrid};
use crate::error::PickerError;

/// Per-picker memoization of month grids plus the navigation cursor.
///
/// Each picker instance owns exactly one cache; nothing here is shared
/// between instances, so navigating one picker can never disturb
/// another. Grids are memoized for the life of the cache — a month, once
/// computed, is never recomputed.
#[derive(Debug, Default)]
pub struct MonthCache {
    years:  HashMap<i32, HashMap<u32, MonthGrid>>,
    cursor: Option<NaiveDate>,
}

impl MonthCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Memoized grid fetch for the month containing `date`. Sets the
    /// cursor to the first of that month and returns `date` unchanged
    /// alongside the grid.
    pub fn get(&mut self, date: NaiveDate) -> (NaiveDate, MonthGrid) {
        let year  = date.year();
        let month = date.month();
        self.cursor = NaiveDate::from_ymd_opt(year, month, 1);

        let months = self.years.entry(year).or_default();
        if let Some(grid) = months.get(&month) {
            tracing::debug!(year, month, "month cache hit");
            return (date, *grid);
        }

        let (_, grid) = month_grid(date);
        months.insert(month, grid);
        tracing::debug!(year, month, "month grid computed");
        (date, grid)
    }

    /// Grid for the month before the cursor. Requires a prior `get`.
    pub fn previous(&mut self) -> Result<(NaiveDate, MonthGrid), PickerError> {
        let cursor = self.cursor.ok_or(PickerError::UninitializedCursor("previous"))?;
        Ok(self.get(step_month(cursor, -1)))
    }

    /// Grid for the month after the cursor. Requires a prior `get`.
    pub fn next(&mut self) -> Result<(NaiveDate, MonthGrid), PickerError> {
        let cursor = self.cursor.ok_or(PickerError::UninitializedCursor("next"))?;
        Ok(self.get(step_month(cursor, 1)))
    }

    /// First-of-month the next navigation steps from, if any `get` ran.
    pub fn cursor(&self) -> Option<NaiveDate> {
        self.cursor
    }

    /// Number of months memoized so far.
    pub fn len(&self) -> usize {
        self.years.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One month forward or back from a first-of-month date, rolling the
/// year over at the boundaries.
fn step_month(first: NaiveDate, delta: i32) -> NaiveDate {
    let mut year  = first.year();
    let mut month = first.month();
    if delta > 0 {
        if month == 12 { month = 1; year += 1; } else { month += 1; }
    } else if month == 1 {
        month = 12;
        year -= 1;
    } else {
        month -= 1;
    }
    NaiveDate::from_ymd_opt(year, month, 1).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn get_sets_cursor_to_first_of_month() {
        let mut cache = MonthCache::new();
        let (date, _) = cache.get(ymd(2024, 6, 15));
        assert_eq!(date, ymd(2024, 6, 15));
        assert_eq!(cache.cursor(), Some(ymd(2024, 6, 1)));
    }

    #[test]
    fn navigation_requires_a_prior_get() {
        let mut cache = MonthCache::new();
        let err = cache.next().unwrap_err();
        assert!(err.to_string().contains("next"));
        let err = cache.previous().unwrap_err();
        assert!(err.to_string().contains("previous"));
    }

    #[test]
    fn previous_crosses_the_year_boundary() {
        let mut cache = MonthCache::new();
        cache.get(ymd(2024, 1, 15));
        let (date, _) = cache.previous().unwrap();
        assert_eq!(date, ymd(2023, 12, 1));
    }

    #[test]
    fn next_crosses_the_year_boundary() {
        let mut cache = MonthCache::new();
        cache.get(ymd(2024, 12, 15));
        let (date, _) = cache.next().unwrap();
        assert_eq!(date, ymd(2025, 1, 1));
    }

    #[test]
    fn navigation_walks_month_by_month() {
        let mut cache = MonthCache::new();
        cache.get(ymd(2024, 1, 1));
        cache.next().unwrap();
        cache.next().unwrap();
        let (date, _) = cache.next().unwrap();
        assert_eq!(date, ymd(2024, 4, 1));
    }

    #[test]
    fn next_then_previous_returns_the_same_grid_without_recompute() {
        let mut cache = MonthCache::new();
        let (_, march) = cache.get(ymd(2024, 3, 10));
        cache.next().unwrap();
        assert_eq!(cache.len(), 2);
        let (date, back) = cache.previous().unwrap();
        assert_eq!(date, ymd(2024, 3, 1));
        assert_eq!(back, march);
        // Both months were already memoized; nothing new was computed.
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn repeated_get_is_memoized() {
        let mut cache = MonthCache::new();
        let (_, a) = cache.get(ymd(2024, 1, 1));
        let (_, b) = cache.get(ymd(2024, 1, 31));
        assert_eq!(a, b);
        assert_eq!(cache.len(), 1);
    }
}
