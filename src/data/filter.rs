use std::mem::replace;

use chrono::NaiveDate;

use super::model::{format_date, ObservationTable};
use crate::error::{DashboardError, Result};

// ---------------------------------------------------------------------------
// Date selection: what the user has picked so far
// ---------------------------------------------------------------------------

/// Endpoints picked in a date-range widget. Either may still be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateSelection {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateSelection {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Turn the selection into a range.
    ///
    /// Both endpoints must be set and ordered; otherwise the page shows the
    /// error and stops instead of filtering on half a range.
    pub fn resolve(&self) -> Result<DateRange> {
        match (self.start, self.end) {
            (Some(start), Some(end)) if start <= end => Ok(DateRange(start, end)),
            (Some(start), Some(end)) => Err(DashboardError::InvertedRange {
                start: format_date(start),
                end: format_date(end),
            }),
            _ => Err(DashboardError::IncompleteRange),
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

// ---------------------------------------------------------------------------
// DateRange: inclusive range that iterates day by day
// ---------------------------------------------------------------------------

/// Inclusive `[start, end]` range of days.
#[derive(Clone, Eq, PartialEq, Copy, Debug)]
pub struct DateRange(pub NaiveDate, pub NaiveDate);

impl DateRange {
    pub fn start(&self) -> NaiveDate {
        self.0
    }

    pub fn end(&self) -> NaiveDate {
        self.1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.0 <= date && date <= self.1
    }

    /// Number of days in the range, both ends counted.
    pub fn days(&self) -> usize {
        if self.0 > self.1 {
            0
        } else {
            (self.1 - self.0).num_days() as usize + 1
        }
    }

    /// Intersect with a page's allowed window. `None` when they do not overlap.
    pub fn clamp_to(&self, window: DateRange) -> Option<DateRange> {
        let start = self.0.max(window.0);
        let end = self.1.min(window.1);
        (start <= end).then_some(DateRange(start, end))
    }
}

impl Iterator for DateRange {
    type Item = NaiveDate;
    fn next(&mut self) -> Option<Self::Item> {
        if self.0 <= self.1 {
            let next = self.0.succ_opt()?;
            Some(replace(&mut self.0, next))
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Row filtering
// ---------------------------------------------------------------------------

/// Indices of rows whose date lies in `range`, in table order.
pub fn filtered_indices(table: &ObservationTable, range: DateRange) -> Vec<usize> {
    table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| range.contains(row.date))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::data::model::{Feature, Observation};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn table(dates: &[NaiveDate]) -> ObservationTable {
        let rows = dates
            .iter()
            .enumerate()
            .map(|(i, &d)| Observation {
                date: d,
                values: BTreeMap::from([(Feature::T2m, i as f64)]),
                status: None,
            })
            .collect();
        ObservationTable::new(rows, vec![Feature::T2m], None)
    }

    #[test]
    fn filter_is_inclusive_on_both_ends() {
        let t = table(&[
            date(2024, 1, 1),
            date(2024, 1, 2),
            date(2024, 1, 3),
            date(2024, 1, 4),
        ]);
        let idx = filtered_indices(&t, DateRange(date(2024, 1, 2), date(2024, 1, 3)));
        assert_eq!(idx, vec![1, 2]);
    }

    #[test]
    fn filter_preserves_table_order() {
        let t = table(&[
            date(2024, 3, 5),
            date(2024, 1, 1),
            date(2024, 3, 1),
            date(2023, 12, 31),
        ]);
        let idx = filtered_indices(&t, DateRange(date(2024, 1, 1), date(2024, 3, 31)));
        assert_eq!(idx, vec![0, 1, 2]);
    }

    #[test]
    fn single_day_range_matches_that_day_only() {
        let t = table(&[date(2024, 1, 1), date(2024, 1, 2)]);
        let idx = filtered_indices(&t, DateRange(date(2024, 1, 1), date(2024, 1, 1)));
        assert_eq!(idx, vec![0]);
    }

    #[test]
    fn incomplete_selection_is_an_error() {
        assert!(matches!(
            DateSelection::default().resolve(),
            Err(DashboardError::IncompleteRange)
        ));
        let half = DateSelection {
            start: Some(date(2024, 1, 1)),
            end: None,
        };
        assert!(matches!(half.resolve(), Err(DashboardError::IncompleteRange)));
    }

    #[test]
    fn inverted_selection_is_an_error() {
        let sel = DateSelection::new(date(2024, 2, 1), date(2024, 1, 1));
        assert!(matches!(
            sel.resolve(),
            Err(DashboardError::InvertedRange { .. })
        ));
    }

    #[test]
    fn range_iterates_every_day_across_month_end() {
        let days: Vec<_> = DateRange(date(2024, 2, 28), date(2024, 3, 1)).collect();
        assert_eq!(
            days,
            vec![date(2024, 2, 28), date(2024, 2, 29), date(2024, 3, 1)]
        );
        assert_eq!(DateRange(date(2024, 2, 28), date(2024, 3, 1)).days(), 3);
    }

    #[test]
    fn clamp_to_window() {
        let window = DateRange(date(2024, 1, 1), date(2025, 12, 31));
        let r = DateRange(date(2023, 6, 1), date(2024, 2, 1));
        assert_eq!(
            r.clamp_to(window),
            Some(DateRange(date(2024, 1, 1), date(2024, 2, 1)))
        );
        let outside = DateRange(date(2026, 1, 1), date(2026, 2, 1));
        assert_eq!(outside.clamp_to(window), None);
    }
}
