//! Per-cycle milestone health rollup.

use chrono::NaiveDate;
use serde::Serialize;

use super::milestone::is_upcoming;
use super::records::Cycle;
use crate::domain::foundation::Status;

/// Milestone counts for one cycle.
///
/// Every milestone lands in exactly one of `complete`, `in_progress` or
/// `planned`. `overdue` and `upcoming` are independent date buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MilestoneTally {
    pub total: i64,
    pub complete: i64,
    pub in_progress: i64,
    pub planned: i64,
    pub overdue: i64,
    pub upcoming: i64,
}

impl MilestoneTally {
    /// Counts one milestone relative to `today`.
    pub fn record(&mut self, due: NaiveDate, status: &Status, today: NaiveDate, upcoming_days: u32) {
        self.total += 1;

        if status.is_complete() {
            self.complete += 1;
        } else if status.is_in_progress() {
            self.in_progress += 1;
        } else {
            self.planned += 1;
        }

        if due < today && !status.is_complete() {
            self.overdue += 1;
        }

        if is_upcoming(due, today, upcoming_days) {
            self.upcoming += 1;
        }
    }
}

/// A cycle with its milestone tally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleHealth {
    pub cycle: Cycle,
    pub milestones: MilestoneTally,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn buckets_by_status_and_date() {
        let today = date(2026, 10, 18);
        let mut tally = MilestoneTally::default();

        tally.record(date(2026, 10, 1), &Status::new("complete").unwrap(), today, 14);
        tally.record(date(2026, 10, 1), &Status::new("in-progress").unwrap(), today, 14);
        tally.record(date(2026, 10, 20), &Status::planned(), today, 14);
        tally.record(date(2027, 1, 1), &Status::new("blocked").unwrap(), today, 14);

        assert_eq!(
            tally,
            MilestoneTally {
                total: 4,
                complete: 1,
                in_progress: 1,
                planned: 2,
                overdue: 1,
                upcoming: 1,
            }
        );
    }
}
