//! Date-range resolution for the month grid.
//!
//! Pure calendar arithmetic, no I/O: given the focused month, compute the
//! first and last day of that month plus the fixed 42-day window the grid
//! renders (starting on the Sunday on or before the 1st).

use chrono::{Datelike, Duration, NaiveDate};
use shared::MonthCursor;

/// The grid always shows 6 full weeks.
pub const GRID_DAYS: usize = 42;

/// Resolved window for one focused month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthRange {
    /// First day of the focused month.
    pub month_start: NaiveDate,
    /// Last day of the focused month.
    pub month_end: NaiveDate,
    /// First grid cell; always a Sunday, possibly in the prior month.
    pub grid_start: NaiveDate,
    /// Last grid cell; `grid_start + 41` days.
    pub grid_end: NaiveDate,
}

/// Resolve the grid window for a focused month.
///
/// Total over all valid cursors, including December-to-January rollover.
/// Out-of-range months are clamped rather than panicking.
pub fn resolve_month_range(cursor: MonthCursor) -> MonthRange {
    let month = cursor.month.clamp(1, 12);
    let month_start = NaiveDate::from_ymd_opt(cursor.year, month, 1)
        .expect("day 1 of a clamped month is always representable");

    let (next_year, next_month) = if month == 12 {
        (cursor.year + 1, 1)
    } else {
        (cursor.year, month + 1)
    };
    let month_end = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .expect("day 1 of a clamped month is always representable")
        - Duration::days(1);

    // chrono's num_days_from_sunday gives Sunday = 0, matching the grid's
    // week layout, so subtracting it always lands grid_start on a Sunday.
    let offset = i64::from(month_start.weekday().num_days_from_sunday());
    let grid_start = month_start - Duration::days(offset);
    let grid_end = grid_start + Duration::days(GRID_DAYS as i64 - 1);

    MonthRange {
        month_start,
        month_end,
        grid_start,
        grid_end,
    }
}
