//! Grid construction: densify a sparse per-day aggregate map into the fixed
//! 42-cell month grid.
//!
//! The backend only reports days that have at least one underlying record;
//! every missing key defaults to the metric's zero value so all 42 cells
//! render deterministically. Which cells get dimmed (out-of-month) or
//! highlighted (today) is carried as flags; the rendering itself is the UI
//! layer's concern.

use std::collections::HashMap;

use chrono::{Datelike, Duration, NaiveDate};
use log::debug;
use shared::{DateKey, MonthCursor};

use crate::date_range::GRID_DAYS;

/// One position in the 6x7 month grid.
#[derive(Debug, Clone, PartialEq)]
pub struct DayCell<M> {
    pub date: NaiveDate,
    pub date_key: DateKey,
    /// True iff this cell's date falls in the focused month.
    pub in_current_month: bool,
    pub is_today: bool,
    /// Aggregate for this day; the zero value when the backend reported
    /// nothing for this date.
    pub metric: M,
}

/// Build the 42-cell grid for the focused month.
///
/// `today` is passed in explicitly so the builder stays deterministic: the
/// same four inputs always yield structurally identical output. Cells outside
/// the focused month still get a real map lookup, so a leading or trailing
/// day with data is not silently zeroed.
pub fn build_month_grid<M: Clone + Default>(
    grid_start: NaiveDate,
    cursor: MonthCursor,
    aggregates: &HashMap<DateKey, M>,
    today: NaiveDate,
) -> Vec<DayCell<M>> {
    let today_key = DateKey::from_date(today);
    let mut cells = Vec::with_capacity(GRID_DAYS);

    for offset in 0..GRID_DAYS as i64 {
        let date = grid_start + Duration::days(offset);
        let date_key = DateKey::from_date(date);
        let metric = aggregates.get(&date_key).cloned().unwrap_or_default();

        cells.push(DayCell {
            in_current_month: date.month() == cursor.month && date.year() == cursor.year,
            is_today: date_key == today_key,
            date,
            date_key,
            metric,
        });
    }

    debug!(
        "built {} day cells for {}/{} from {} aggregate entries",
        cells.len(),
        cursor.month,
        cursor.year,
        aggregates.len()
    );
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date_range::resolve_month_range;
    use shared::{ActionSummary, AttendanceSummary};

    fn cursor(year: i32, month: u32) -> MonthCursor {
        MonthCursor::new(year, month).unwrap()
    }

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn key(value: &str) -> DateKey {
        DateKey::parse(value).unwrap()
    }

    #[test]
    fn test_grid_has_42_consecutive_cells() {
        let feb = cursor(2024, 2);
        let range = resolve_month_range(feb);
        let aggregates: HashMap<DateKey, ActionSummary> = HashMap::new();

        let cells = build_month_grid(range.grid_start, feb, &aggregates, ymd(2024, 2, 14));

        assert_eq!(cells.len(), 42);
        assert_eq!(cells[0].date, ymd(2024, 1, 28));
        assert_eq!(cells[41].date, ymd(2024, 3, 9));
        for pair in cells.windows(2) {
            assert_eq!(pair[1].date - pair[0].date, Duration::days(1));
        }
    }

    #[test]
    fn test_in_current_month_covers_exactly_the_focused_month() {
        let feb = cursor(2024, 2);
        let range = resolve_month_range(feb);
        let aggregates: HashMap<DateKey, ActionSummary> = HashMap::new();

        let cells = build_month_grid(range.grid_start, feb, &aggregates, ymd(2024, 2, 14));

        let in_month: Vec<NaiveDate> = cells
            .iter()
            .filter(|c| c.in_current_month)
            .map(|c| c.date)
            .collect();
        assert_eq!(in_month.first(), Some(&ymd(2024, 2, 1)));
        assert_eq!(in_month.last(), Some(&ymd(2024, 2, 29)));
        assert_eq!(in_month.len(), 29);
    }

    #[test]
    fn test_missing_keys_default_to_zero_aggregate() {
        // Single aggregate entry; every other cell must come out as the
        // zero value, never be skipped.
        let feb = cursor(2024, 2);
        let range = resolve_month_range(feb);
        let mut aggregates = HashMap::new();
        aggregates.insert(
            key("2024-02-05"),
            AttendanceSummary {
                total_students: 20,
                present: 18,
                absent: 2,
            },
        );

        let cells = build_month_grid(range.grid_start, feb, &aggregates, ymd(2024, 2, 14));

        let feb_5 = cells.iter().find(|c| c.date == ymd(2024, 2, 5)).unwrap();
        assert_eq!(feb_5.metric.present, 18);
        assert_eq!(feb_5.metric.total_students, 20);

        let with_data = cells.iter().filter(|c| c.metric.has_records()).count();
        assert_eq!(with_data, 1);
        for cell in cells.iter().filter(|c| c.date != ymd(2024, 2, 5)) {
            assert_eq!(cell.metric, AttendanceSummary::default());
        }
    }

    #[test]
    fn test_out_of_month_cells_still_get_their_aggregate() {
        // January 30th sits in February's leading padding; its data must
        // survive the lookup.
        let feb = cursor(2024, 2);
        let range = resolve_month_range(feb);
        let mut aggregates = HashMap::new();
        aggregates.insert(key("2024-01-30"), ActionSummary { count: 4 });

        let cells = build_month_grid(range.grid_start, feb, &aggregates, ymd(2024, 2, 14));

        let jan_30 = cells.iter().find(|c| c.date == ymd(2024, 1, 30)).unwrap();
        assert!(!jan_30.in_current_month);
        assert_eq!(jan_30.metric.count, 4);
    }

    #[test]
    fn test_at_most_one_today_cell() {
        let feb = cursor(2024, 2);
        let range = resolve_month_range(feb);
        let aggregates: HashMap<DateKey, ActionSummary> = HashMap::new();

        let cells = build_month_grid(range.grid_start, feb, &aggregates, ymd(2024, 2, 14));
        let todays: Vec<_> = cells.iter().filter(|c| c.is_today).collect();
        assert_eq!(todays.len(), 1);
        assert_eq!(todays[0].date, ymd(2024, 2, 14));

        // Today outside the window: no cell is flagged.
        let cells = build_month_grid(range.grid_start, feb, &aggregates, ymd(2024, 6, 1));
        assert!(cells.iter().all(|c| !c.is_today));
    }

    #[test]
    fn test_grid_build_is_idempotent() {
        let feb = cursor(2024, 2);
        let range = resolve_month_range(feb);
        let mut aggregates = HashMap::new();
        aggregates.insert(key("2024-02-05"), ActionSummary { count: 2 });
        aggregates.insert(key("2024-02-19"), ActionSummary { count: 7 });

        let today = ymd(2024, 2, 14);
        let first = build_month_grid(range.grid_start, feb, &aggregates, today);
        let second = build_month_grid(range.grid_start, feb, &aggregates, today);
        assert_eq!(first, second);
    }
}
