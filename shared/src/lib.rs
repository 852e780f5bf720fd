use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical key for one calendar day: `YYYY-MM-DD` in the viewer's local
/// calendar. Every component that produces or consumes a day key goes through
/// this type, so the attendance and student-action calendars can never
/// disagree on which day a record belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateKey(String);

impl DateKey {
    /// Build the key from a local calendar date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self(format!(
            "{:04}-{:02}-{:02}",
            date.year(),
            date.month(),
            date.day()
        ))
    }

    /// Parse a `YYYY-MM-DD` string, rejecting anything that is not a real
    /// calendar date.
    pub fn parse(value: &str) -> Option<Self> {
        let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?;
        Some(Self::from_date(date))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The calendar date this key identifies.
    pub fn to_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.0, "%Y-%m-%d").ok()
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The (year, month) a calendar view is focused on. Both fields change
/// together when navigation crosses a year boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthCursor {
    pub year: i32,
    /// 1 = January .. 12 = December
    pub month: u32,
}

impl MonthCursor {
    /// Create a cursor, rejecting out-of-range months.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    /// Cursor for the real-world current month.
    pub fn current() -> Self {
        let now = chrono::Local::now();
        Self {
            year: now.year(),
            month: now.month(),
        }
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn previous(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }
}

impl Default for MonthCursor {
    fn default() -> Self {
        Self::current()
    }
}

/// Get the human-readable name for a month number.
pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Invalid Month",
    }
}

/// Format a date key for human-readable display (e.g., "March 5, 2024").
pub fn format_date_for_display(key: &DateKey) -> String {
    match key.to_date() {
        Some(date) => format!("{} {}, {}", month_name(date.month()), date.day(), date.year()),
        None => key.to_string(),
    }
}

/// A division (class group) as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Division {
    pub id: String,
    pub name: String,
}

/// Per-day attendance roll-up for one division.
///
/// The zero value (all counts zero) is what a day with no recorded
/// attendance renders as; the backend never sends explicit zero rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AttendanceSummary {
    pub total_students: u32,
    pub present: u32,
    pub absent: u32,
}

impl AttendanceSummary {
    /// Whether any attendance was actually recorded for this day.
    pub fn has_records(&self) -> bool {
        self.total_students > 0 || self.present > 0 || self.absent > 0
    }

    /// Fraction of students present, or `None` when nothing was recorded.
    pub fn attendance_rate(&self) -> Option<f64> {
        if self.total_students == 0 {
            None
        } else {
            Some(f64::from(self.present) / f64::from(self.total_students))
        }
    }
}

/// Per-day student-action roll-up for one division.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionSummary {
    pub count: u32,
}

impl ActionSummary {
    pub fn has_records(&self) -> bool {
        self.count > 0
    }
}

/// Attendance status of a single student on a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttendanceStatus {
    Present,
    Absent,
}

/// One student's attendance row for a single day (drill-down record).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceEntry {
    pub student_id: String,
    pub student_name: String,
    pub status: AttendanceStatus,
    /// Optional note left by the teacher taking attendance.
    pub note: Option<String>,
}

/// One logged student action (drill-down record).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentAction {
    pub id: String,
    pub student_id: String,
    pub student_name: String,
    /// Action category as configured in the back office (e.g. "merit",
    /// "incident").
    pub category: String,
    pub description: String,
    /// Timestamp with timezone (RFC 3339), as stored by the backend.
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_key_from_date() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 5).unwrap();
        assert_eq!(DateKey::from_date(date).as_str(), "2024-02-05");
    }

    #[test]
    fn test_date_key_zero_pads() {
        let date = NaiveDate::from_ymd_opt(987, 3, 4).unwrap();
        assert_eq!(DateKey::from_date(date).as_str(), "0987-03-04");
    }

    #[test]
    fn test_date_key_parse() {
        assert_eq!(DateKey::parse("2024-02-29").unwrap().as_str(), "2024-02-29");
        assert!(DateKey::parse("2023-02-29").is_none()); // not a leap year
        assert!(DateKey::parse("2024-13-01").is_none());
        assert!(DateKey::parse("not-a-date").is_none());
    }

    #[test]
    fn test_date_key_round_trips_through_date() {
        let key = DateKey::parse("2024-12-31").unwrap();
        assert_eq!(
            key.to_date().unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()
        );
    }

    #[test]
    fn test_date_key_serializes_as_plain_string() {
        let key = DateKey::parse("2024-02-05").unwrap();
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"2024-02-05\"");
    }

    #[test]
    fn test_month_cursor_validation() {
        assert!(MonthCursor::new(2024, 0).is_none());
        assert!(MonthCursor::new(2024, 13).is_none());
        assert_eq!(
            MonthCursor::new(2024, 2),
            Some(MonthCursor {
                year: 2024,
                month: 2
            })
        );
    }

    #[test]
    fn test_month_cursor_navigation() {
        let june = MonthCursor::new(2025, 6).unwrap();
        assert_eq!(june.next(), MonthCursor::new(2025, 7).unwrap());
        assert_eq!(june.previous(), MonthCursor::new(2025, 5).unwrap());

        // Year rollover in both directions
        let december = MonthCursor::new(2025, 12).unwrap();
        assert_eq!(december.next(), MonthCursor::new(2026, 1).unwrap());
        let january = MonthCursor::new(2025, 1).unwrap();
        assert_eq!(january.previous(), MonthCursor::new(2024, 12).unwrap());
    }

    #[test]
    fn test_month_name() {
        assert_eq!(month_name(1), "January");
        assert_eq!(month_name(12), "December");
        assert_eq!(month_name(13), "Invalid Month");
    }

    #[test]
    fn test_format_date_for_display() {
        let key = DateKey::parse("2024-03-05").unwrap();
        assert_eq!(format_date_for_display(&key), "March 5, 2024");
    }

    #[test]
    fn test_attendance_rate() {
        let summary = AttendanceSummary {
            total_students: 20,
            present: 18,
            absent: 2,
        };
        assert_eq!(summary.attendance_rate(), Some(0.9));
        assert!(summary.has_records());

        let empty = AttendanceSummary::default();
        assert_eq!(empty.attendance_rate(), None);
        assert!(!empty.has_records());
    }

    #[test]
    fn test_action_summary_zero_is_default() {
        assert_eq!(ActionSummary::default(), ActionSummary { count: 0 });
        assert!(!ActionSummary::default().has_records());
        assert!(ActionSummary { count: 3 }.has_records());
    }
}
