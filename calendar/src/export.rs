//! CSV snapshot of the currently loaded month.
//!
//! A pure formatting transform over already-fetched day cells: no network
//! round-trip, no state carried forward. The embedding UI hands the result
//! to the browser/download layer as-is.

use csv::Writer;
use log::info;
use shared::{month_name, ActionSummary, AttendanceSummary, MonthCursor};
use thiserror::Error;

use crate::grid::DayCell;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to encode csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush csv buffer: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv buffer was not valid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Columns a per-day metric contributes to the month export.
pub trait MetricRow {
    fn headers() -> &'static [&'static str];
    fn fields(&self) -> Vec<String>;
}

impl MetricRow for AttendanceSummary {
    fn headers() -> &'static [&'static str] {
        &["total_students", "present", "absent", "attendance_rate"]
    }

    fn fields(&self) -> Vec<String> {
        let rate = self
            .attendance_rate()
            .map(|r| format!("{:.1}%", r * 100.0))
            .unwrap_or_default();
        vec![
            self.total_students.to_string(),
            self.present.to_string(),
            self.absent.to_string(),
            rate,
        ]
    }
}

impl MetricRow for ActionSummary {
    fn headers() -> &'static [&'static str] {
        &["actions"]
    }

    fn fields(&self) -> Vec<String> {
        vec![self.count.to_string()]
    }
}

/// Result of exporting one loaded month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthCsvExport {
    pub csv_content: String,
    pub filename: String,
    /// Number of day rows written (days of the focused month only).
    pub row_count: usize,
}

/// Export the focused month's cells as CSV.
///
/// Only in-month cells become rows; the leading and trailing padding days
/// belong to neighboring months and would misrepresent the export's period.
pub fn export_month_csv<M: MetricRow>(
    division_name: &str,
    cursor: MonthCursor,
    cells: &[DayCell<M>],
) -> Result<MonthCsvExport, ExportError> {
    let mut buffer = Vec::new();
    let mut row_count = 0;
    {
        let mut writer = Writer::from_writer(&mut buffer);

        let mut header = vec!["date"];
        header.extend_from_slice(M::headers());
        writer.write_record(&header)?;

        for cell in cells.iter().filter(|c| c.in_current_month) {
            let mut record = vec![cell.date_key.to_string()];
            record.extend(cell.metric.fields());
            writer.write_record(&record)?;
            row_count += 1;
        }
        writer.flush()?;
    }
    let csv_content = String::from_utf8(buffer)?;

    let filename = format!(
        "{}_{}_{}.csv",
        division_name.replace(' ', "_").to_lowercase(),
        month_name(cursor.month).to_lowercase(),
        cursor.year
    );

    info!(
        "exported {} day rows for {} {} ({} bytes) as {}",
        row_count,
        month_name(cursor.month),
        cursor.year,
        csv_content.len(),
        filename
    );

    Ok(MonthCsvExport {
        csv_content,
        filename,
        row_count,
    })
}
