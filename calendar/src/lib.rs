//! Month-calendar view-model for the school back-office.
//!
//! Two screens share this component: the attendance calendar and the
//! student-actions calendar. Both project a sparse set of dated records onto
//! a fixed 6-week grid: resolve the 42-day window around the focused month,
//! fetch per-day aggregates from the backend for that window, densify the
//! sparse result into exactly 42 day cells, and on a day click fetch the full
//! record list for that single date. The UI layer only handles presentation;
//! all calendar computation and fetch orchestration lives here.

pub mod api;
pub mod controller;
pub mod date_range;
pub mod export;
pub mod grid;

pub use api::{
    ActionsCalendarApi, AggregateSource, ApiClient, AttendanceCalendarApi, FetchError,
};
pub use controller::{CalendarController, CalendarSnapshot, DetailState};
pub use date_range::{resolve_month_range, MonthRange, GRID_DAYS};
pub use export::{export_month_csv, ExportError, MetricRow, MonthCsvExport};
pub use grid::{build_month_grid, DayCell};
