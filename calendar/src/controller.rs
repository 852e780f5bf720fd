//! Calendar controller: owns the month cursor, the selected division, the
//! last rendered grid and the drill-down state machine.
//!
//! All state lives behind one `Arc<Mutex<..>>` owned by the component
//! instance; the UI event loop is the only writer. The two suspend points
//! are the aggregate fetch and the day-detail fetch, and each is tagged with
//! a request generation captured before the await: navigation, a division
//! change or a newer request bumps the generation, so a slow response for a
//! month the user already left is discarded instead of overwriting the grid.

use std::sync::{Arc, Mutex};

use chrono::{Local, NaiveDate};
use log::{debug, info, warn};
use shared::{DateKey, MonthCursor};

use crate::api::AggregateSource;
use crate::date_range::resolve_month_range;
use crate::grid::{build_month_grid, DayCell};

/// Drill-down modal state, driven by `open_day` / `close_detail`.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailState<R> {
    Idle,
    Loading {
        date: DateKey,
    },
    Open {
        date: DateKey,
        records: Vec<R>,
    },
    /// Transient fetch failure; the grid stays interactive.
    Error {
        date: DateKey,
        message: String,
    },
}

/// Snapshot of everything the embedding screen needs to render.
#[derive(Debug, Clone)]
pub struct CalendarSnapshot<M, R> {
    pub cursor: MonthCursor,
    pub division_id: Option<String>,
    pub loading: bool,
    /// Last aggregate-fetch failure; cleared on the next successful load.
    pub error: Option<String>,
    /// Last successfully built grid; `None` until the first load completes
    /// for the current cursor and division.
    pub cells: Option<Vec<DayCell<M>>>,
    pub detail: DetailState<R>,
}

struct CalendarState<M, R> {
    cursor: MonthCursor,
    division_id: Option<String>,
    fetch_generation: u64,
    detail_generation: u64,
    loading: bool,
    error: Option<String>,
    cells: Option<Vec<DayCell<M>>>,
    detail: DetailState<R>,
}

/// Controller for one calendar screen (attendance or student actions).
pub struct CalendarController<S: AggregateSource> {
    source: S,
    state: Arc<Mutex<CalendarState<S::Metric, S::Record>>>,
}

impl<S: AggregateSource> CalendarController<S> {
    /// Create a controller focused on the real-world current month.
    pub fn new(source: S) -> Self {
        Self::with_cursor(source, MonthCursor::current())
    }

    pub fn with_cursor(source: S, cursor: MonthCursor) -> Self {
        Self {
            source,
            state: Arc::new(Mutex::new(CalendarState {
                cursor,
                division_id: None,
                fetch_generation: 0,
                detail_generation: 0,
                loading: false,
                error: None,
                cells: None,
                detail: DetailState::Idle,
            })),
        }
    }

    /// Current render state. Cloned out so the lock is never held while the
    /// UI draws.
    pub fn snapshot(&self) -> CalendarSnapshot<S::Metric, S::Record> {
        let state = self.state.lock().unwrap();
        CalendarSnapshot {
            cursor: state.cursor,
            division_id: state.division_id.clone(),
            loading: state.loading,
            error: state.error.clone(),
            cells: state.cells.clone(),
            detail: state.detail.clone(),
        }
    }

    pub fn cursor(&self) -> MonthCursor {
        self.state.lock().unwrap().cursor
    }

    /// Focus an explicit month. The grid for the previous cursor is dropped
    /// immediately so a navigation is never answered with another month's
    /// data, and any in-flight fetch is invalidated.
    pub fn set_month(&self, year: i32, month: u32) -> Result<MonthCursor, String> {
        let cursor = MonthCursor::new(year, month)
            .ok_or_else(|| format!("Invalid month: {}. Must be between 1 and 12", month))?;
        let mut state = self.state.lock().unwrap();
        apply_cursor(&mut state, cursor);
        Ok(cursor)
    }

    pub fn navigate_next_month(&self) -> MonthCursor {
        let mut state = self.state.lock().unwrap();
        let next = state.cursor.next();
        apply_cursor(&mut state, next);
        next
    }

    pub fn navigate_previous_month(&self) -> MonthCursor {
        let mut state = self.state.lock().unwrap();
        let previous = state.cursor.previous();
        apply_cursor(&mut state, previous);
        previous
    }

    /// Switch the division the calendar is scoped to. Clears the grid, any
    /// fetch error and the drill-down, and invalidates in-flight fetches.
    pub fn select_division(&self, division_id: impl Into<String>) {
        let mut state = self.state.lock().unwrap();
        state.division_id = Some(division_id.into());
        state.fetch_generation += 1;
        state.detail_generation += 1;
        state.cells = None;
        state.error = None;
        state.loading = false;
        state.detail = DetailState::Idle;
    }

    /// Load the aggregates for the focused month and rebuild the grid.
    pub async fn refresh(&self) {
        self.refresh_with_today(Local::now().date_naive()).await;
    }

    /// Like `refresh`, but with "today" supplied explicitly so the result is
    /// deterministic under test.
    pub async fn refresh_with_today(&self, today: NaiveDate) {
        let (cursor, division_id, generation) = {
            let mut state = self.state.lock().unwrap();
            let division_id = match &state.division_id {
                Some(id) => id.clone(),
                None => {
                    // The division guard lives here, at the call site; the
                    // fetcher itself accepts whatever it is handed.
                    warn!("calendar refresh requested with no division selected");
                    return;
                }
            };
            state.fetch_generation += 1;
            state.loading = true;
            (state.cursor, division_id, state.fetch_generation)
        };

        let range = resolve_month_range(cursor);
        let start = DateKey::from_date(range.grid_start);
        let end = DateKey::from_date(range.grid_end);
        info!(
            "loading calendar aggregates for {}/{} ({} .. {})",
            cursor.month, cursor.year, start, end
        );

        let result = self
            .source
            .fetch_aggregates(&division_id, &start, &end)
            .await;

        let mut state = self.state.lock().unwrap();
        if state.fetch_generation != generation || state.cursor != cursor {
            debug!(
                "discarding stale aggregate response for {}/{}",
                cursor.month, cursor.year
            );
            return;
        }
        state.loading = false;
        match result {
            Ok(aggregates) => {
                info!(
                    "calendar aggregates loaded: {} dated entries for {}/{}",
                    aggregates.len(),
                    cursor.month,
                    cursor.year
                );
                state.cells = Some(build_month_grid(range.grid_start, cursor, &aggregates, today));
                state.error = None;
            }
            Err(e) => {
                // Keep the last rendered grid; only the error banner changes.
                warn!("calendar aggregate fetch failed: {}", e);
                state.error = Some(e.to_string());
            }
        }
    }

    /// Fetch and show the full record list for one day.
    ///
    /// No zero-aggregate guard here: if called, the request is issued, and an
    /// empty record list is a valid, renderable result. Whether a zero day is
    /// worth clicking is the embedding UI's decision.
    pub async fn open_day(&self, date: DateKey) {
        let (division_id, generation) = {
            let mut state = self.state.lock().unwrap();
            let division_id = match &state.division_id {
                Some(id) => id.clone(),
                None => {
                    warn!("day drill-down requested with no division selected");
                    return;
                }
            };
            state.detail_generation += 1;
            state.detail = DetailState::Loading { date: date.clone() };
            (division_id, state.detail_generation)
        };

        debug!("loading day detail for {}", date);
        let result = self.source.fetch_day_detail(&division_id, &date).await;

        let mut state = self.state.lock().unwrap();
        if state.detail_generation != generation {
            // The modal was closed or another day was selected while this
            // response was in flight.
            debug!("discarding stale day-detail response for {}", date);
            return;
        }
        state.detail = match result {
            Ok(records) => {
                info!("day detail loaded: {} records for {}", records.len(), date);
                DetailState::Open { date, records }
            }
            Err(e) => {
                warn!("day detail fetch failed for {}: {}", date, e);
                DetailState::Error {
                    date,
                    message: e.to_string(),
                }
            }
        };
    }

    /// Dismiss the drill-down. Any in-flight detail response is discarded
    /// when it eventually resolves, not merely hidden.
    pub fn close_detail(&self) {
        let mut state = self.state.lock().unwrap();
        state.detail_generation += 1;
        state.detail = DetailState::Idle;
    }
}

fn apply_cursor<M, R>(state: &mut CalendarState<M, R>, cursor: MonthCursor) {
    state.cursor = cursor;
    state.fetch_generation += 1;
    state.cells = None;
    state.error = None;
    state.loading = false;
}
