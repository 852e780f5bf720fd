//! Backend fetchers for the calendar screens.
//!
//! The REST backend is an external collaborator; this module owns only the
//! read-side contract the calendars need: a sparse per-day aggregate map for
//! a date range, the full record list for one day, and the division listing
//! that populates the selector. Fetchers never retry and never guard on
//! aggregate values; callers decide when a request is worth issuing.

use std::collections::HashMap;

use async_trait::async_trait;
use log::debug;
use serde::de::DeserializeOwned;
use shared::{
    ActionSummary, AttendanceEntry, AttendanceSummary, DateKey, Division, StudentAction,
};
use thiserror::Error;

/// Failure surfaced by a backend fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced an HTTP response.
    #[error("network error: {0}")]
    Network(reqwest::Error),
    /// The backend answered with a non-success status.
    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },
    /// The response body was not the expected JSON shape.
    #[error("failed to decode backend response: {0}")]
    Decode(String),
}

/// HTTP client for the school back-office REST API.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client with the default base URL.
    pub fn new() -> Self {
        Self::with_base_url("http://localhost:3000".to_string())
    }

    /// Create a new API client with a custom base URL.
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// List the divisions the signed-in staff member can see.
    pub async fn list_divisions(&self) -> Result<Vec<Division>, FetchError> {
        self.get_json(format!("{}/api/divisions", self.base_url)).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, FetchError> {
        debug!("GET {}", url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(FetchError::Network)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(FetchError::Status { status, body });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Backend contract shared by the attendance and student-actions calendars.
///
/// `fetch_aggregates` returns only dates that have at least one underlying
/// record; callers must never assume the map covers every day in range.
/// `fetch_day_detail` always issues the request when called, and an empty
/// result is valid (the aggregate may have been stale by click time).
#[async_trait]
pub trait AggregateSource: Send + Sync {
    type Metric: Clone + Default + Send + Sync + 'static;
    type Record: Clone + Send + Sync + 'static;

    async fn fetch_aggregates(
        &self,
        division_id: &str,
        start: &DateKey,
        end: &DateKey,
    ) -> Result<HashMap<DateKey, Self::Metric>, FetchError>;

    async fn fetch_day_detail(
        &self,
        division_id: &str,
        date: &DateKey,
    ) -> Result<Vec<Self::Record>, FetchError>;
}

fn summary_url(base_url: &str, path: &str, division_id: &str, start: &DateKey, end: &DateKey) -> String {
    format!(
        "{}/api/{}/summary?division_id={}&start={}&end={}",
        base_url, path, division_id, start, end
    )
}

fn detail_url(base_url: &str, path: &str, division_id: &str, date: &DateKey) -> String {
    format!(
        "{}/api/{}/day?division_id={}&date={}",
        base_url, path, division_id, date
    )
}

/// Attendance-calendar endpoints.
#[derive(Clone)]
pub struct AttendanceCalendarApi {
    client: ApiClient,
}

impl AttendanceCalendarApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AggregateSource for AttendanceCalendarApi {
    type Metric = AttendanceSummary;
    type Record = AttendanceEntry;

    async fn fetch_aggregates(
        &self,
        division_id: &str,
        start: &DateKey,
        end: &DateKey,
    ) -> Result<HashMap<DateKey, AttendanceSummary>, FetchError> {
        let url = summary_url(&self.client.base_url, "attendance", division_id, start, end);
        self.client.get_json(url).await
    }

    async fn fetch_day_detail(
        &self,
        division_id: &str,
        date: &DateKey,
    ) -> Result<Vec<AttendanceEntry>, FetchError> {
        let url = detail_url(&self.client.base_url, "attendance", division_id, date);
        self.client.get_json(url).await
    }
}

/// Student-actions-calendar endpoints.
#[derive(Clone)]
pub struct ActionsCalendarApi {
    client: ApiClient,
}

impl ActionsCalendarApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AggregateSource for ActionsCalendarApi {
    type Metric = ActionSummary;
    type Record = StudentAction;

    async fn fetch_aggregates(
        &self,
        division_id: &str,
        start: &DateKey,
        end: &DateKey,
    ) -> Result<HashMap<DateKey, ActionSummary>, FetchError> {
        let url = summary_url(&self.client.base_url, "student-actions", division_id, start, end);
        self.client.get_json(url).await
    }

    async fn fetch_day_detail(
        &self,
        division_id: &str,
        date: &DateKey,
    ) -> Result<Vec<StudentAction>, FetchError> {
        let url = detail_url(&self.client.base_url, "student-actions", division_id, date);
        self.client.get_json(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_url_shape() {
        let start = DateKey::parse("2024-01-28").unwrap();
        let end = DateKey::parse("2024-03-09").unwrap();
        assert_eq!(
            summary_url("http://localhost:3000", "attendance", "div-7", &start, &end),
            "http://localhost:3000/api/attendance/summary?division_id=div-7&start=2024-01-28&end=2024-03-09"
        );
    }

    #[test]
    fn test_detail_url_shape() {
        let date = DateKey::parse("2024-02-05").unwrap();
        assert_eq!(
            detail_url("http://localhost:3000", "student-actions", "div-7", &date),
            "http://localhost:3000/api/student-actions/day?division_id=div-7&date=2024-02-05"
        );
    }

    #[test]
    fn test_fetch_error_messages() {
        let status = FetchError::Status {
            status: 503,
            body: "maintenance".to_string(),
        };
        assert_eq!(status.to_string(), "backend returned 503: maintenance");

        let decode = FetchError::Decode("missing field `present`".to_string());
        assert!(decode.to_string().contains("missing field `present`"));
    }

    #[test]
    fn test_sparse_summary_map_decodes() {
        // The backend omits days without records; the map must come back
        // sparse, not padded.
        let body = r#"{"2024-02-05":{"total_students":20,"present":18,"absent":2}}"#;
        let map: HashMap<DateKey, AttendanceSummary> = serde_json::from_str(body).unwrap();
        assert_eq!(map.len(), 1);
        let key = DateKey::parse("2024-02-05").unwrap();
        assert_eq!(map.get(&key).unwrap().present, 18);
    }
}
