//! Forecast controller: keeps the forecast list consistent with the latest
//! query without issuing a request per keystroke.
//!
//! The controller is single-threaded and event-driven: the owning loop feeds
//! it query edits, sleeps on [`ForecastController::next_deadline`], and calls
//! [`ForecastController::on_deadline`] when the debounce window elapses.

use std::time::Duration;

use tokio::time::Instant;

use crate::client::ForecastSource;
use crate::model::ForecastEntry;

/// How long the query must stay unchanged before a fetch fires.
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(1000);

/// Queries shorter than this (trimmed) clear the list instead of fetching.
pub const MIN_QUERY_LEN: usize = 2;

/// Owns the query, the loading flag, the forecast list and the single-slot
/// debounce deadline.
///
/// At most one deadline is pending at a time; every query edit replaces it.
/// A fetch that has already started is never aborted mid-flight, so if a
/// second fetch begins while an earlier one is still resolving, the last
/// result to arrive wins.
pub struct ForecastController<S> {
    source: S,
    query: String,
    loading: bool,
    entries: Vec<ForecastEntry>,
    deadline: Option<Instant>,
}

impl<S: ForecastSource> ForecastController<S> {
    /// Create a controller with an initial query. Mirrors app start: the
    /// loading flag begins true and the initial query is scheduled like any
    /// other edit.
    pub fn new(source: S, initial_query: impl Into<String>) -> Self {
        let mut controller = Self {
            source,
            query: String::new(),
            loading: true,
            entries: Vec::new(),
            deadline: None,
        };
        controller.schedule(initial_query.into());
        controller
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The current forecast list, chronological in API response order.
    /// Either empty or fully populated from one response.
    pub fn entries(&self) -> &[ForecastEntry] {
        &self.entries
    }

    /// Deadline of the pending debounced fetch, if one is scheduled.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Replace the query. Cancels any pending deadline; too-short queries
    /// clear the list and schedule nothing, anything else re-arms the
    /// debounce timer. No network side effect.
    pub fn update_query(&mut self, text: impl Into<String>) {
        self.schedule(text.into());
    }

    fn schedule(&mut self, query: String) {
        self.query = query;
        self.deadline = None;

        if self.query.trim().chars().count() < MIN_QUERY_LEN {
            self.entries.clear();
            self.loading = false;
            return;
        }

        self.deadline = Some(Instant::now() + DEBOUNCE_DELAY);
    }

    /// The debounce window elapsed: run the scheduled fetch.
    pub async fn on_deadline(&mut self) {
        self.deadline = None;
        self.fetch_forecast().await;
    }

    /// Fetch the forecast for the current query and replace the list.
    ///
    /// Also the explicit-submit path. Skipped when the trimmed query is
    /// empty. Failures are logged and swallowed: the list is cleared and no
    /// error state is surfaced. The loading flag is cleared on every exit
    /// path.
    pub async fn fetch_forecast(&mut self) {
        let city = self.query.trim().to_string();
        if city.is_empty() {
            return;
        }

        self.loading = true;

        match self.source.fetch(&city).await {
            Ok(entries) => {
                self.entries = entries;
            }
            Err(e) => {
                tracing::warn!(city = %city, error = %e, "forecast fetch failed");
                self.entries.clear();
            }
        }

        self.loading = false;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::NaiveDate;

    use super::*;
    use crate::client::ClientError;

    /// Source that records every requested city and replays a fixed result.
    #[derive(Clone)]
    struct MockSource {
        calls: Arc<Mutex<Vec<String>>>,
        result: Option<Vec<ForecastEntry>>,
    }

    impl MockSource {
        fn ok(entries: Vec<ForecastEntry>) -> Self {
            Self {
                calls: Arc::default(),
                result: Some(entries),
            }
        }

        fn failing() -> Self {
            Self {
                calls: Arc::default(),
                result: None,
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ForecastSource for MockSource {
        async fn fetch(&self, city: &str) -> Result<Vec<ForecastEntry>, ClientError> {
            self.calls.lock().unwrap().push(city.to_string());
            match &self.result {
                Some(entries) => Ok(entries.clone()),
                None => Err(ClientError::UnexpectedStatus {
                    cod: "404".to_string(),
                }),
            }
        }
    }

    fn entry(hour: u32, temp: f64) -> ForecastEntry {
        ForecastEntry {
            timestamp: NaiveDate::from_ymd_opt(2024, 3, 10)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap(),
            temperature_c: temp,
            humidity_pct: 80,
            wind_speed_mps: 3.6,
            description: "light rain".to_string(),
            icon: "10d".to_string(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn short_query_clears_without_fetching() {
        let source = MockSource::ok(vec![entry(15, 21.6)]);
        let mut controller = ForecastController::new(source.clone(), "Berlin");
        controller.on_deadline().await;
        assert!(!controller.entries().is_empty());

        controller.update_query("B");

        assert!(controller.entries().is_empty());
        assert!(!controller.is_loading());
        assert!(controller.next_deadline().is_none());
        // Only the initial fetch happened.
        assert_eq!(source.calls(), vec!["Berlin"]);
    }

    #[tokio::test(start_paused = true)]
    async fn whitespace_only_query_counts_as_empty() {
        let source = MockSource::ok(vec![entry(15, 21.6)]);
        let mut controller = ForecastController::new(source.clone(), "   ");

        assert!(controller.next_deadline().is_none());
        assert!(!controller.is_loading());
        assert!(source.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_edits_fetch_only_the_last_value() {
        let source = MockSource::ok(vec![entry(15, 21.6)]);
        let mut controller = ForecastController::new(source.clone(), "Be");

        controller.update_query("Ber");
        controller.update_query("Berl");

        // One pending deadline, re-armed on each edit.
        let deadline = controller.next_deadline().expect("deadline scheduled");
        assert_eq!(deadline, Instant::now() + DEBOUNCE_DELAY);

        controller.on_deadline().await;

        assert_eq!(source.calls(), vec!["Berl"]);
        assert!(controller.next_deadline().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn success_replaces_list_in_response_order() {
        let entries = vec![entry(12, 20.0), entry(15, 21.6), entry(18, 19.2)];
        let source = MockSource::ok(entries.clone());
        let mut controller = ForecastController::new(source, "Berlin");

        controller.on_deadline().await;

        assert_eq!(controller.entries(), entries.as_slice());
        assert!(!controller.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn failure_clears_list_and_loading() {
        let mut controller = ForecastController::new(MockSource::failing(), "Berlin");
        // Pretend a previous fetch had populated the list.
        controller.entries = vec![entry(15, 21.6)];

        controller.on_deadline().await;

        assert!(controller.entries().is_empty());
        assert!(!controller.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn explicit_submit_skips_empty_query() {
        let source = MockSource::ok(vec![entry(15, 21.6)]);
        let mut controller = ForecastController::new(source.clone(), "");

        controller.fetch_forecast().await;

        assert!(source.calls().is_empty());
        assert!(controller.entries().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_fetches_are_idempotent() {
        let entries = vec![entry(12, 20.0), entry(15, 21.6)];
        let source = MockSource::ok(entries.clone());
        let mut controller = ForecastController::new(source, "Berlin");

        controller.fetch_forecast().await;
        let first = controller.entries().to_vec();
        controller.fetch_forecast().await;

        assert_eq!(first, controller.entries());
        assert_eq!(controller.entries(), entries.as_slice());
    }

    #[tokio::test(start_paused = true)]
    async fn new_controller_starts_loading_with_pending_fetch() {
        let source = MockSource::ok(vec![entry(15, 21.6)]);
        let controller = ForecastController::new(source, "Hermosillo");

        assert!(controller.is_loading());
        assert!(controller.next_deadline().is_some());
        assert!(controller.entries().is_empty());
    }
}
