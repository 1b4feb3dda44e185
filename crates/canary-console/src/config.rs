use std::time::Duration;

pub const UPLOAD_PATH: &str = "/upload";
pub const STATS_PATH: &str = "/api/model-stats";
pub const SUCCESS_PATH: &str = "/success";
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Multipart field the upload endpoint reads the model file from.
pub const UPLOAD_FIELD: &str = "model";

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 5_000;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
/// Accuracy, latency and traffic cards each carry a timestamp.
pub const DEFAULT_TIMESTAMP_SLOTS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub base_url: String,
    pub poll_interval: Duration,
    /// Applied to stats fetches only; uploads of large models are not capped.
    pub request_timeout: Duration,
    pub timestamp_slots: usize,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            timestamp_slots: DEFAULT_TIMESTAMP_SLOTS,
        }
    }
}

impl ConsoleConfig {
    /// Join an endpoint path onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    pub fn upload_url(&self) -> String {
        self.url(UPLOAD_PATH)
    }

    pub fn stats_url(&self) -> String {
        self.url(STATS_PATH)
    }
}

pub fn build_config(
    base_url: &str,
    poll_interval_ms: Option<u64>,
    timeout_secs: Option<u64>,
    timestamp_slots: Option<usize>,
) -> ConsoleConfig {
    let defaults = ConsoleConfig::default();
    ConsoleConfig {
        base_url: base_url.to_string(),
        // tokio intervals cannot tick at zero
        poll_interval: poll_interval_ms
            .map(|ms| Duration::from_millis(ms.max(1)))
            .unwrap_or(defaults.poll_interval),
        request_timeout: timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout),
        timestamp_slots: timestamp_slots.unwrap_or(defaults.timestamp_slots),
    }
}
