use std::time::Duration;

use reqwest::Client;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Shared HTTP client for uploads and stats polling.
///
/// Only the connect phase is bounded here; stats requests add their own
/// per-request timeout.
pub fn build_client() -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(concat!("canary-console/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(CONNECT_TIMEOUT)
        .build()
}
