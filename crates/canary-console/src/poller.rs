use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use canary_common::{MetricsSnapshot, ModelStats};
use chrono::Local;
use reqwest::Client;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::config::{ConsoleConfig, DASHBOARD_PATH};
use crate::error::PollError;
use crate::page::SharedPage;

/// Whether a page at `path` gets a dashboard poller. Exact match only.
pub fn should_activate(path: &str) -> bool {
    path == DASHBOARD_PATH
}

/// Local wall-clock time at second precision.
fn local_timestamp() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

#[derive(Debug, Clone)]
pub struct DashboardPoller {
    client: Client,
    stats_url: String,
    interval: Duration,
    timeout: Duration,
    page: SharedPage,
}

impl DashboardPoller {
    pub fn new(client: Client, config: &ConsoleConfig, page: SharedPage) -> Self {
        Self {
            client,
            stats_url: config.stats_url(),
            interval: config.poll_interval,
            timeout: config.request_timeout,
            page,
        }
    }

    pub async fn fetch(&self) -> Result<ModelStats, PollError> {
        let body = self
            .client
            .get(&self.stats_url)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(ModelStats::decode(&body)?)
    }

    /// One poll cycle. On error the page is left untouched.
    pub async fn poll_once(&self) -> Result<MetricsSnapshot, PollError> {
        let stats = self.fetch().await?;
        let snapshot = MetricsSnapshot {
            stats,
            retrieved_at: local_timestamp(),
        };
        self.page.lock().await.render_metrics(&snapshot);
        Ok(snapshot)
    }

    /// Start polling: one cycle now, then one per interval until the
    /// returned handle is shut down or dropped.
    ///
    /// Cycles run inline, so a slow fetch delays the next tick instead of
    /// overlapping it; ticks missed meanwhile are skipped.
    pub fn spawn(self) -> PollerHandle {
        let cancel = CancellationToken::new();
        let cycles = Arc::new(AtomicU64::new(0));
        let task = tokio::spawn(self.run(cancel.clone(), cycles.clone()));
        PollerHandle {
            cancel,
            cycles,
            task: Some(task),
        }
    }

    async fn run(self, cancel: CancellationToken, cycles: Arc<AtomicU64>) {
        tracing::info!(url = %self.stats_url, interval_ms = self.interval.as_millis() as u64, "dashboard poller started");
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }
            let result = tokio::select! {
                _ = cancel.cancelled() => break,
                result = self.poll_once() => result,
            };
            let cycle = cycles.fetch_add(1, Ordering::Relaxed) + 1;
            match result {
                Ok(snapshot) => tracing::debug!(
                    cycle,
                    accuracy = snapshot.stats.accuracy,
                    latency = snapshot.stats.latency,
                    traffic_split = snapshot.stats.traffic_split,
                    "dashboard refreshed"
                ),
                Err(e) => tracing::warn!(cycle, error = %e, "dashboard update failed"),
            }
        }
        tracing::info!("dashboard poller stopped");
    }
}

/// Owns a running poller. Dropping it cancels the loop.
#[derive(Debug)]
pub struct PollerHandle {
    cancel: CancellationToken,
    cycles: Arc<AtomicU64>,
    task: Option<JoinHandle<()>>,
}

impl PollerHandle {
    /// Completed poll cycles, successful or not.
    pub fn cycles(&self) -> u64 {
        self.cycles.load(Ordering::Relaxed)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Cancel the loop and wait for it to exit.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "dashboard poller task failed");
            }
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
