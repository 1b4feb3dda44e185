//! In-process view model of the console page.
//!
//! Mirrors the element contract the upload and dashboard logic depend on.
//! Every mutation bumps a revision on a `watch` channel so renderers can
//! redraw without polling.

use std::sync::Arc;

use canary_common::{MetricsSnapshot, TransferProgress};
use tokio::sync::{watch, Mutex};

pub type SharedPage = Arc<Mutex<Page>>;

/// Element ids of the page contract.
pub mod element {
    pub const UPLOAD_FORM: &str = "upload-form";
    pub const FILE_INPUT: &str = "model";
    pub const ERROR_MESSAGE: &str = "error-message";
    pub const SUCCESS_MESSAGE: &str = "success-message";
    pub const SUBMIT_BUTTON: &str = "submit-button";
    pub const UPLOAD_PROGRESS: &str = "dynamic-progress";
    pub const ACCURACY: &str = "accuracy";
    pub const LATENCY: &str = "latency";
    pub const V1_PROGRESS: &str = "v1-progress";
    pub const V2_PROGRESS: &str = "v2-progress";
    pub const METRIC_TIMESTAMP: &str = "metric-timestamp";
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressBar {
    /// Fill proportion, 0-100.
    pub width_percent: f64,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageBox {
    pub text: String,
    pub visible: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadPanel {
    pub progress: ProgressBar,
    pub error_message: MessageBox,
    /// Present on the page; never driven by the upload flow.
    pub success_message: MessageBox,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardPanel {
    pub accuracy: String,
    pub latency: String,
    pub v1_progress: ProgressBar,
    pub v2_progress: ProgressBar,
    pub timestamps: Vec<String>,
}

#[derive(Debug)]
pub struct Page {
    location: String,
    navigated_to: Option<String>,
    pub upload: UploadPanel,
    pub dashboard: DashboardPanel,
    changes: watch::Sender<u64>,
}

impl Page {
    pub fn new(location: &str, timestamp_slots: usize) -> Self {
        let (changes, _rx) = watch::channel(0);
        Self {
            location: location.to_string(),
            navigated_to: None,
            upload: UploadPanel::default(),
            dashboard: DashboardPanel {
                timestamps: vec![String::new(); timestamp_slots],
                ..DashboardPanel::default()
            },
            changes,
        }
    }

    pub fn shared(location: &str, timestamp_slots: usize) -> SharedPage {
        Arc::new(Mutex::new(Self::new(location, timestamp_slots)))
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// Location without query string or fragment.
    pub fn path(&self) -> &str {
        self.location
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
    }

    /// Target of the last full navigation, if any.
    pub fn navigated_to(&self) -> Option<&str> {
        self.navigated_to.as_deref()
    }

    /// Receiver that observes a new revision after every page mutation.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }

    pub fn navigate(&mut self, path: &str) {
        tracing::info!(from = %self.location, to = %path, "navigating");
        self.navigated_to = Some(path.to_string());
        self.location = path.to_string();
        self.touch();
    }

    pub fn set_upload_progress(&mut self, progress: TransferProgress) {
        self.upload.progress.width_percent = f64::from(progress.percent());
        self.upload.progress.label = progress.to_string();
        self.touch();
    }

    pub fn reset_upload_progress(&mut self) {
        self.set_upload_progress(TransferProgress::ZERO);
    }

    /// Reveal the error panel with `message`. A previous message is
    /// overwritten; the panel is never hidden again.
    pub fn show_error(&mut self, message: &str) {
        self.upload.error_message.text = message.to_string();
        self.upload.error_message.visible = true;
        self.touch();
    }

    /// Replace the dashboard with `snapshot`. Nothing from the previous
    /// snapshot survives.
    pub fn render_metrics(&mut self, snapshot: &MetricsSnapshot) {
        let stats = &snapshot.stats;
        let dash = &mut self.dashboard;
        dash.accuracy = format!("{}%", stats.accuracy);
        dash.latency = format!("{}ms", stats.latency);
        dash.v1_progress.width_percent = stats.v1_share();
        dash.v2_progress.width_percent = stats.v2_share();
        for slot in &mut dash.timestamps {
            slot.clone_from(&snapshot.retrieved_at);
        }
        self.touch();
    }

    fn touch(&self) {
        self.changes.send_modify(|rev| *rev = rev.wrapping_add(1));
    }
}
