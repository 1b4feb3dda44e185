use std::path::{Path, PathBuf};

use bytes::Bytes;
use canary_common::{TransferOutcome, TransferProgress};
use futures_util::TryStreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client, StatusCode};
use tokio::sync::mpsc;
use tokio_util::io::ReaderStream;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::{ConsoleConfig, SUCCESS_PATH, UPLOAD_FIELD};
use crate::error::UploadError;
use crate::page::SharedPage;

/// One submission of the upload form.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub id: Uuid,
    pub file: Option<PathBuf>,
    pub endpoint: String,
}

/// Counts payload bytes as the body stream yields them and reports the
/// resulting percentage.
#[derive(Debug)]
struct ProgressTracker {
    sent: u64,
    total: u64,
    tx: mpsc::UnboundedSender<TransferProgress>,
}

impl ProgressTracker {
    fn new(total: u64, tx: mpsc::UnboundedSender<TransferProgress>) -> Self {
        Self { sent: 0, total, tx }
    }

    fn record(&mut self, chunk: &Bytes) {
        self.sent = self.sent.saturating_add(chunk.len() as u64);
        if let Some(progress) = TransferProgress::from_bytes(self.sent, self.total) {
            // receiver is gone once the request reached a terminal state
            let _ = self.tx.send(progress);
        }
    }
}

/// Drives uploads from the page's upload form.
#[derive(Debug, Clone)]
pub struct UploadController {
    client: Client,
    endpoint: String,
    page: SharedPage,
}

impl UploadController {
    pub fn new(client: Client, config: &ConsoleConfig, page: SharedPage) -> Self {
        Self {
            client,
            endpoint: config.upload_url(),
            page,
        }
    }

    /// Submit `file` (or nothing, if no file is selected) and reconcile the
    /// outcome into the page. Never retries.
    pub async fn submit(&self, file: Option<&Path>) -> TransferOutcome {
        let request = UploadRequest {
            id: Uuid::new_v4(),
            file: file.map(Path::to_path_buf),
            endpoint: self.endpoint.clone(),
        };
        let span = tracing::info_span!("upload", request_id = %request.id);
        async move {
            tracing::info!(file = ?request.file, endpoint = %request.endpoint, "submitting upload");
            let outcome = match self.send(&request).await {
                Ok(()) => {
                    tracing::info!("upload accepted");
                    TransferOutcome::Success
                }
                Err(e) => {
                    tracing::warn!(error = %e, "upload failed");
                    e.outcome()
                }
            };
            self.finish(&outcome).await;
            outcome
        }
        .instrument(span)
        .await
    }

    async fn send(&self, request: &UploadRequest) -> Result<(), UploadError> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let form = build_form(request.file.as_deref(), tx).await?;

        let response = self.client.post(&request.endpoint).multipart(form).send();
        tokio::pin!(response);

        let response = loop {
            tokio::select! {
                biased;
                Some(progress) = rx.recv() => {
                    self.page.lock().await.set_upload_progress(progress);
                }
                result = &mut response => break result?,
            }
        };
        while let Ok(progress) = rx.try_recv() {
            self.page.lock().await.set_upload_progress(progress);
        }

        let status = response.status();
        if status == StatusCode::OK {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(UploadError::ServerRejection { status, body })
    }

    async fn finish(&self, outcome: &TransferOutcome) {
        let mut page = self.page.lock().await;
        match outcome {
            TransferOutcome::Success => page.navigate(SUCCESS_PATH),
            TransferOutcome::Failure { message } => page.show_error(message),
        }
        page.reset_upload_progress();
    }
}

/// Build the multipart body. An absent file is still sent as an empty
/// `model` field so the server decides what to do with it.
async fn build_form(
    file: Option<&Path>,
    progress: mpsc::UnboundedSender<TransferProgress>,
) -> Result<Form, UploadError> {
    let Some(path) = file else {
        return Ok(Form::new().text(UPLOAD_FIELD, ""));
    };

    let handle = tokio::fs::File::open(path).await?;
    let total = handle.metadata().await?.len();
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| UPLOAD_FIELD.to_string());

    let mut tracker = ProgressTracker::new(total, progress);
    let stream = ReaderStream::new(handle).inspect_ok(move |chunk| tracker.record(chunk));

    let part = Part::stream_with_length(Body::wrap_stream(stream), total)
        .file_name(file_name)
        .mime_str("application/octet-stream")?;
    Ok(Form::new().part(UPLOAD_FIELD, part))
}
