#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;

pub const VALID_STATS: &str = r#"{"accuracy": 97, "latency": 120, "traffic_split": 70}"#;
pub const PLACEHOLDER_STATS: &str =
    r#"{"accuracy": "N/A", "latency": "N/A", "traffic_split": "N/A"}"#;

/// Uploads larger than axum's 2 MB default are accepted up to this size.
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Stand-in for the canary deployment service.
pub struct MockService {
    upload_reply: Mutex<(StatusCode, String)>,
    uploads: Mutex<Vec<Bytes>>,
    /// Replies are consumed front to back; the last one repeats.
    stats_replies: Mutex<VecDeque<(StatusCode, String)>>,
    stats_hits: AtomicUsize,
}

impl MockService {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            upload_reply: Mutex::new((StatusCode::OK, "ok".to_string())),
            uploads: Mutex::new(Vec::new()),
            stats_replies: Mutex::new(VecDeque::from([(
                StatusCode::OK,
                VALID_STATS.to_string(),
            )])),
            stats_hits: AtomicUsize::new(0),
        })
    }

    pub fn reply_to_uploads(&self, status: StatusCode, body: &str) {
        *self.upload_reply.lock().unwrap() = (status, body.to_string());
    }

    pub fn reply_to_stats(&self, replies: &[(StatusCode, &str)]) {
        let mut queue = self.stats_replies.lock().unwrap();
        *queue = replies
            .iter()
            .map(|(status, body)| (*status, body.to_string()))
            .collect();
    }

    pub fn uploads(&self) -> Vec<Bytes> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn stats_hits(&self) -> usize {
        self.stats_hits.load(Ordering::SeqCst)
    }
}

async fn upload(State(svc): State<Arc<MockService>>, body: Bytes) -> (StatusCode, String) {
    svc.uploads.lock().unwrap().push(body);
    svc.upload_reply.lock().unwrap().clone()
}

async fn model_stats(State(svc): State<Arc<MockService>>) -> (StatusCode, String) {
    svc.stats_hits.fetch_add(1, Ordering::SeqCst);
    let mut queue = svc.stats_replies.lock().unwrap();
    if queue.len() > 1 {
        queue.pop_front().unwrap()
    } else {
        queue
            .front()
            .cloned()
            .unwrap_or((StatusCode::NOT_FOUND, String::new()))
    }
}

/// Serve `svc` on an ephemeral port and return its base URL.
pub async fn serve(svc: Arc<MockService>) -> String {
    let app = Router::new()
        .route("/upload", post(upload))
        .route("/api/model-stats", get(model_stats))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(svc);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Base URL of a port nothing listens on.
pub async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
