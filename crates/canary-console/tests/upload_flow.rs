mod common;

use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::http::StatusCode;
use canary_common::TransferOutcome;
use canary_console::client::build_client;
use canary_console::{build_config, Page, PageApp, SharedPage};

use common::{serve, unreachable_base_url, MockService};

const PAYLOAD_LEN: usize = 64 * 1024;

fn model_file() -> tempfile::NamedTempFile {
    model_file_of(PAYLOAD_LEN)
}

fn model_file_of(len: usize) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("resnet50-")
        .suffix(".onnx")
        .tempfile()
        .unwrap();
    let payload: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
    file.write_all(&payload).unwrap();
    file.flush().unwrap();
    file
}

async fn upload_page(base_url: &str) -> (SharedPage, PageApp) {
    let config = build_config(base_url, None, Some(2), None);
    let page = Page::shared("/upload", config.timestamp_slots);
    let app = PageApp::ready(page.clone(), build_client().unwrap(), &config).await;
    (page, app)
}

async fn assert_progress_reset(page: &SharedPage) {
    let page = page.lock().await;
    assert_eq!(page.upload.progress.width_percent, 0.0);
    assert_eq!(page.upload.progress.label, "0%");
}

#[tokio::test]
async fn test_accepted_upload_navigates_to_success() {
    let svc = MockService::new();
    let base = serve(svc.clone()).await;
    let (page, app) = upload_page(&base).await;
    assert!(app.poller.is_none());

    let file = model_file();
    let outcome = app.upload.submit(Some(file.path())).await;
    assert_eq!(outcome, TransferOutcome::Success);

    {
        let page = page.lock().await;
        assert_eq!(page.navigated_to(), Some("/success"));
        assert!(!page.upload.error_message.visible);
        assert!(page.upload.error_message.text.is_empty());
    }
    assert_progress_reset(&page).await;

    let uploads = svc.uploads();
    assert_eq!(uploads.len(), 1);
    let body = String::from_utf8_lossy(&uploads[0]);
    assert!(body.contains(r#"name="model""#), "{body:.200}");
    let file_name = file.path().file_name().unwrap().to_string_lossy();
    assert!(body.contains(&format!(r#"filename="{file_name}""#)));
    assert!(uploads[0].len() > PAYLOAD_LEN);
}

#[tokio::test]
async fn test_rejected_upload_shows_server_body() {
    let svc = MockService::new();
    svc.reply_to_uploads(StatusCode::INTERNAL_SERVER_ERROR, "server error");
    let base = serve(svc.clone()).await;
    let (page, app) = upload_page(&base).await;

    let file = model_file();
    let outcome = app.upload.submit(Some(file.path())).await;
    assert_eq!(outcome, TransferOutcome::rejected("server error"));

    {
        let page = page.lock().await;
        assert!(page.upload.error_message.visible);
        assert_eq!(page.upload.error_message.text, "Upload failed: server error");
        assert_eq!(page.navigated_to(), None);
    }
    assert_progress_reset(&page).await;
}

#[tokio::test]
async fn test_only_200_counts_as_success() {
    let svc = MockService::new();
    svc.reply_to_uploads(StatusCode::CREATED, "created");
    let base = serve(svc).await;
    let (page, app) = upload_page(&base).await;

    let file = model_file();
    let outcome = app.upload.submit(Some(file.path())).await;
    assert_eq!(outcome, TransferOutcome::rejected("created"));
    assert_eq!(page.lock().await.navigated_to(), None);
}

#[tokio::test]
async fn test_unreachable_server_shows_generic_message() {
    let base = unreachable_base_url().await;
    let (page, app) = upload_page(&base).await;

    let file = model_file();
    let outcome = app.upload.submit(Some(file.path())).await;
    assert_eq!(outcome, TransferOutcome::transport_failure());

    {
        let page = page.lock().await;
        assert!(page.upload.error_message.visible);
        assert_eq!(page.upload.error_message.text, "Upload failed. Please try again.");
    }
    assert_progress_reset(&page).await;
}

#[tokio::test]
async fn test_unreadable_file_never_reaches_server() {
    let svc = MockService::new();
    let base = serve(svc.clone()).await;
    let (page, app) = upload_page(&base).await;

    let outcome = app
        .upload
        .submit(Some(std::path::Path::new("/nonexistent/model.onnx")))
        .await;
    assert_eq!(outcome, TransferOutcome::transport_failure());
    assert!(svc.uploads().is_empty());
    assert_progress_reset(&page).await;
}

#[tokio::test]
async fn test_absent_file_is_left_to_the_server() {
    let svc = MockService::new();
    svc.reply_to_uploads(StatusCode::UNPROCESSABLE_ENTITY, "no file");
    let base = serve(svc.clone()).await;
    let (page, app) = upload_page(&base).await;

    let outcome = app.upload.submit(None).await;
    assert_eq!(outcome, TransferOutcome::rejected("no file"));

    let uploads = svc.uploads();
    assert_eq!(uploads.len(), 1);
    assert!(String::from_utf8_lossy(&uploads[0]).contains(r#"name="model""#));
    assert_eq!(page.lock().await.upload.error_message.text, "Upload failed: no file");
}

#[tokio::test]
async fn test_repeated_failures_overwrite_message() {
    let svc = MockService::new();
    svc.reply_to_uploads(StatusCode::BAD_REQUEST, "Invalid file type");
    let base = serve(svc.clone()).await;
    let (page, app) = upload_page(&base).await;
    let file = model_file();

    app.upload.submit(Some(file.path())).await;
    svc.reply_to_uploads(StatusCode::BAD_GATEWAY, "Failed to trigger deployment");
    app.upload.submit(Some(file.path())).await;

    let page = page.lock().await;
    assert!(page.upload.error_message.visible);
    assert_eq!(
        page.upload.error_message.text,
        "Upload failed: Failed to trigger deployment"
    );
    assert_eq!(page.upload.progress.label, "0%");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_progress_is_shown_while_uploading() {
    let svc = MockService::new();
    let base = serve(svc.clone()).await;
    let (page, app) = upload_page(&base).await;
    let file = model_file_of(4 * 1024 * 1024);

    let labels = Arc::new(Mutex::new(Vec::<String>::new()));
    let mut changes = page.lock().await.subscribe();
    let recorder = {
        let page = page.clone();
        let labels = labels.clone();
        tokio::spawn(async move {
            // ends once the page has been quiet for a while after the upload
            while let Ok(Ok(())) =
                tokio::time::timeout(Duration::from_millis(500), changes.changed()).await
            {
                let label = page.lock().await.upload.progress.label.clone();
                labels.lock().unwrap().push(label);
            }
        })
    };

    let outcome = app.upload.submit(Some(file.path())).await;
    assert_eq!(outcome, TransferOutcome::Success);
    recorder.await.unwrap();

    let labels = labels.lock().unwrap().clone();
    assert_eq!(labels.last().map(String::as_str), Some("0%"), "{labels:?}");

    // navigation and the reset may both be observed after the reset landed
    let settled = labels.iter().rposition(|l| l != "0%").map_or(0, |i| i + 1);
    let in_flight: Vec<u8> = labels[..settled]
        .iter()
        .map(|l| l.trim_end_matches('%').parse().unwrap())
        .collect();
    assert!(in_flight.iter().any(|&p| p > 0), "{labels:?}");
    assert!(in_flight.windows(2).all(|w| w[0] <= w[1]), "{labels:?}");
    assert!(in_flight.iter().all(|&p| p <= 100));
}
