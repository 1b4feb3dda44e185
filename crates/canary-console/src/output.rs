use std::io::{self, Write};

use canary_common::{MetricsSnapshot, TransferOutcome};
use canary_console::page::{element, DashboardPanel, ProgressBar};
use canary_console::SharedPage;
use tokio_util::sync::CancellationToken;

const BAR_WIDTH: usize = 40;

fn bar(width_percent: f64) -> String {
    let filled = ((width_percent.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "#".repeat(filled), " ".repeat(BAR_WIDTH - filled))
}

/// Redraw the upload progress bar in place on stderr.
pub fn print_progress(progress: &ProgressBar) {
    let mut err = io::stderr().lock();
    let _ = write!(
        err,
        "\r{} [{}] {:>4}",
        element::UPLOAD_PROGRESS,
        bar(progress.width_percent),
        progress.label
    );
    let _ = err.flush();
}

/// Draw the upload progress bar on every page change until `stop` fires,
/// then draw the page's final state once more so the terminal never keeps
/// a stale frame.
pub async fn follow_upload_progress<F>(page: SharedPage, stop: CancellationToken, mut draw: F)
where
    F: FnMut(&ProgressBar),
{
    let mut changes = page.lock().await.subscribe();
    loop {
        tokio::select! {
            biased;
            _ = stop.cancelled() => break,
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
                let progress = page.lock().await.upload.progress.clone();
                draw(&progress);
            }
        }
    }
    let progress = page.lock().await.upload.progress.clone();
    draw(&progress);
}

pub fn print_outcome(outcome: &TransferOutcome, navigated_to: Option<&str>) {
    eprintln!();
    match outcome {
        TransferOutcome::Success => {
            println!("✓ Upload accepted → {}", navigated_to.unwrap_or("/success"));
        }
        TransferOutcome::Failure { message } => {
            eprintln!("✗ {message}");
        }
    }
}

pub fn print_dashboard(dash: &DashboardPanel) {
    println!("\n=== Canary Model Stats ===\n");
    println!("  {:<12} {}", "Accuracy:", dash.accuracy);
    println!("  {:<12} {}", "Latency:", dash.latency);
    println!(
        "  {:<12} [{}] {}%",
        "v1 traffic:",
        bar(dash.v1_progress.width_percent),
        dash.v1_progress.width_percent
    );
    println!(
        "  {:<12} [{}] {}%",
        "v2 traffic:",
        bar(dash.v2_progress.width_percent),
        dash.v2_progress.width_percent
    );
    if let Some(ts) = dash.timestamps.first() {
        println!("  {:<12} {}", "Updated:", ts);
    }
    println!();
}

pub fn print_snapshot(snapshot: &MetricsSnapshot, json: bool) {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(snapshot).unwrap_or_default()
        );
        return;
    }
    let stats = &snapshot.stats;
    println!("accuracy       {}%", stats.accuracy);
    println!("latency        {}ms", stats.latency);
    println!("traffic v1/v2  {}% / {}%", stats.v1_share(), stats.v2_share());
    println!("retrieved at   {}", snapshot.retrieved_at);
}
