mod args;
mod output;

use anyhow::Result;
use clap::Parser;
use tokio_util::sync::CancellationToken;

use canary_common::telemetry::init_tracing;
use canary_console::client::build_client;
use canary_console::config::DASHBOARD_PATH;
use canary_console::poller::DashboardPoller;
use canary_console::{build_config, Page, PageApp};

use crate::args::{Args, Command};
use crate::output::{
    follow_upload_progress, print_dashboard, print_outcome, print_progress, print_snapshot,
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let telemetry = init_tracing(
        "canary-console",
        args.otlp_endpoint.as_deref(),
        args.otlp_token.as_deref(),
    );

    let config = build_config(
        &args.base_url,
        args.poll_interval_ms,
        args.timeout_secs,
        args.timestamp_slots,
    );
    let client = build_client()?;

    match args.command {
        Command::Upload { file, location } => {
            let page = Page::shared(&location, config.timestamp_slots);
            let app = PageApp::ready(page.clone(), client, &config).await;

            let stop = CancellationToken::new();
            let drawer = tokio::spawn(follow_upload_progress(
                page.clone(),
                stop.clone(),
                print_progress,
            ));

            let outcome = app.upload.submit(file.as_deref()).await;
            stop.cancel();
            if let Err(e) = drawer.await {
                tracing::warn!(error = %e, "progress drawer failed");
            }
            app.shutdown().await;

            let guard = page.lock().await;
            print_outcome(&outcome, guard.navigated_to());
            if !outcome.is_success() {
                drop(guard);
                drop(telemetry);
                std::process::exit(1);
            }
        }
        Command::Dashboard { location } => {
            let page = Page::shared(&location, config.timestamp_slots);
            let app = PageApp::ready(page.clone(), client, &config).await;
            if app.poller.is_none() {
                tracing::info!(%location, "dashboard poller inactive outside the dashboard page");
                return Ok(());
            }

            let mut changes = page.lock().await.subscribe();
            let ctrl_c = tokio::signal::ctrl_c();
            tokio::pin!(ctrl_c);
            loop {
                tokio::select! {
                    _ = &mut ctrl_c => break,
                    changed = changes.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let dash = page.lock().await.dashboard.clone();
                        print_dashboard(&dash);
                    }
                }
            }
            app.shutdown().await;
        }
        Command::Stats { json } => {
            let page = Page::shared(DASHBOARD_PATH, config.timestamp_slots);
            let poller = DashboardPoller::new(client, &config, page);
            match poller.poll_once().await {
                Ok(snapshot) => print_snapshot(&snapshot, json),
                Err(e) => {
                    eprintln!("✗ Failed to fetch model stats: {e}");
                    drop(telemetry);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
