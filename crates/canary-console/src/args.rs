use std::path::PathBuf;

use clap::{Parser, Subcommand};

use canary_console::config::{DASHBOARD_PATH, DEFAULT_BASE_URL, UPLOAD_PATH};

#[derive(Debug, Parser)]
#[command(name = "canary")]
#[command(about = "Canary deployment console: upload models and watch rollout metrics", long_about = None)]
pub struct Args {
    /// Base URL of the canary deployment service
    #[arg(long, env = "CANARY_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Dashboard refresh interval in milliseconds (default 5000)
    #[arg(long, env = "CANARY_POLL_INTERVAL_MS", value_parser = clap::value_parser!(u64).range(1..))]
    pub poll_interval_ms: Option<u64>,

    /// Timeout for stats requests in seconds (default 10)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: Option<u64>,

    /// Number of metric cards carrying a refresh timestamp (default 3)
    #[arg(long)]
    pub timestamp_slots: Option<usize>,

    /// OTLP/HTTP base URL for trace export
    #[arg(long, env = "CANARY_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,

    /// Bearer token for the OTLP endpoint
    #[arg(long, env = "CANARY_OTLP_TOKEN")]
    pub otlp_token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Upload a model file and follow its progress
    Upload {
        /// Model file to upload; omitted sends an empty `model` field
        file: Option<PathBuf>,
        /// Page location the upload is submitted from
        #[arg(long, default_value = UPLOAD_PATH)]
        location: String,
    },
    /// Watch model stats, refreshing until Ctrl-C
    Dashboard {
        /// Page location; the poller only runs on the dashboard path
        #[arg(long, default_value = DASHBOARD_PATH)]
        location: String,
    },
    /// Fetch model stats once
    Stats {
        /// Print the snapshot as JSON
        #[arg(long)]
        json: bool,
    },
}
