pub mod model_stats;
pub mod telemetry;
pub mod transfer;

pub use model_stats::{MetricsSnapshot, ModelStats, StatsDecodeError};
pub use transfer::{TransferOutcome, TransferProgress, TRANSPORT_FAILURE_MESSAGE};
