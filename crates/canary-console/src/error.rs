use canary_common::{StatsDecodeError, TransferOutcome};
use reqwest::StatusCode;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// No response was received: connect/DNS/timeout failures, or the
    /// payload could not be read from disk.
    #[error("upload got no response: {0}")]
    Transport(#[source] BoxError),
    /// A response arrived with a status other than 200.
    #[error("upload rejected with {status}: {body}")]
    ServerRejection { status: StatusCode, body: String },
}

impl From<reqwest::Error> for UploadError {
    fn from(err: reqwest::Error) -> Self {
        UploadError::Transport(Box::new(err))
    }
}

impl From<std::io::Error> for UploadError {
    fn from(err: std::io::Error) -> Self {
        UploadError::Transport(Box::new(err))
    }
}

impl UploadError {
    /// What the user sees for this failure.
    pub fn outcome(&self) -> TransferOutcome {
        match self {
            UploadError::Transport(_) => TransferOutcome::transport_failure(),
            UploadError::ServerRejection { body, .. } => TransferOutcome::rejected(body),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PollError {
    #[error("failed to fetch model stats: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error(transparent)]
    Parse(#[from] StatsDecodeError),
}
