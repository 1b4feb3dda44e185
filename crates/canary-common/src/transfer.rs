use std::fmt;

/// Message shown when the upload never got a response.
pub const TRANSPORT_FAILURE_MESSAGE: &str = "Upload failed. Please try again.";

/// Prefix for the message shown when the server rejected an upload.
pub const REJECTION_PREFIX: &str = "Upload failed: ";

/// Integer percentage (0-100) of an upload's payload sent so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TransferProgress(u8);

impl TransferProgress {
    pub const ZERO: TransferProgress = TransferProgress(0);

    /// `round(sent / total * 100)`, or `None` when the total is unknown.
    ///
    /// `sent` past `total` is clamped so the percentage never exceeds 100.
    pub fn from_bytes(sent: u64, total: u64) -> Option<Self> {
        if total == 0 {
            return None;
        }
        let sent = sent.min(total);
        let pct = (sent as f64 / total as f64 * 100.0).round();
        Some(TransferProgress(pct as u8))
    }

    pub fn percent(self) -> u8 {
        self.0
    }
}

impl fmt::Display for TransferProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Terminal result of one upload request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferOutcome {
    Success,
    Failure { message: String },
}

impl TransferOutcome {
    /// Failure carrying the server's response body verbatim.
    pub fn rejected(body: &str) -> Self {
        TransferOutcome::Failure {
            message: format!("{REJECTION_PREFIX}{body}"),
        }
    }

    /// Failure for a request that never received a response.
    pub fn transport_failure() -> Self {
        TransferOutcome::Failure {
            message: TRANSPORT_FAILURE_MESSAGE.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TransferOutcome::Success)
    }
}
