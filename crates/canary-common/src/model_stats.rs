use serde::{Deserialize, Serialize};

/// Payload returned by `GET /api/model-stats`.
///
/// `traffic_split` is the share of traffic (0-100) routed to variant v1;
/// v2 receives the remainder.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ModelStats {
    pub accuracy: f64,
    pub latency: f64,
    pub traffic_split: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum StatsDecodeError {
    #[error("malformed model stats payload: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("{field} is not a finite number: {value}")]
    NotFinite { field: &'static str, value: f64 },
    #[error("traffic_split {0} is outside 0..=100")]
    SplitOutOfRange(f64),
}

impl ModelStats {
    /// Decode and validate a raw response body.
    ///
    /// The stats service answers `"N/A"` for fields it could not compute;
    /// those fail here as `Malformed` rather than reaching the display.
    pub fn decode(body: &[u8]) -> Result<Self, StatsDecodeError> {
        let stats: ModelStats = serde_json::from_slice(body)?;
        stats.validate()?;
        Ok(stats)
    }

    fn validate(&self) -> Result<(), StatsDecodeError> {
        for (field, value) in [
            ("accuracy", self.accuracy),
            ("latency", self.latency),
            ("traffic_split", self.traffic_split),
        ] {
            if !value.is_finite() {
                return Err(StatsDecodeError::NotFinite { field, value });
            }
        }
        if !(0.0..=100.0).contains(&self.traffic_split) {
            return Err(StatsDecodeError::SplitOutOfRange(self.traffic_split));
        }
        Ok(())
    }

    /// Share of traffic routed to variant v1.
    pub fn v1_share(&self) -> f64 {
        self.traffic_split
    }

    /// Share of traffic routed to variant v2. Always `100 - v1_share()`.
    pub fn v2_share(&self) -> f64 {
        100.0 - self.traffic_split
    }
}

/// One successful poll: the decoded stats plus the local time they were
/// retrieved at (`HH:MM:SS`).
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MetricsSnapshot {
    pub stats: ModelStats,
    pub retrieved_at: String,
}
