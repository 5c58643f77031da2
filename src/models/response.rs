use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed acknowledgment returned to the marketplace once a notification
/// has been verified and stored.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AckResponse {
    pub message: String,
}

impl AckResponse {
    pub fn ok() -> Self {
        Self {
            message: "ok".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub store: bool,
    pub uptime_seconds: u64,
    pub timestamp: DateTime<Utc>,
}
