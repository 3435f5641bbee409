use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
}

/// Body returned by the `/health` endpoints of appgen services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceHealth {
    pub status: HealthStatus,
    pub service: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl ServiceHealth {
    pub fn healthy(service: &str, version: &str) -> Self {
        Self {
            status: HealthStatus::Healthy,
            service: service.to_string(),
            version: version.to_string(),
            timestamp: chrono::Utc::now(),
        }
    }
}
