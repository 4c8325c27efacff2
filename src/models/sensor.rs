//! Soil-moisture sensor reading.
//!
//! Readings are ephemeral: only the latest value is held in memory while a
//! watering session polls, nothing is persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorReading {
    pub sensor_id: String,
    /// Soil humidity in percent, 0-100.
    pub humidity: f64,
    pub recorded_at: DateTime<Utc>,
}
