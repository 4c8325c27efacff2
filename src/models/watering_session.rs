//! Watering session record.
//!
//! Created client-side at the moment a watering session ends and immutable
//! from then on; the only later mutation is individual deletion by the user.
//! Identity is the composite of plant id and session start time, matching
//! the stored JSON slot format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WateringSession {
    pub id: String,
    pub plant_id: i64,
    pub plant_name: String,
    pub sensor_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_seconds: u64,
    pub humidity_start: f64,
    pub humidity_end: f64,
    pub target_humidity: f64,
}

impl WateringSession {
    /// Composite identity key: `{plantId}-{start unix millis}`.
    pub fn composite_id(plant_id: i64, start_time: DateTime<Utc>) -> String {
        format!("{plant_id}-{}", start_time.timestamp_millis())
    }

    /// Display-only classification; never stored, no server reconciliation.
    pub fn reached_goal(&self) -> bool {
        self.humidity_end >= self.target_humidity
    }
}
