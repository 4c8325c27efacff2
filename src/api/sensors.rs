//! Sensor latest-reading fetch, plus the trait seam the watering poll loop
//! consumes so tests can script readings without a network.

use async_trait::async_trait;

use crate::api::{ApiClient, ApiError};
use crate::models::SensorReading;

/// Source of soil-moisture readings. Production is the remote API; tests
/// drive the controller with scripted implementations.
#[async_trait]
pub trait SensorReader: Send + Sync {
    async fn latest_reading(&self, sensor_id: &str) -> Result<SensorReading, ApiError>;
}

#[async_trait]
impl SensorReader for ApiClient {
    async fn latest_reading(&self, sensor_id: &str) -> Result<SensorReading, ApiError> {
        self.get_json(&format!("/sensors/{sensor_id}/latest")).await
    }
}
