use serde::Serialize;

use crate::api::{ApiClient, ApiError};
use crate::models::Plant;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RenameBody<'a> {
    name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PairSensorBody<'a> {
    sensor_id: Option<&'a str>,
}

impl ApiClient {
    pub async fn list_plants(&self) -> Result<Vec<Plant>, ApiError> {
        self.get_json("/plants").await
    }

    pub async fn get_plant(&self, plant_id: i64) -> Result<Plant, ApiError> {
        self.get_json(&format!("/plants/{plant_id}")).await
    }

    pub async fn rename_plant(&self, plant_id: i64, name: &str) -> Result<Plant, ApiError> {
        self.patch_json(&format!("/plants/{plant_id}"), &RenameBody { name })
            .await
    }

    pub async fn delete_plant(&self, plant_id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/plants/{plant_id}")).await
    }

    /// Pair (or unpair with `None`) a soil-moisture sensor.
    pub async fn pair_sensor(
        &self,
        plant_id: i64,
        sensor_id: Option<&str>,
    ) -> Result<Plant, ApiError> {
        self.patch_json(&format!("/plants/{plant_id}"), &PairSensorBody { sensor_id })
            .await
    }
}
