use tauri::State;

use crate::models::Plant;
use crate::AppState;

#[tauri::command]
pub async fn list_plants(state: State<'_, AppState>) -> Result<Vec<Plant>, String> {
    state
        .api
        .list_plants()
        .await
        .map_err(|e| state.surface_api_error(e))
}

#[tauri::command]
pub async fn get_plant(state: State<'_, AppState>, plant_id: i64) -> Result<Plant, String> {
    state
        .api
        .get_plant(plant_id)
        .await
        .map_err(|e| state.surface_api_error(e))
}

#[tauri::command]
pub async fn rename_plant(
    state: State<'_, AppState>,
    plant_id: i64,
    name: String,
) -> Result<Plant, String> {
    state
        .api
        .rename_plant(plant_id, &name)
        .await
        .map_err(|e| state.surface_api_error(e))
}

/// Remote deletion leaves the plant's local watering history alone; the
/// history screen keeps working from the name embedded in each record.
#[tauri::command]
pub async fn delete_plant(state: State<'_, AppState>, plant_id: i64) -> Result<(), String> {
    state
        .api
        .delete_plant(plant_id)
        .await
        .map_err(|e| state.surface_api_error(e))
}

/// Pair a soil-moisture sensor, or unpair by passing no id.
#[tauri::command]
pub async fn pair_plant_sensor(
    state: State<'_, AppState>,
    plant_id: i64,
    sensor_id: Option<String>,
) -> Result<Plant, String> {
    state
        .api
        .pair_sensor(plant_id, sensor_id.as_deref())
        .await
        .map_err(|e| state.surface_api_error(e))
}
