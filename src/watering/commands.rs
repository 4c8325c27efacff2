use tauri::State;

use crate::models::WateringSession;
use crate::sessions::{plant_care_stats, PlantCareStats};
use crate::watering::{StartOutcome, WateringAvailability, WateringController, WateringSnapshot};
use crate::AppState;

fn controller_from_state(state: &State<'_, AppState>) -> WateringController {
    state.watering.clone()
}

#[tauri::command]
pub async fn get_watering_state(state: State<'_, AppState>) -> Result<WateringSnapshot, String> {
    let controller = controller_from_state(&state);
    Ok(controller.snapshot().await)
}

#[tauri::command]
pub async fn get_watering_availability(
    state: State<'_, AppState>,
    plant_id: i64,
) -> Result<WateringAvailability, String> {
    let plant = state
        .api
        .get_plant(plant_id)
        .await
        .map_err(|e| state.surface_api_error(e))?;

    let controller = controller_from_state(&state);
    Ok(controller.availability(&plant).await)
}

#[tauri::command]
pub async fn start_watering(
    state: State<'_, AppState>,
    plant_id: i64,
) -> Result<StartOutcome, String> {
    let plant = state
        .api
        .get_plant(plant_id)
        .await
        .map_err(|e| state.surface_api_error(e))?;

    let controller = controller_from_state(&state);
    controller.start(&plant).await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn stop_watering(state: State<'_, AppState>) -> Result<WateringSession, String> {
    let controller = controller_from_state(&state);
    controller.stop().await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn reset_watering(state: State<'_, AppState>) -> Result<(), String> {
    let controller = controller_from_state(&state);
    controller.reset().await;
    Ok(())
}

/// History for one plant, or the whole garden when `plant_id` is omitted.
/// Newest first either way.
#[tauri::command]
pub async fn list_watering_sessions(
    state: State<'_, AppState>,
    plant_id: Option<i64>,
) -> Result<Vec<WateringSession>, String> {
    let sessions = match plant_id {
        Some(plant_id) => state.sessions.list_by_plant(plant_id),
        None => state.sessions.all(),
    };
    Ok(sessions)
}

#[tauri::command]
pub async fn delete_watering_session(
    state: State<'_, AppState>,
    session_id: String,
) -> Result<(), String> {
    state
        .sessions
        .delete_by_id(&session_id)
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn get_plant_care_stats(
    state: State<'_, AppState>,
    plant_id: i64,
) -> Result<PlantCareStats, String> {
    let sessions = state.sessions.list_by_plant(plant_id);
    Ok(plant_care_stats(plant_id, &sessions))
}
