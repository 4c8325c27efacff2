use tauri::State;

use crate::models::DexEntry;
use crate::AppState;

#[tauri::command]
pub async fn list_dex_entries(state: State<'_, AppState>) -> Result<Vec<DexEntry>, String> {
    state
        .api
        .list_dex_entries()
        .await
        .map_err(|e| state.surface_api_error(e))
}

#[tauri::command]
pub async fn get_dex_entry(state: State<'_, AppState>, entry_id: i64) -> Result<DexEntry, String> {
    state
        .api
        .get_dex_entry(entry_id)
        .await
        .map_err(|e| state.surface_api_error(e))
}
