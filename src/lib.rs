mod api;
mod chat;
mod dex;
mod garden;
mod models;
mod scanner;
mod sessions;
mod settings;
mod theme;
mod utils;
mod viewer;
mod watering;

use std::sync::Arc;

use api::{ApiClient, ApiError};
use chat::{clear_chat, get_chat_history, send_chat_message, ChatLog};
use dex::{get_dex_entry, list_dex_entries};
use garden::{delete_plant, get_plant, list_plants, pair_plant_sensor, rename_plant};
use models::{AuthUser, LoginRequest, RegisterRequest};
use scanner::{identify_plant, reset_scanner, scan_frame, ScannerState};
use sessions::SessionStore;
use settings::{SettingsStore, UserSettings};
use tauri::{Emitter, Manager, State};
use theme::{ThemeMode, ThemeState};
use tokio::sync::Mutex;
use viewer::{get_viewer_scene, select_viewer_clip};
use watering::{
    commands::{
        delete_watering_session, get_plant_care_stats, get_watering_availability,
        get_watering_state, list_watering_sessions, reset_watering, start_watering,
        stop_watering,
    },
    TauriEvents, WateringController,
};

pub(crate) struct AppState {
    pub(crate) api: Arc<ApiClient>,
    pub(crate) sessions: Arc<SessionStore>,
    pub(crate) watering: WateringController,
    pub(crate) settings: SettingsStore,
    pub(crate) chat: ChatLog,
    pub(crate) scanner: Mutex<ScannerState>,
}

impl AppState {
    /// Flatten an API failure for the webview. A 401 means the stored token
    /// went stale, so drop it everywhere and send the user back to sign-in.
    pub(crate) fn surface_api_error(&self, err: ApiError) -> String {
        if err.status() == Some(401) {
            if let Err(persist_err) = self.settings.update_auth_token(None) {
                log::warn!("could not clear stale auth token: {persist_err:?}");
            }
            self.api.set_auth_token(None);
            return "session expired, please sign in again".to_string();
        }
        err.to_string()
    }
}

#[tauri::command]
fn get_theme_state(
    os_prefers_dark: Option<bool>,
    state: State<AppState>,
) -> Result<ThemeState, String> {
    Ok(theme::theme_state(state.settings.theme_mode(), os_prefers_dark))
}

#[tauri::command]
fn set_theme_mode(
    mode: ThemeMode,
    os_prefers_dark: Option<bool>,
    state: State<AppState>,
    app_handle: tauri::AppHandle,
) -> Result<ThemeState, String> {
    state
        .settings
        .update_theme_mode(mode)
        .map_err(|e| e.to_string())?;

    let theme_state = theme::theme_state(mode, os_prefers_dark);
    app_handle
        .emit("theme-changed", &theme_state)
        .map_err(|e| e.to_string())?;

    Ok(theme_state)
}

#[tauri::command]
fn get_app_settings(state: State<AppState>) -> Result<UserSettings, String> {
    Ok(state.settings.snapshot())
}

#[tauri::command]
async fn register_account(
    email: String,
    password: String,
    display_name: String,
    state: State<'_, AppState>,
) -> Result<AuthUser, String> {
    let session = state
        .api
        .register(&RegisterRequest {
            email,
            password,
            display_name,
        })
        .await
        .map_err(|e| e.to_string())?;

    state
        .settings
        .update_auth_token(Some(session.token.clone()))
        .map_err(|e| e.to_string())?;
    state.api.set_auth_token(Some(session.token));

    Ok(session.user)
}

#[tauri::command]
async fn login(
    email: String,
    password: String,
    state: State<'_, AppState>,
) -> Result<AuthUser, String> {
    let session = state
        .api
        .login(&LoginRequest { email, password })
        .await
        .map_err(|e| e.to_string())?;

    state
        .settings
        .update_auth_token(Some(session.token.clone()))
        .map_err(|e| e.to_string())?;
    state.api.set_auth_token(Some(session.token));

    Ok(session.user)
}

#[tauri::command]
async fn logout(state: State<'_, AppState>) -> Result<(), String> {
    state
        .settings
        .update_auth_token(None)
        .map_err(|e| e.to_string())?;
    state.api.set_auth_token(None);
    Ok(())
}

#[tauri::command]
fn get_auth_status(state: State<AppState>) -> Result<bool, String> {
    Ok(state.api.has_auth_token())
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Verdant starting up...");

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .setup(|app| {
            let result = (|| -> anyhow::Result<()> {
                let app_data_dir = app
                    .path()
                    .app_data_dir()
                    .map_err(|err| anyhow::anyhow!(err))?;
                std::fs::create_dir_all(&app_data_dir)?;

                let settings_store = SettingsStore::new(app_data_dir.join("settings.json"))?;

                let api = Arc::new(ApiClient::new(
                    settings_store.api_base_url(),
                    settings_store.auth_token(),
                )?);

                let session_store = Arc::new(SessionStore::new(
                    app_data_dir.join("watering_sessions.json"),
                ));
                log::info!(
                    "loaded {} stored watering sessions",
                    session_store.len()
                );

                let watering = WateringController::new(
                    api.clone(),
                    session_store.clone(),
                    Arc::new(TauriEvents::new(app.handle().clone())),
                );

                app.manage(AppState {
                    api,
                    sessions: session_store,
                    watering,
                    settings: settings_store,
                    chat: ChatLog::new(),
                    scanner: Mutex::new(ScannerState::default()),
                });

                Ok(())
            })();

            result.map_err(|err| err.into())
        })
        .invoke_handler(tauri::generate_handler![
            get_theme_state,
            set_theme_mode,
            get_app_settings,
            register_account,
            login,
            logout,
            get_auth_status,
            list_plants,
            get_plant,
            rename_plant,
            delete_plant,
            pair_plant_sensor,
            get_watering_state,
            get_watering_availability,
            start_watering,
            stop_watering,
            reset_watering,
            list_watering_sessions,
            delete_watering_session,
            get_plant_care_stats,
            get_viewer_scene,
            select_viewer_clip,
            scan_frame,
            reset_scanner,
            identify_plant,
            send_chat_message,
            get_chat_history,
            clear_chat,
            list_dex_entries,
            get_dex_entry,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
