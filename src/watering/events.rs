//! Event sink between the watering controller and the webview.
//!
//! The controller emits through this trait instead of holding an
//! `AppHandle` directly, so tests can plug in a recording sink and assert
//! on the exact sequence of state changes and ticks.

use serde::Serialize;
use tauri::{AppHandle, Emitter};

use super::state::WateringSnapshot;
use crate::models::WateringSession;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_error;

pub const STATE_CHANGED_EVENT: &str = "watering-state-changed";
pub const TICK_EVENT: &str = "watering-tick";
pub const SESSION_RECORDED_EVENT: &str = "watering-session-recorded";

pub trait WateringEvents: Send + Sync + 'static {
    /// Phase transition: start, stop, auto-stop, reset.
    fn state_changed(&self, snapshot: &WateringSnapshot);
    /// One poll cycle finished, successfully or not.
    fn tick(&self, snapshot: &WateringSnapshot);
    /// A session record was appended to the store.
    fn session_recorded(&self, session: &WateringSession);
}

#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
struct SessionRecordedEvent {
    session_id: String,
    session: WateringSession,
}

/// Production sink: forwards every event to the webview.
pub struct TauriEvents {
    app_handle: AppHandle,
}

impl TauriEvents {
    pub fn new(app_handle: AppHandle) -> Self {
        Self { app_handle }
    }
}

impl WateringEvents for TauriEvents {
    fn state_changed(&self, snapshot: &WateringSnapshot) {
        if let Err(err) = self.app_handle.emit(STATE_CHANGED_EVENT, snapshot) {
            log_error!("failed to emit {}: {}", STATE_CHANGED_EVENT, err);
        }
    }

    fn tick(&self, snapshot: &WateringSnapshot) {
        if let Err(err) = self.app_handle.emit(TICK_EVENT, snapshot) {
            log_error!("failed to emit {}: {}", TICK_EVENT, err);
        }
    }

    fn session_recorded(&self, session: &WateringSession) {
        let payload = SessionRecordedEvent {
            session_id: session.id.clone(),
            session: session.clone(),
        };
        if let Err(err) = self.app_handle.emit(SESSION_RECORDED_EVENT, payload) {
            log_error!("failed to emit {}: {}", SESSION_RECORDED_EVENT, err);
        }
    }
}
