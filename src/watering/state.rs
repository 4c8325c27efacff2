//! Watering controller state.
//!
//! Phases move strictly `idle → watering → stopped`; `stopped` holds the
//! recorded session for the summary card until the next start or a screen
//! teardown resets to `idle`. Every transition happens under the controller
//! lock, and `stop_with` is the single place a session record is built:
//! whichever caller flips `watering → stopped` gets the record, everyone
//! else gets `None`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Plant, WateringSession};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum WateringPhase {
    Idle,
    Watering,
    Stopped,
}

impl Default for WateringPhase {
    fn default() -> Self {
        WateringPhase::Idle
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WateringState {
    pub phase: WateringPhase,
    pub plant_id: Option<i64>,
    pub plant_name: Option<String>,
    pub sensor_id: Option<String>,
    pub target_humidity: Option<f64>,
    pub start_time: Option<DateTime<Utc>>,
    pub humidity_start: Option<f64>,
    /// Latest successfully fetched humidity while watering.
    pub latest_humidity: Option<f64>,
    /// Sticky poll-failure flag: set on a failed fetch, cleared by the next
    /// success, never stops the loop.
    pub fetch_error: bool,
    /// The record written by the most recent stop, kept for the summary UI.
    pub last_session: Option<WateringSession>,
}

/// Flat view of the controller state sent to the webview with every
/// state-changed and tick event.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WateringSnapshot {
    #[serde(flatten)]
    pub state: WateringState,
    pub progress: Option<f64>,
}

impl WateringState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> WateringSnapshot {
        WateringSnapshot {
            state: self.clone(),
            progress: self.progress(),
        }
    }

    /// Fraction of the way from the starting humidity to the target,
    /// clamped to 0..=1. Drives the gauge.
    pub fn progress(&self) -> Option<f64> {
        let (start, target) = (self.humidity_start?, self.target_humidity?);
        let latest = self.latest_humidity?;
        if target <= start {
            return Some(1.0);
        }
        Some(((latest - start) / (target - start)).clamp(0.0, 1.0))
    }

    /// Enter `watering` for a plant whose sensor just reported
    /// `humidity_start`.
    pub fn begin_session(
        &mut self,
        plant: &Plant,
        sensor_id: String,
        start_time: DateTime<Utc>,
        humidity_start: f64,
    ) {
        *self = Self {
            phase: WateringPhase::Watering,
            plant_id: Some(plant.id),
            plant_name: Some(plant.name.clone()),
            sensor_id: Some(sensor_id),
            target_humidity: Some(plant.target_humidity),
            start_time: Some(start_time),
            humidity_start: Some(humidity_start),
            latest_humidity: Some(humidity_start),
            fetch_error: false,
            last_session: None,
        };
    }

    /// Flip `watering → stopped` and build the session record. Returns
    /// `None` unless this call performed the transition, so stop paths can
    /// race without double-recording. `humidityEnd` falls back to the
    /// starting humidity when no poll ever succeeded.
    pub fn stop_with(&mut self, end_time: DateTime<Utc>) -> Option<WateringSession> {
        if self.phase != WateringPhase::Watering {
            return None;
        }

        let plant_id = self.plant_id?;
        let start_time = self.start_time?;
        let humidity_start = self.humidity_start?;
        let humidity_end = self.latest_humidity.unwrap_or(humidity_start);

        let session = WateringSession {
            id: WateringSession::composite_id(plant_id, start_time),
            plant_id,
            plant_name: self.plant_name.clone().unwrap_or_default(),
            sensor_id: self.sensor_id.clone().unwrap_or_default(),
            start_time,
            end_time,
            duration_seconds: (end_time - start_time).num_seconds().max(0) as u64,
            humidity_start,
            humidity_end,
            target_humidity: self.target_humidity.unwrap_or(humidity_start),
        };

        self.phase = WateringPhase::Stopped;
        self.last_session = Some(session.clone());
        Some(session)
    }

    /// Back to `idle`, dropping everything. Teardown path, no record.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
