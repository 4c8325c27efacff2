//! Per-plant watering statistics for the history and detail screens.
//! Derived on demand from the stored sequence, never persisted.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::WateringSession;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantCareStats {
    pub plant_id: i64,
    pub session_count: usize,
    pub goal_reached_count: usize,
    pub total_seconds: u64,
    pub average_duration_seconds: u64,
    pub last_watered_at: Option<DateTime<Utc>>,
    pub last_humidity_end: Option<f64>,
}

/// Aggregate one plant's sessions. Expects the store's newest-first order,
/// so "last watered" is the head of the list.
pub fn plant_care_stats(plant_id: i64, sessions: &[WateringSession]) -> PlantCareStats {
    let session_count = sessions.len();
    let goal_reached_count = sessions.iter().filter(|s| s.reached_goal()).count();
    let total_seconds: u64 = sessions.iter().map(|s| s.duration_seconds).sum();
    let average_duration_seconds = if session_count == 0 {
        0
    } else {
        total_seconds / session_count as u64
    };

    PlantCareStats {
        plant_id,
        session_count,
        goal_reached_count,
        total_seconds,
        average_duration_seconds,
        last_watered_at: sessions.first().map(|s| s.end_time),
        last_humidity_end: sessions.first().map(|s| s.humidity_end),
    }
}
