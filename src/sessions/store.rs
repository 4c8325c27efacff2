//! On-device watering-session store.
//!
//! A single named slot (`watering_sessions.json` in the app data dir) holds
//! the full JSON-encoded sequence, newest first. Command tasks and the poll
//! loop mutate it concurrently, so the authoritative sequence lives in
//! memory behind an `RwLock` and every mutation persists while still
//! holding the write guard; two writers can never interleave a
//! read-modify-write.

use std::{fs, path::PathBuf, sync::RwLock};

use anyhow::{Context, Result};
use log::warn;

use crate::models::WateringSession;

pub struct SessionStore {
    path: PathBuf,
    data: RwLock<Vec<WateringSession>>,
}

impl SessionStore {
    /// Open the slot. A missing, unreadable, or malformed slot degrades to
    /// an empty sequence, logged and never propagated.
    pub fn new(path: PathBuf) -> Self {
        let data = Self::load(&path);
        Self {
            path,
            data: RwLock::new(data),
        }
    }

    fn load(path: &PathBuf) -> Vec<WateringSession> {
        if !path.exists() {
            return Vec::new();
        }

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) => {
                warn!("session slot unreadable, starting empty: {err}");
                return Vec::new();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(sessions) => sessions,
            Err(err) => {
                warn!("session slot malformed, starting empty: {err}");
                Vec::new()
            }
        }
    }

    /// Prepend a completed session and write the whole sequence back.
    pub fn append(&self, session: WateringSession) -> Result<()> {
        let mut guard = self.data.write().unwrap();
        guard.insert(0, session);
        self.persist(&guard)
    }

    /// Sessions for one plant, in stored order (newest first).
    pub fn list_by_plant(&self, plant_id: i64) -> Vec<WateringSession> {
        self.data
            .read()
            .unwrap()
            .iter()
            .filter(|session| session.plant_id == plant_id)
            .cloned()
            .collect()
    }

    /// Remove one session by id. Unknown ids are a no-op.
    pub fn delete_by_id(&self, session_id: &str) -> Result<()> {
        let mut guard = self.data.write().unwrap();
        guard.retain(|session| session.id != session_id);
        self.persist(&guard)
    }

    pub fn all(&self) -> Vec<WateringSession> {
        self.data.read().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.data.read().unwrap().len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.data.read().unwrap().is_empty()
    }

    fn persist(&self, data: &[WateringSession]) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write sessions to {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use tempfile::tempdir;

    fn session(plant_id: i64, minute: u32) -> WateringSession {
        let start = Utc.with_ymd_and_hms(2026, 3, 1, 9, minute, 0).unwrap();
        WateringSession {
            id: WateringSession::composite_id(plant_id, start),
            plant_id,
            plant_name: format!("plant-{plant_id}"),
            sensor_id: format!("sens-{plant_id}"),
            start_time: start,
            end_time: start + Duration::seconds(60),
            duration_seconds: 60,
            humidity_start: 40.0,
            humidity_end: 81.0,
            target_humidity: 80.0,
        }
    }

    #[test]
    fn list_by_plant_returns_exact_subset_newest_first() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("watering_sessions.json"));

        let a1 = session(1, 0);
        let b1 = session(2, 1);
        let a2 = session(1, 2);
        let a3 = session(1, 3);

        for s in [&a1, &b1, &a2, &a3] {
            store.append(s.clone()).unwrap();
        }

        // Appended a1, a2, a3 for plant 1: newest (a3) must come back first.
        let listed = store.list_by_plant(1);
        assert_eq!(
            listed.iter().map(|s| s.id.as_str()).collect::<Vec<_>>(),
            vec![a3.id.as_str(), a2.id.as_str(), a1.id.as_str()]
        );

        store.delete_by_id(&a2.id).unwrap();
        let listed = store.list_by_plant(1);
        assert_eq!(
            listed.iter().map(|s| s.id.as_str()).collect::<Vec<_>>(),
            vec![a3.id.as_str(), a1.id.as_str()]
        );

        assert_eq!(store.list_by_plant(2).len(), 1);
        assert!(store.list_by_plant(99).is_empty());
    }

    #[test]
    fn sequence_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("watering_sessions.json");

        {
            let store = SessionStore::new(path.clone());
            store.append(session(1, 0)).unwrap();
            store.append(session(1, 1)).unwrap();
        }

        let reopened = SessionStore::new(path);
        assert_eq!(reopened.len(), 2);
        let listed = reopened.list_by_plant(1);
        assert!(listed[0].start_time > listed[1].start_time);
    }

    #[test]
    fn malformed_slot_degrades_to_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("watering_sessions.json");
        fs::write(&path, "{ definitely not an array").unwrap();

        let store = SessionStore::new(path);
        assert!(store.list_by_plant(1).is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn deleting_unknown_id_is_a_no_op() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("watering_sessions.json"));
        store.append(session(1, 0)).unwrap();

        store.delete_by_id("no-such-id").unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn slot_format_is_a_json_array() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("watering_sessions.json");
        let store = SessionStore::new(path.clone());
        store.append(session(3, 0)).unwrap();

        let raw = fs::read_to_string(path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["plantId"], 3);
    }
}
