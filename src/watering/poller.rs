//! Background humidity poll loop.
//!
//! One loop per watering session. Every interval it fetches the latest
//! sensor reading, folds it into the shared state, and emits a tick. A
//! failed fetch sets the sticky `fetch_error` flag and the loop keeps
//! going; the loop only ends on cancellation or when the target humidity
//! is reached, in which case it performs the stop itself.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tokio::time::{Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::api::SensorReader;
use crate::models::SensorReading;
use crate::sessions::SessionStore;

use super::events::WateringEvents;
use super::state::{WateringPhase, WateringState};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info, log_warn};

const FETCH_TIMEOUT_SECS: u64 = 5;

pub(super) struct PollerDeps {
    pub state: Arc<Mutex<WateringState>>,
    pub reader: Arc<dyn SensorReader>,
    pub store: Arc<SessionStore>,
    pub events: Arc<dyn WateringEvents>,
    pub sensor_id: String,
    pub cancel_token: CancellationToken,
    pub poll_interval: Duration,
    pub log_every_ticks: u32,
}

enum PollOutcome {
    Continue,
    Finished,
}

pub(super) async fn polling_loop(deps: PollerDeps) {
    // First poll lands one full interval after start; the controller
    // already fetched a reading at time zero.
    let start = tokio::time::Instant::now() + deps.poll_interval;
    let mut ticker = tokio::time::interval_at(start, deps.poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut ticks: u32 = 0;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                ticks = ticks.wrapping_add(1);
                let heartbeat = ticks % deps.log_every_ticks == 0;
                match poll_once(&deps, heartbeat).await {
                    PollOutcome::Continue => {}
                    PollOutcome::Finished => break,
                }
            }
            _ = deps.cancel_token.cancelled() => {
                log_info!("watering poll loop shutting down");
                break;
            }
        }
    }
}

async fn poll_once(deps: &PollerDeps, heartbeat: bool) -> PollOutcome {
    let fetch = deps.reader.latest_reading(&deps.sensor_id);
    let fetched: Result<SensorReading, String> =
        match tokio::time::timeout(Duration::from_secs(FETCH_TIMEOUT_SECS), fetch).await {
            Ok(Ok(reading)) => Ok(reading),
            Ok(Err(err)) => Err(err.to_string()),
            Err(_) => Err(format!("sensor fetch timed out (> {FETCH_TIMEOUT_SECS}s)")),
        };

    let mut guard = deps.state.lock().await;
    if guard.phase != WateringPhase::Watering {
        // A stop or reset landed while the fetch was in flight; the
        // reading is stale, drop it and wind down.
        return PollOutcome::Finished;
    }

    match fetched {
        Err(msg) => {
            guard.fetch_error = true;
            let snapshot = guard.snapshot();
            drop(guard);

            log_warn!("sensor poll failed for {}: {}", deps.sensor_id, msg);
            deps.events.tick(&snapshot);
            PollOutcome::Continue
        }
        Ok(reading) => {
            guard.fetch_error = false;
            guard.latest_humidity = Some(reading.humidity);

            let reached = guard
                .target_humidity
                .map_or(false, |target| reading.humidity >= target);

            if !reached {
                let snapshot = guard.snapshot();
                drop(guard);

                if heartbeat {
                    log_info!(
                        "humidity {:.1}% on sensor {}",
                        reading.humidity,
                        deps.sensor_id
                    );
                }
                deps.events.tick(&snapshot);
                return PollOutcome::Continue;
            }

            // Target reached: flip to stopped while still holding the lock
            // so a racing manual stop cannot record a second session, and
            // persist before releasing it so anyone who observes the
            // stopped phase also finds the record in the store.
            let Some(session) = guard.stop_with(Utc::now()) else {
                return PollOutcome::Finished;
            };
            let snapshot = guard.snapshot();
            if let Err(err) = deps.store.append(session.clone()) {
                log_error!("failed to persist watering session {}: {err:?}", session.id);
            }
            drop(guard);

            log_info!(
                "target humidity reached ({:.1}% >= {:.1}%), stopping watering for plant {}",
                reading.humidity,
                session.target_humidity,
                session.plant_id
            );

            deps.events.state_changed(&snapshot);
            deps.events.session_recorded(&session);
            PollOutcome::Finished
        }
    }
}
