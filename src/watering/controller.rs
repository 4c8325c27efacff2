//! Watering session controller.
//!
//! Owns the shared state and the background poll loop. Start performs a
//! fresh sensor fetch so the session baseline is never stale, then spawns
//! the poller. Stop and reset flip the state first and only then join the
//! loop, so a poll that is already in flight sees the new phase and drops
//! its reading.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::api::SensorReader;
use crate::models::{Plant, WateringSession};
use crate::sessions::SessionStore;

use super::events::WateringEvents;
use super::poller::{polling_loop, PollerDeps};
use super::state::{WateringPhase, WateringSnapshot, WateringState};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info, log_warn};

/// Whether the watering screen can start for a plant.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum WateringAvailability {
    /// Plant has no paired sensor; the screen shows pairing guidance
    /// instead of a start button.
    NoSensor,
    /// Sensor is paired. `initial_humidity` is a best-effort probe for the
    /// gauge; `None` when the probe failed, which does not block starting.
    Ready { initial_humidity: Option<f64> },
}

/// Result of a start request.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum StartOutcome {
    NoSensor,
    /// Soil is already at or above target; nothing was started or recorded.
    AlreadyAtGoal { humidity: f64 },
    Started { snapshot: WateringSnapshot },
}

struct PollerTask {
    handle: JoinHandle<()>,
    cancel_token: CancellationToken,
}

#[derive(Clone)]
pub struct WateringController {
    state: Arc<Mutex<WateringState>>,
    reader: Arc<dyn SensorReader>,
    store: Arc<SessionStore>,
    events: Arc<dyn WateringEvents>,
    poller: Arc<Mutex<Option<PollerTask>>>,
    poll_interval: Duration,
    log_every_ticks: u32,
}

impl WateringController {
    pub fn new(
        reader: Arc<dyn SensorReader>,
        store: Arc<SessionStore>,
        events: Arc<dyn WateringEvents>,
    ) -> Self {
        let debug_mode = std::env::var("VERDANT_DEBUG")
            .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Self {
            state: Arc::new(Mutex::new(WateringState::new())),
            reader,
            store,
            events,
            poller: Arc::new(Mutex::new(None)),
            poll_interval: Duration::from_secs(1),
            log_every_ticks: if debug_mode { 1 } else { 10 },
        }
    }

    /// Override the poll cadence. The default is one fetch per second.
    #[allow(dead_code)]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub async fn snapshot(&self) -> WateringSnapshot {
        self.state.lock().await.snapshot()
    }

    /// Probe whether watering can start for this plant. A failed probe
    /// still reports `Ready`; only a missing sensor blocks the screen.
    pub async fn availability(&self, plant: &Plant) -> WateringAvailability {
        let Some(sensor_id) = plant.sensor_id.as_deref() else {
            return WateringAvailability::NoSensor;
        };

        let initial_humidity = match self.reader.latest_reading(sensor_id).await {
            Ok(reading) => Some(reading.humidity),
            Err(err) => {
                log_warn!("availability probe failed for sensor {}: {}", sensor_id, err);
                None
            }
        };
        WateringAvailability::Ready { initial_humidity }
    }

    /// Start watering. Fetches a fresh reading for the session baseline;
    /// a fetch failure here is an error, unlike poll failures later.
    pub async fn start(&self, plant: &Plant) -> Result<StartOutcome> {
        {
            let state = self.state.lock().await;
            if state.phase == WateringPhase::Watering {
                bail!("watering already active");
            }
        }

        let Some(sensor_id) = plant.sensor_id.clone() else {
            return Ok(StartOutcome::NoSensor);
        };

        let reading = self
            .reader
            .latest_reading(&sensor_id)
            .await
            .with_context(|| format!("could not read sensor {sensor_id} before starting"))?;

        if reading.humidity >= plant.target_humidity {
            log_info!(
                "soil already at target ({:.1}% >= {:.1}%) for plant {}, not starting",
                reading.humidity,
                plant.target_humidity,
                plant.id
            );
            return Ok(StartOutcome::AlreadyAtGoal {
                humidity: reading.humidity,
            });
        }

        let snapshot = {
            let mut state = self.state.lock().await;
            // Re-check after the await above; a racing start may have won.
            if state.phase == WateringPhase::Watering {
                bail!("watering already active");
            }
            state.begin_session(plant, sensor_id.clone(), Utc::now(), reading.humidity);
            state.snapshot()
        };

        self.spawn_poller(sensor_id).await;
        self.events.state_changed(&snapshot);

        Ok(StartOutcome::Started { snapshot })
    }

    /// Stop the active session and persist its record. Errors when no
    /// session is running, including when the auto-stop got there first.
    pub async fn stop(&self) -> Result<WateringSession> {
        let (session, snapshot) = {
            let mut state = self.state.lock().await;
            let Some(session) = state.stop_with(Utc::now()) else {
                bail!("no active watering session to stop");
            };
            (session, state.snapshot())
        };

        // Lock released above: the poll loop may be waiting on it and the
        // join below must not deadlock.
        self.cancel_poller().await;

        self.store.append(session.clone())?;
        self.events.state_changed(&snapshot);
        self.events.session_recorded(&session);

        Ok(session)
    }

    /// Screen teardown. Drops any active session without recording it.
    pub async fn reset(&self) {
        let snapshot = {
            let mut state = self.state.lock().await;
            state.reset();
            state.snapshot()
        };

        self.cancel_poller().await;
        self.events.state_changed(&snapshot);
    }

    async fn spawn_poller(&self, sensor_id: String) {
        let mut poller_guard = self.poller.lock().await;
        if let Some(task) = poller_guard.take() {
            task.cancel_token.cancel();
            task.handle.abort();
        }

        let cancel_token = CancellationToken::new();
        let deps = PollerDeps {
            state: self.state.clone(),
            reader: self.reader.clone(),
            store: self.store.clone(),
            events: self.events.clone(),
            sensor_id,
            cancel_token: cancel_token.clone(),
            poll_interval: self.poll_interval,
            log_every_ticks: self.log_every_ticks,
        };

        let handle = tokio::spawn(polling_loop(deps));
        *poller_guard = Some(PollerTask {
            handle,
            cancel_token,
        });
    }

    async fn cancel_poller(&self) {
        let task = self.poller.lock().await.take();
        if let Some(task) = task {
            task.cancel_token.cancel();
            if let Err(err) = task.handle.await {
                if !err.is_cancelled() {
                    log_error!("watering poll loop task failed to join: {err}");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::models::{Mood, SensorReading};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex as StdMutex;

    enum Read {
        Humidity(f64),
        Fail,
    }

    /// Plays back a fixed list of readings, then repeats the last humidity.
    struct ScriptedSensor {
        script: StdMutex<VecDeque<Read>>,
        last: StdMutex<f64>,
        calls: AtomicUsize,
    }

    impl ScriptedSensor {
        fn new(script: Vec<Read>) -> Arc<Self> {
            Arc::new(Self {
                script: StdMutex::new(script.into()),
                last: StdMutex::new(0.0),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SensorReader for ScriptedSensor {
        async fn latest_reading(&self, sensor_id: &str) -> Result<SensorReading, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let next = self.script.lock().unwrap().pop_front();
            match next {
                Some(Read::Humidity(humidity)) => {
                    *self.last.lock().unwrap() = humidity;
                    Ok(SensorReading {
                        sensor_id: sensor_id.to_string(),
                        humidity,
                        recorded_at: Utc::now(),
                    })
                }
                Some(Read::Fail) => Err(ApiError::Status {
                    status: 503,
                    message: "sensor offline".into(),
                }),
                None => Ok(SensorReading {
                    sensor_id: sensor_id.to_string(),
                    humidity: *self.last.lock().unwrap(),
                    recorded_at: Utc::now(),
                }),
            }
        }
    }

    #[derive(Default)]
    struct RecordingEvents {
        states: StdMutex<Vec<WateringSnapshot>>,
        ticks: StdMutex<Vec<WateringSnapshot>>,
        sessions: StdMutex<Vec<WateringSession>>,
    }

    impl WateringEvents for RecordingEvents {
        fn state_changed(&self, snapshot: &WateringSnapshot) {
            self.states.lock().unwrap().push(snapshot.clone());
        }

        fn tick(&self, snapshot: &WateringSnapshot) {
            self.ticks.lock().unwrap().push(snapshot.clone());
        }

        fn session_recorded(&self, session: &WateringSession) {
            self.sessions.lock().unwrap().push(session.clone());
        }
    }

    struct Harness {
        controller: WateringController,
        sensor: Arc<ScriptedSensor>,
        events: Arc<RecordingEvents>,
        store: Arc<SessionStore>,
        _dir: tempfile::TempDir,
    }

    fn harness(script: Vec<Read>) -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(SessionStore::new(dir.path().join("watering_sessions.json")));
        let sensor = ScriptedSensor::new(script);
        let events = Arc::new(RecordingEvents::default());
        let controller = WateringController::new(sensor.clone(), store.clone(), events.clone())
            .with_poll_interval(Duration::from_millis(20));
        Harness {
            controller,
            sensor,
            events,
            store,
            _dir: dir,
        }
    }

    fn fern() -> Plant {
        Plant {
            id: 7,
            name: "Boston Fern".into(),
            species: "Nephrolepis exaltata".into(),
            mood: Mood::Thirsty,
            sensor_id: Some("sens-7".into()),
            target_humidity: 80.0,
            model_url: None,
            image_url: None,
            notes: None,
        }
    }

    fn fern_without_sensor() -> Plant {
        Plant {
            sensor_id: None,
            ..fern()
        }
    }

    async fn wait_for<F>(controller: &WateringController, pred: F) -> WateringSnapshot
    where
        F: Fn(&WateringSnapshot) -> bool,
    {
        for _ in 0..200 {
            let snapshot = controller.snapshot().await;
            if pred(&snapshot) {
                return snapshot;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("snapshot condition not met within 1s");
    }

    #[tokio::test]
    async fn start_without_sensor_never_touches_the_network() {
        let h = harness(vec![]);

        let outcome = h.controller.start(&fern_without_sensor()).await.unwrap();
        assert!(matches!(outcome, StartOutcome::NoSensor));
        assert_eq!(h.sensor.calls(), 0);
        assert_eq!(
            h.controller.snapshot().await.state.phase,
            WateringPhase::Idle
        );
        assert!(h.store.is_empty());
    }

    #[tokio::test]
    async fn availability_distinguishes_missing_sensor_from_failed_probe() {
        let h = harness(vec![Read::Humidity(42.0), Read::Fail]);

        let no_sensor = h.controller.availability(&fern_without_sensor()).await;
        assert!(matches!(no_sensor, WateringAvailability::NoSensor));
        assert_eq!(h.sensor.calls(), 0);

        let ready = h.controller.availability(&fern()).await;
        assert!(matches!(
            ready,
            WateringAvailability::Ready {
                initial_humidity: Some(humidity)
            } if humidity == 42.0
        ));

        let probe_failed = h.controller.availability(&fern()).await;
        assert!(matches!(
            probe_failed,
            WateringAvailability::Ready {
                initial_humidity: None
            }
        ));
    }

    #[tokio::test]
    async fn start_when_already_at_goal_records_nothing() {
        let h = harness(vec![Read::Humidity(85.0)]);

        let outcome = h.controller.start(&fern()).await.unwrap();
        assert!(matches!(
            outcome,
            StartOutcome::AlreadyAtGoal { humidity } if humidity == 85.0
        ));

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(h.sensor.calls(), 1, "no poll loop may run");
        assert!(h.store.is_empty());
        assert_eq!(
            h.controller.snapshot().await.state.phase,
            WateringPhase::Idle
        );
    }

    #[tokio::test]
    async fn start_fetch_failure_is_an_error_and_stays_idle() {
        let h = harness(vec![Read::Fail]);

        let result = h.controller.start(&fern()).await;
        assert!(result.is_err());
        assert_eq!(
            h.controller.snapshot().await.state.phase,
            WateringPhase::Idle
        );
        assert!(h.store.is_empty());
    }

    #[tokio::test]
    async fn watering_runs_to_target_and_records_exactly_one_session() {
        let h = harness(vec![
            Read::Humidity(40.0),
            Read::Humidity(50.0),
            Read::Humidity(65.0),
            Read::Humidity(82.0),
        ]);

        let outcome = h.controller.start(&fern()).await.unwrap();
        let StartOutcome::Started { snapshot } = outcome else {
            panic!("expected watering to start");
        };
        assert_eq!(snapshot.state.phase, WateringPhase::Watering);
        assert_eq!(snapshot.state.humidity_start, Some(40.0));

        let stopped = wait_for(&h.controller, |s| {
            s.state.phase == WateringPhase::Stopped
        })
        .await;

        let sessions = h.store.all();
        assert_eq!(sessions.len(), 1);
        let session = &sessions[0];
        assert_eq!(session.plant_id, 7);
        assert_eq!(session.humidity_start, 40.0);
        assert_eq!(session.humidity_end, 82.0);
        assert_eq!(session.target_humidity, 80.0);
        assert!(session.reached_goal());
        assert!(session.end_time >= session.start_time);
        assert_eq!(
            session.id,
            WateringSession::composite_id(7, session.start_time)
        );

        // One baseline fetch plus three polls, and nothing after the stop.
        assert_eq!(h.sensor.calls(), 4);
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(h.sensor.calls(), 4);

        assert_eq!(h.events.sessions.lock().unwrap().len(), 1);
        assert_eq!(
            stopped.state.last_session.as_ref().map(|s| s.id.as_str()),
            Some(session.id.as_str())
        );
    }

    #[tokio::test]
    async fn manual_stop_records_and_halts_polling() {
        let h = harness(vec![Read::Humidity(40.0), Read::Humidity(50.0)]);

        h.controller.start(&fern()).await.unwrap();
        wait_for(&h.controller, |s| s.state.latest_humidity == Some(50.0)).await;

        let session = h.controller.stop().await.unwrap();
        assert_eq!(session.humidity_start, 40.0);
        assert_eq!(session.humidity_end, 50.0);
        assert!(!session.reached_goal());

        // stop() joins the loop before returning, so the call count is
        // final here.
        let calls = h.sensor.calls();
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(h.sensor.calls(), calls);

        assert_eq!(h.store.all().len(), 1);
        assert_eq!(
            h.controller.snapshot().await.state.phase,
            WateringPhase::Stopped
        );

        let second_stop = h.controller.stop().await;
        assert!(second_stop.is_err());
        assert_eq!(h.store.all().len(), 1);
    }

    #[tokio::test]
    async fn failed_polls_set_the_sticky_flag_until_the_next_success() {
        let h = harness(vec![
            Read::Humidity(40.0),
            Read::Fail,
            Read::Fail,
            Read::Humidity(55.0),
        ]);

        h.controller.start(&fern()).await.unwrap();

        let errored = wait_for(&h.controller, |s| s.state.fetch_error).await;
        assert_eq!(errored.state.phase, WateringPhase::Watering);
        assert_eq!(errored.state.latest_humidity, Some(40.0));

        let recovered = wait_for(&h.controller, |s| {
            !s.state.fetch_error && s.state.latest_humidity == Some(55.0)
        })
        .await;
        assert_eq!(recovered.state.phase, WateringPhase::Watering);

        let error_ticks = h
            .events
            .ticks
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.state.fetch_error)
            .count();
        assert!(error_ticks >= 1);

        h.controller.reset().await;
    }

    #[tokio::test]
    async fn reset_tears_down_without_recording() {
        let h = harness(vec![Read::Humidity(40.0), Read::Humidity(50.0)]);

        h.controller.start(&fern()).await.unwrap();
        wait_for(&h.controller, |s| s.state.latest_humidity == Some(50.0)).await;

        h.controller.reset().await;
        assert_eq!(
            h.controller.snapshot().await.state.phase,
            WateringPhase::Idle
        );
        assert!(h.store.is_empty());
        assert!(h.events.sessions.lock().unwrap().is_empty());

        let calls = h.sensor.calls();
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(h.sensor.calls(), calls);
    }

    #[tokio::test]
    async fn second_start_while_watering_is_rejected() {
        let h = harness(vec![Read::Humidity(40.0), Read::Humidity(45.0)]);

        h.controller.start(&fern()).await.unwrap();
        let second = h.controller.start(&fern()).await;
        assert!(second.is_err());

        h.controller.reset().await;
    }

    #[tokio::test]
    async fn reset_from_idle_is_a_quiet_no_op() {
        let h = harness(vec![]);

        h.controller.reset().await;
        assert_eq!(
            h.controller.snapshot().await.state.phase,
            WateringPhase::Idle
        );
        assert!(h.store.is_empty());
    }

    #[tokio::test]
    async fn drives_a_full_session_against_a_live_http_sensor() {
        use crate::api::ApiClient;
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;

        // First reading is the dry baseline, every later one is past target.
        Mock::given(method("GET"))
            .and(path("/sensors/sens-7/latest"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "sensorId": "sens-7",
                "humidity": 40.0,
                "recordedAt": "2026-08-25T10:00:00Z",
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/sensors/sens-7/latest"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "sensorId": "sens-7",
                "humidity": 85.0,
                "recordedAt": "2026-08-25T10:00:05Z",
            })))
            .mount(&server)
            .await;

        let api = Arc::new(ApiClient::new(server.uri(), None).unwrap());
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(SessionStore::new(dir.path().join("watering_sessions.json")));
        let events = Arc::new(RecordingEvents::default());
        let controller = WateringController::new(api, store.clone(), events.clone())
            .with_poll_interval(Duration::from_millis(20));

        let outcome = controller.start(&fern()).await.unwrap();
        assert!(matches!(outcome, StartOutcome::Started { .. }));

        wait_for(&controller, |s| s.state.phase == WateringPhase::Stopped).await;

        let sessions = store.all();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].humidity_start, 40.0);
        assert_eq!(sessions[0].humidity_end, 85.0);
        assert!(sessions[0].reached_goal());
        assert_eq!(events.sessions.lock().unwrap().len(), 1);
    }
}
