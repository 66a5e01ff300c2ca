#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use tokio::sync::Barrier;
use tower::ServiceExt;
use uuid::Uuid;
use vitalwatch_api::config::ServerConfig;
use vitalwatch_api::router::build_app_router;
use vitalwatch_api::state::AppState;
use vitalwatch_core::alert::{Alert, AlertStatus};
use vitalwatch_core::patient::{Contact, Patient};
use vitalwatch_core::store::{StoreError, StoreResult, VitalStore};
use vitalwatch_core::vitals::{VitalReading, VitalSigns};

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Tables {
    patients: Vec<Patient>,
    readings: HashMap<String, Vec<VitalReading>>,
    alerts: Vec<Alert>,
}

/// [`VitalStore`] backed by plain vectors, with switches for injecting
/// failures and a counter of every call made.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    calls: AtomicUsize,
    /// The next N `persist_alert` calls fail with `Unavailable`.
    pub persist_failures: AtomicUsize,
    /// Every `list_alerts` call fails with `Unavailable` while set.
    pub fail_list_alerts: AtomicBool,
    /// Every `fetch_latest_reading` call fails with `Unavailable` while set.
    pub fail_latest_reading: AtomicBool,
    /// Per-call delays for `fetch_latest_reading`, consumed front to back.
    fetch_delays: Mutex<VecDeque<Duration>>,
    /// Per-call delays for `list_alerts`, consumed front to back.
    list_delays: Mutex<VecDeque<Duration>>,
    /// When set, every `get_alert` waits on this barrier before reading.
    get_alert_gate: Mutex<Option<Arc<Barrier>>>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_patient(&self, patient: Patient) {
        self.tables.lock().unwrap().patients.push(patient);
    }

    pub fn add_reading(&self, reading: VitalReading) {
        self.tables
            .lock()
            .unwrap()
            .readings
            .entry(reading.patient_id.clone())
            .or_default()
            .push(reading);
    }

    pub fn add_alert(&self, alert: Alert) {
        self.tables.lock().unwrap().alerts.push(alert);
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.tables.lock().unwrap().alerts.clone()
    }

    pub fn alert_count(&self) -> usize {
        self.tables.lock().unwrap().alerts.len()
    }

    /// Queue delays for upcoming `fetch_latest_reading` calls.
    pub fn delay_fetches(&self, delays: impl IntoIterator<Item = Duration>) {
        self.fetch_delays.lock().unwrap().extend(delays);
    }

    /// Queue delays for upcoming `list_alerts` calls.
    pub fn delay_lists(&self, delays: impl IntoIterator<Item = Duration>) {
        self.list_delays.lock().unwrap().extend(delays);
    }

    /// Hold every `get_alert` until `parties` callers have arrived.
    pub fn gate_get_alert(&self, parties: usize) {
        *self.get_alert_gate.lock().unwrap() = Some(Arc::new(Barrier::new(parties)));
    }

    /// Total number of store calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl VitalStore for MemoryStore {
    async fn list_patients(&self) -> StoreResult<Vec<Patient>> {
        self.record_call();
        Ok(self.tables.lock().unwrap().patients.clone())
    }

    async fn get_patient(&self, patient_id: &str) -> StoreResult<Patient> {
        self.record_call();
        self.tables
            .lock()
            .unwrap()
            .patients
            .iter()
            .find(|p| p.patient_id == patient_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                entity: "Patient",
                key: patient_id.to_string(),
            })
    }

    async fn fetch_latest_reading(&self, patient_id: &str) -> StoreResult<VitalReading> {
        self.record_call();
        let delay = self.fetch_delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_latest_reading.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected read failure".into()));
        }
        self.tables
            .lock()
            .unwrap()
            .readings
            .get(patient_id)
            .and_then(|rs| rs.iter().max_by_key(|r| r.timestamp))
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                entity: "VitalReading",
                key: patient_id.to_string(),
            })
    }

    async fn list_alerts(&self) -> StoreResult<Vec<Alert>> {
        self.record_call();
        let delay = self.list_delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_list_alerts.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected list failure".into()));
        }
        Ok(self.alerts())
    }

    async fn list_alerts_by_patient(&self, patient_id: &str) -> StoreResult<Vec<Alert>> {
        self.record_call();
        Ok(self
            .alerts()
            .into_iter()
            .filter(|a| a.patient_id == patient_id)
            .collect())
    }

    async fn get_alert(&self, alert_id: Uuid, patient_id: &str) -> StoreResult<Alert> {
        self.record_call();
        let gate = self.get_alert_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.wait().await;
        }
        self.alerts()
            .into_iter()
            .find(|a| a.alert_id == alert_id && a.patient_id == patient_id)
            .ok_or_else(|| StoreError::NotFound {
                entity: "Alert",
                key: alert_id.to_string(),
            })
    }

    async fn persist_alert(&self, alert: &Alert) -> StoreResult<()> {
        self.record_call();
        let remaining = self.persist_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.persist_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(StoreError::Unavailable("injected write failure".into()));
        }
        self.add_alert(alert.clone());
        Ok(())
    }

    async fn update_alert_status(
        &self,
        alert_id: Uuid,
        patient_id: &str,
        expected: AlertStatus,
        next: AlertStatus,
    ) -> StoreResult<bool> {
        self.record_call();
        let mut tables = self.tables.lock().unwrap();
        let alert = tables
            .alerts
            .iter_mut()
            .find(|a| a.alert_id == alert_id && a.patient_id == patient_id)
            .ok_or_else(|| StoreError::NotFound {
                entity: "Alert",
                key: alert_id.to_string(),
            })?;
        if alert.status != expected {
            return Ok(false);
        }
        alert.status = next;
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        live_feed_interval_secs: 5,
    }
}

pub fn test_state(store: Arc<MemoryStore>) -> AppState {
    AppState::new(store, test_config())
}

/// Build the full application router over an in-memory store, using the
/// same middleware stack as production.
pub fn build_test_app(store: Arc<MemoryStore>) -> Router {
    build_app_router(test_state(store), &test_config())
}

/// A reading at a fixed timestamp; everything but O2 and systolic is normal.
pub fn make_reading(patient_id: &str, oxygen_saturation: i32, systolic: i32) -> VitalReading {
    make_reading_at(patient_id, oxygen_saturation, systolic, 0)
}

/// Like [`make_reading`], `offset_secs` after the fixed base timestamp.
pub fn make_reading_at(
    patient_id: &str,
    oxygen_saturation: i32,
    systolic: i32,
    offset_secs: i64,
) -> VitalReading {
    let base = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
    VitalReading {
        patient_id: patient_id.to_string(),
        timestamp: base + chrono::Duration::seconds(offset_secs),
        vital_signs: VitalSigns {
            oxygen_saturation,
            blood_pressure_systolic: systolic,
            blood_pressure_diastolic: 80,
            heartbeat: 72,
            temperature: 98.6,
            blood_glucose: 100,
            respiration_rate: 16,
        },
        device_id: "monitor-01".to_string(),
        processing_time: None,
        name: String::new(),
        category: String::new(),
        condition: String::new(),
        alerts_generated: false,
    }
}

pub fn make_patient(patient_id: &str, name: &str) -> Patient {
    Patient {
        patient_id: patient_id.to_string(),
        name: name.to_string(),
        age: 67,
        gender: "female".to_string(),
        location: "Ward 3, Bed 12".to_string(),
        monitoring_type: "continuous".to_string(),
        status: "stable".to_string(),
        contact: Contact {
            phone: "555-0100".to_string(),
        },
        medical_history: Vec::new(),
        emergency_contacts: Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// HTTP helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn put_json(app: Router, uri: &str, json: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::PUT)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&json).unwrap()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
