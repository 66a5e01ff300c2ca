//! Storage contract for patients, readings and alerts.
//!
//! The live feed and the alert pipeline only ever talk to storage through
//! [`VitalStore`]. Implementations must be safe for concurrent independent
//! calls; nothing above this trait adds locking or caching.

use async_trait::async_trait;
use uuid::Uuid;

use crate::alert::{Alert, AlertStatus};
use crate::patient::Patient;
use crate::vitals::VitalReading;

/// Failures reported by a [`VitalStore`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// No record matches the key.
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    /// The query, scan or write itself failed. Callers treat this as transient.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A stored record could not be read back into the expected shape.
    #[error("malformed record: {0}")]
    Malformed(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait VitalStore: Send + Sync {
    /// All patients in the directory.
    async fn list_patients(&self) -> StoreResult<Vec<Patient>>;

    /// One patient by id.
    async fn get_patient(&self, patient_id: &str) -> StoreResult<Patient>;

    /// The most recent reading for a patient, by descending timestamp.
    async fn fetch_latest_reading(&self, patient_id: &str) -> StoreResult<VitalReading>;

    /// Every stored alert. Malformed rows are skipped, not reported.
    async fn list_alerts(&self) -> StoreResult<Vec<Alert>>;

    /// Alerts for one patient. Malformed rows are skipped, not reported.
    async fn list_alerts_by_patient(&self, patient_id: &str) -> StoreResult<Vec<Alert>>;

    /// One alert by its composite key.
    async fn get_alert(&self, alert_id: Uuid, patient_id: &str) -> StoreResult<Alert>;

    /// Write a new alert.
    async fn persist_alert(&self, alert: &Alert) -> StoreResult<()>;

    /// Move an alert from `expected` to `next` atomically.
    ///
    /// Returns `false` when no alert with that key currently has status
    /// `expected`; nothing is written in that case.
    async fn update_alert_status(
        &self,
        alert_id: Uuid,
        patient_id: &str,
        expected: AlertStatus,
        next: AlertStatus,
    ) -> StoreResult<bool>;
}
