//! Alert pipeline: evaluation, persistence and status updates.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use vitalwatch_core::alert::{Alert, AlertCandidate, AlertStatus};
use vitalwatch_core::error::CoreError;
use vitalwatch_core::store::{StoreError, VitalStore};
use vitalwatch_core::thresholds::{self, ThresholdRule, DEFAULT_RULES};
use vitalwatch_core::validation::{validate_patient_id, validate_reading};
use vitalwatch_core::vitals::VitalReading;

/// Outcome of [`AlertService::process_reading`].
#[derive(Debug, Default)]
pub struct ProcessReport {
    /// Alerts that were written to the store, in evaluation order.
    pub persisted: Vec<Alert>,
    /// Candidates whose write failed (already logged).
    pub failed: usize,
}

/// Turns readings into alerts and manages alert status.
///
/// Holds no mutable state; safe to share behind an `Arc`.
pub struct AlertService {
    store: Arc<dyn VitalStore>,
    rules: Vec<ThresholdRule>,
}

impl AlertService {
    /// Create a service using the default rule table.
    pub fn new(store: Arc<dyn VitalStore>) -> Self {
        Self {
            store,
            rules: DEFAULT_RULES.to_vec(),
        }
    }

    /// Create a service with a custom rule table.
    pub fn with_rules(
        store: Arc<dyn VitalStore>,
        rules: Vec<ThresholdRule>,
    ) -> Result<Self, CoreError> {
        for rule in &rules {
            rule.validate()?;
        }
        Ok(Self { store, rules })
    }

    /// Evaluate a reading and persist every resulting alert.
    ///
    /// A failed write is logged and the remaining candidates are still
    /// attempted. Only a malformed reading fails the call, before anything
    /// is written. Repeated calls with a reading that stays out of range
    /// create a new alert each time.
    pub async fn process_reading(&self, reading: &VitalReading) -> Result<ProcessReport, CoreError> {
        validate_reading(reading)?;

        let candidates = thresholds::evaluate(reading, &self.rules);
        let mut report = ProcessReport::default();

        for candidate in candidates {
            let vital_type = candidate.vital_type;
            match self.create_alert(candidate).await {
                Ok(alert) => {
                    tracing::info!(
                        patient_id = %alert.patient_id,
                        alert_id = %alert.alert_id,
                        vital_type = %alert.vital_type,
                        severity = alert.severity.as_str(),
                        value = alert.value,
                        "Alert created"
                    );
                    report.persisted.push(alert);
                }
                Err(e) => {
                    tracing::error!(
                        patient_id = %reading.patient_id,
                        vital_type = %vital_type,
                        error = %e,
                        "Failed to persist alert"
                    );
                    report.failed += 1;
                }
            }
        }

        Ok(report)
    }

    /// Assign identifiers and a timestamp to a candidate and persist it.
    ///
    /// Store errors are returned as-is.
    pub async fn create_alert(&self, candidate: AlertCandidate) -> Result<Alert, StoreError> {
        let alert = Alert::from_candidate(candidate, Utc::now());
        self.store.persist_alert(&alert).await?;
        Ok(alert)
    }

    /// Move an alert to `status`.
    ///
    /// The status value and patient id are validated before the store is
    /// touched. Transitions must go forward (`new` -> `acknowledged` ->
    /// `resolved`); requesting the current status is a no-op.
    pub async fn update_status(
        &self,
        alert_id: Uuid,
        patient_id: &str,
        status: &str,
    ) -> Result<Alert, CoreError> {
        let next = AlertStatus::parse(status)?;
        validate_patient_id(patient_id)?;

        let mut alert = self.store.get_alert(alert_id, patient_id).await?;
        if alert.status == next {
            return Ok(alert);
        }
        if !alert.status.can_transition_to(next) {
            return Err(CoreError::Conflict(format!(
                "alert {alert_id} cannot move from {} to {next}",
                alert.status
            )));
        }

        // Compare-and-set; a concurrent update may have moved the alert on
        // since it was read.
        let applied = self
            .store
            .update_alert_status(alert_id, patient_id, alert.status, next)
            .await?;
        if !applied {
            tracing::warn!(
                alert_id = %alert_id,
                patient_id,
                to = %next,
                "Concurrent status update lost"
            );
            return Err(CoreError::Conflict(format!(
                "alert {alert_id} was updated concurrently; it is no longer {}",
                alert.status
            )));
        }
        tracing::info!(
            alert_id = %alert_id,
            patient_id,
            from = %alert.status,
            to = %next,
            "Alert status updated"
        );
        alert.status = next;
        Ok(alert)
    }

    /// All alerts, as stored.
    pub async fn list_all(&self) -> Result<Vec<Alert>, StoreError> {
        self.store.list_alerts().await
    }

    /// Alerts for one patient, as stored.
    pub async fn list_by_patient(&self, patient_id: &str) -> Result<Vec<Alert>, StoreError> {
        self.store.list_alerts_by_patient(patient_id).await
    }
}
