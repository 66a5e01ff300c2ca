//! Clinical alert types (threshold violations on a patient's vitals).

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;
use crate::types::{PatientId, Timestamp};
use crate::vitals::VitalType;

/// Severity level for a vital-sign threshold violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    /// Value crossed the warning band but not the critical band.
    Warning,
    /// Value crossed the critical band.
    Critical,
}

impl AlertSeverity {
    pub fn as_str(self) -> &'static str {
        match self {
            AlertSeverity::Warning => "warning",
            AlertSeverity::Critical => "critical",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "warning" => Some(AlertSeverity::Warning),
            "critical" => Some(AlertSeverity::Critical),
            _ => None,
        }
    }
}

/// Review status of an alert. The only mutable field of an [`Alert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    New,
    Acknowledged,
    Resolved,
}

impl AlertStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AlertStatus::New => "new",
            AlertStatus::Acknowledged => "acknowledged",
            AlertStatus::Resolved => "resolved",
        }
    }

    /// Parse a status value, rejecting anything outside the three legal values.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "new" => Ok(AlertStatus::New),
            "acknowledged" => Ok(AlertStatus::Acknowledged),
            "resolved" => Ok(AlertStatus::Resolved),
            other => Err(CoreError::Validation(format!(
                "status must be one of new, acknowledged, resolved; got '{other}'"
            ))),
        }
    }

    fn rank(self) -> u8 {
        match self {
            AlertStatus::New => 0,
            AlertStatus::Acknowledged => 1,
            AlertStatus::Resolved => 2,
        }
    }

    /// Whether moving from `self` to `next` goes forward.
    ///
    /// `new -> acknowledged | resolved` and `acknowledged -> resolved` are
    /// legal; nothing ever returns to `new`. Staying put is handled by the
    /// caller as a no-op and is not a transition.
    pub fn can_transition_to(self, next: AlertStatus) -> bool {
        next.rank() > self.rank()
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An alert produced by the evaluator, before identifiers are assigned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertCandidate {
    pub patient_id: PatientId,
    pub vital_type: VitalType,
    pub severity: AlertSeverity,
    pub value: f64,
    pub unit: String,
    pub message: String,
}

/// A persisted alert.
///
/// Severity, value and message are fixed at creation; `status` changes
/// only through an explicit status update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub patient_id: PatientId,
    pub alert_id: Uuid,
    pub message_id: Uuid,
    pub vital_type: VitalType,
    pub severity: AlertSeverity,
    pub value: f64,
    pub unit: String,
    pub message: String,
    pub status: AlertStatus,
    pub timestamp: Timestamp,
}

impl Alert {
    /// Materialize a candidate with fresh identifiers, status `new`, stamped at `now`.
    pub fn from_candidate(candidate: AlertCandidate, now: Timestamp) -> Self {
        Self {
            patient_id: candidate.patient_id,
            alert_id: Uuid::new_v4(),
            message_id: Uuid::new_v4(),
            vital_type: candidate.vital_type,
            severity: candidate.severity,
            value: candidate.value,
            unit: candidate.unit,
            message: candidate.message,
            status: AlertStatus::New,
            timestamp: now,
        }
    }
}
