//! Alert rows.

use sqlx::FromRow;
use uuid::Uuid;
use vitalwatch_core::alert::{Alert, AlertSeverity, AlertStatus};
use vitalwatch_core::store::StoreError;
use vitalwatch_core::types::Timestamp;
use vitalwatch_core::vitals::VitalType;

/// A row of the `alerts` table. Enum-like columns are kept as text and
/// parsed on conversion.
#[derive(Debug, Clone, FromRow)]
pub struct AlertRow {
    pub alert_id: Uuid,
    pub patient_id: String,
    pub message_id: Uuid,
    pub vital_type: String,
    pub severity: String,
    pub value: f64,
    pub unit: String,
    pub message: String,
    pub status: String,
    pub created_at: Timestamp,
}

impl TryFrom<AlertRow> for Alert {
    type Error = StoreError;

    fn try_from(row: AlertRow) -> Result<Self, Self::Error> {
        let vital_type = VitalType::parse(&row.vital_type).ok_or_else(|| {
            StoreError::Malformed(format!(
                "alert {} has unknown vital_type '{}'",
                row.alert_id, row.vital_type
            ))
        })?;
        let severity = AlertSeverity::parse(&row.severity).ok_or_else(|| {
            StoreError::Malformed(format!(
                "alert {} has unknown severity '{}'",
                row.alert_id, row.severity
            ))
        })?;
        let status = AlertStatus::parse(&row.status).map_err(|_| {
            StoreError::Malformed(format!(
                "alert {} has unknown status '{}'",
                row.alert_id, row.status
            ))
        })?;

        Ok(Alert {
            patient_id: row.patient_id,
            alert_id: row.alert_id,
            message_id: row.message_id,
            vital_type,
            severity,
            value: row.value,
            unit: row.unit,
            message: row.message,
            status,
            timestamp: row.created_at,
        })
    }
}
