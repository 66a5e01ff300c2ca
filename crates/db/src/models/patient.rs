//! Patient rows.

use sqlx::FromRow;
use vitalwatch_core::patient::{Contact, Patient};
use vitalwatch_core::store::StoreError;

/// A row of the `patients` table. The JSONB list columns are decoded on
/// conversion so that one bad document only affects its own row.
#[derive(Debug, Clone, FromRow)]
pub struct PatientRow {
    pub patient_id: String,
    pub name: String,
    pub age: i32,
    pub gender: String,
    pub location: String,
    pub monitoring_type: String,
    pub status: String,
    pub contact_phone: String,
    pub medical_history: serde_json::Value,
    pub emergency_contacts: serde_json::Value,
}

impl TryFrom<PatientRow> for Patient {
    type Error = StoreError;

    fn try_from(row: PatientRow) -> Result<Self, Self::Error> {
        let medical_history = serde_json::from_value(row.medical_history).map_err(|e| {
            StoreError::Malformed(format!(
                "patient {} has invalid medical_history: {e}",
                row.patient_id
            ))
        })?;
        let emergency_contacts = serde_json::from_value(row.emergency_contacts).map_err(|e| {
            StoreError::Malformed(format!(
                "patient {} has invalid emergency_contacts: {e}",
                row.patient_id
            ))
        })?;

        Ok(Patient {
            patient_id: row.patient_id,
            name: row.name,
            age: row.age,
            gender: row.gender,
            location: row.location,
            monitoring_type: row.monitoring_type,
            status: row.status,
            contact: Contact {
                phone: row.contact_phone,
            },
            medical_history,
            emergency_contacts,
        })
    }
}
