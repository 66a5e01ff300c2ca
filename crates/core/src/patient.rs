//! Patient directory records.

use serde::{Deserialize, Serialize};

use crate::types::PatientId;

/// A monitored patient as listed on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub patient_id: PatientId,
    pub name: String,
    pub age: i32,
    pub gender: String,
    pub location: String,
    pub monitoring_type: String,
    pub status: String,
    pub contact: Contact,
    #[serde(default)]
    pub medical_history: Vec<MedicalHistoryEntry>,
    #[serde(default)]
    pub emergency_contacts: Vec<EmergencyContact>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub phone: String,
}

/// A past diagnosis and the year it was recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalHistoryEntry {
    pub condition: String,
    pub year: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub name: String,
    pub phone: String,
}
