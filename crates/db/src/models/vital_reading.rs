//! Vital reading rows.

use sqlx::FromRow;
use vitalwatch_core::types::Timestamp;
use vitalwatch_core::vitals::{VitalReading, VitalSigns};

/// A row of the `vital_readings` table, flattened.
#[derive(Debug, Clone, FromRow)]
pub struct VitalReadingRow {
    pub patient_id: String,
    pub recorded_at: Timestamp,
    pub oxygen_saturation: i32,
    pub blood_pressure_systolic: i32,
    pub blood_pressure_diastolic: i32,
    pub heartbeat: i32,
    pub temperature: f64,
    pub blood_glucose: i32,
    pub respiration_rate: i32,
    pub device_id: String,
    pub processing_time: Option<Timestamp>,
    pub name: String,
    pub category: String,
    pub condition: String,
    pub alerts_generated: bool,
}

impl From<VitalReadingRow> for VitalReading {
    fn from(row: VitalReadingRow) -> Self {
        VitalReading {
            patient_id: row.patient_id,
            timestamp: row.recorded_at,
            vital_signs: VitalSigns {
                oxygen_saturation: row.oxygen_saturation,
                blood_pressure_systolic: row.blood_pressure_systolic,
                blood_pressure_diastolic: row.blood_pressure_diastolic,
                heartbeat: row.heartbeat,
                temperature: row.temperature,
                blood_glucose: row.blood_glucose,
                respiration_rate: row.respiration_rate,
            },
            device_id: row.device_id,
            processing_time: row.processing_time,
            name: row.name,
            category: row.category,
            condition: row.condition,
            alerts_generated: row.alerts_generated,
        }
    }
}
