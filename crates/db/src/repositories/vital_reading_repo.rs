//! Repository for the `vital_readings` table (append-only time-series).

use sqlx::PgPool;

use crate::models::vital_reading::VitalReadingRow;

/// Column list for `vital_readings` SELECT queries.
const COLUMNS: &str = "\
    patient_id, recorded_at, \
    oxygen_saturation, blood_pressure_systolic, blood_pressure_diastolic, \
    heartbeat, temperature, blood_glucose, respiration_rate, \
    device_id, processing_time, \
    name, category, condition, alerts_generated";

/// Provides query operations for vital readings.
pub struct VitalReadingRepo;

impl VitalReadingRepo {
    /// Get the most recent reading for a patient.
    pub async fn get_latest(
        pool: &PgPool,
        patient_id: &str,
    ) -> Result<Option<VitalReadingRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM vital_readings \
             WHERE patient_id = $1 \
             ORDER BY recorded_at DESC \
             LIMIT 1"
        );
        sqlx::query_as::<_, VitalReadingRow>(&query)
            .bind(patient_id)
            .fetch_optional(pool)
            .await
    }
}
