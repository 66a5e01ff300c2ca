//! Repository for the `patients` table.

use sqlx::PgPool;

use crate::models::patient::PatientRow;

/// Column list for `patients` SELECT queries.
const COLUMNS: &str = "\
    patient_id, name, age, gender, location, monitoring_type, status, \
    contact_phone, medical_history, emergency_contacts";

/// Provides query operations for patients.
pub struct PatientRepo;

impl PatientRepo {
    /// List all patients ordered by id.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<PatientRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM patients ORDER BY patient_id");
        sqlx::query_as::<_, PatientRow>(&query).fetch_all(pool).await
    }

    /// Find a patient by id.
    pub async fn find_by_id(
        pool: &PgPool,
        patient_id: &str,
    ) -> Result<Option<PatientRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM patients WHERE patient_id = $1");
        sqlx::query_as::<_, PatientRow>(&query)
            .bind(patient_id)
            .fetch_optional(pool)
            .await
    }
}
