//! Repository for the `alerts` table.

use sqlx::PgPool;
use uuid::Uuid;
use vitalwatch_core::alert::{Alert, AlertStatus};

use crate::models::alert::AlertRow;

/// Column list for `alerts` SELECT queries.
const COLUMNS: &str = "\
    alert_id, patient_id, message_id, vital_type, severity, \
    value, unit, message, status, created_at";

/// Provides query operations for alerts.
pub struct AlertRepo;

impl AlertRepo {
    /// Insert a new alert row.
    pub async fn insert(pool: &PgPool, alert: &Alert) -> Result<(), sqlx::Error> {
        let query = format!(
            "INSERT INTO alerts ({COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)"
        );
        sqlx::query(&query)
            .bind(alert.alert_id)
            .bind(&alert.patient_id)
            .bind(alert.message_id)
            .bind(alert.vital_type.as_str())
            .bind(alert.severity.as_str())
            .bind(alert.value)
            .bind(&alert.unit)
            .bind(&alert.message)
            .bind(alert.status.as_str())
            .bind(alert.timestamp)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// List every alert, newest first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<AlertRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM alerts ORDER BY created_at DESC");
        sqlx::query_as::<_, AlertRow>(&query).fetch_all(pool).await
    }

    /// List alerts for one patient, newest first.
    pub async fn list_by_patient(
        pool: &PgPool,
        patient_id: &str,
    ) -> Result<Vec<AlertRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM alerts \
             WHERE patient_id = $1 \
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, AlertRow>(&query)
            .bind(patient_id)
            .fetch_all(pool)
            .await
    }

    /// Find one alert by its composite key.
    pub async fn find(
        pool: &PgPool,
        alert_id: Uuid,
        patient_id: &str,
    ) -> Result<Option<AlertRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM alerts \
             WHERE alert_id = $1 AND patient_id = $2"
        );
        sqlx::query_as::<_, AlertRow>(&query)
            .bind(alert_id)
            .bind(patient_id)
            .fetch_optional(pool)
            .await
    }

    /// Set the status of one alert if it still has status `expected`.
    ///
    /// Returns the number of rows updated (0 when the key does not exist or
    /// the status has already moved on).
    pub async fn update_status(
        pool: &PgPool,
        alert_id: Uuid,
        patient_id: &str,
        expected: AlertStatus,
        next: AlertStatus,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE alerts SET status = $3, updated_at = NOW() \
             WHERE alert_id = $1 AND patient_id = $2 AND status = $4",
        )
        .bind(alert_id)
        .bind(patient_id)
        .bind(next.as_str())
        .bind(expected.as_str())
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
