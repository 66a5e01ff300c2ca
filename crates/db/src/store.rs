//! [`VitalStore`] backed by PostgreSQL.

use async_trait::async_trait;
use uuid::Uuid;
use vitalwatch_core::alert::{Alert, AlertStatus};
use vitalwatch_core::patient::Patient;
use vitalwatch_core::store::{StoreError, StoreResult, VitalStore};
use vitalwatch_core::vitals::VitalReading;

use crate::repositories::{AlertRepo, PatientRepo, VitalReadingRepo};
use crate::DbPool;

/// Store implementation over a shared connection pool.
///
/// Cheap to clone; the pool handles concurrent callers.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map a sqlx failure onto the store taxonomy.
fn map_err(entity: &'static str, key: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::RowNotFound => StoreError::NotFound {
            entity,
            key: key.to_string(),
        },
        other => {
            tracing::error!(entity, key, error = %other, "Store query failed");
            StoreError::Unavailable(other.to_string())
        }
    }
}

fn not_found(entity: &'static str, key: &str) -> StoreError {
    StoreError::NotFound {
        entity,
        key: key.to_string(),
    }
}

/// Convert a batch of rows, skipping (and logging) any that are malformed.
pub(crate) fn convert_skipping_malformed<R, T>(entity: &'static str, rows: Vec<R>) -> Vec<T>
where
    T: TryFrom<R, Error = StoreError>,
{
    rows.into_iter()
        .filter_map(|row| match T::try_from(row) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!(entity, error = %e, "Skipping malformed record");
                None
            }
        })
        .collect()
}

#[async_trait]
impl VitalStore for PgStore {
    async fn list_patients(&self) -> StoreResult<Vec<Patient>> {
        let rows = PatientRepo::list_all(&self.pool)
            .await
            .map_err(|e| map_err("patient", "*", e))?;
        Ok(convert_skipping_malformed("patient", rows))
    }

    async fn get_patient(&self, patient_id: &str) -> StoreResult<Patient> {
        let row = PatientRepo::find_by_id(&self.pool, patient_id)
            .await
            .map_err(|e| map_err("patient", patient_id, e))?
            .ok_or_else(|| not_found("patient", patient_id))?;
        Patient::try_from(row)
    }

    async fn fetch_latest_reading(&self, patient_id: &str) -> StoreResult<VitalReading> {
        let row = VitalReadingRepo::get_latest(&self.pool, patient_id)
            .await
            .map_err(|e| map_err("vital reading", patient_id, e))?
            .ok_or_else(|| not_found("vital reading", patient_id))?;
        Ok(VitalReading::from(row))
    }

    async fn list_alerts(&self) -> StoreResult<Vec<Alert>> {
        let rows = AlertRepo::list_all(&self.pool)
            .await
            .map_err(|e| map_err("alert", "*", e))?;
        Ok(convert_skipping_malformed("alert", rows))
    }

    async fn list_alerts_by_patient(&self, patient_id: &str) -> StoreResult<Vec<Alert>> {
        let rows = AlertRepo::list_by_patient(&self.pool, patient_id)
            .await
            .map_err(|e| map_err("alert", patient_id, e))?;
        Ok(convert_skipping_malformed("alert", rows))
    }

    async fn get_alert(&self, alert_id: Uuid, patient_id: &str) -> StoreResult<Alert> {
        let key = alert_id.to_string();
        let row = AlertRepo::find(&self.pool, alert_id, patient_id)
            .await
            .map_err(|e| map_err("alert", &key, e))?
            .ok_or_else(|| not_found("alert", &key))?;
        Alert::try_from(row)
    }

    async fn persist_alert(&self, alert: &Alert) -> StoreResult<()> {
        AlertRepo::insert(&self.pool, alert)
            .await
            .map_err(|e| map_err("alert", &alert.alert_id.to_string(), e))
    }

    async fn update_alert_status(
        &self,
        alert_id: Uuid,
        patient_id: &str,
        expected: AlertStatus,
        next: AlertStatus,
    ) -> StoreResult<bool> {
        let key = alert_id.to_string();
        let updated = AlertRepo::update_status(&self.pool, alert_id, patient_id, expected, next)
            .await
            .map_err(|e| map_err("alert", &key, e))?;
        Ok(updated == 1)
    }
}
