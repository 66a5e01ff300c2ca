//! Patient directory and latest-vitals lookups.

use std::sync::Arc;

use vitalwatch_core::error::CoreError;
use vitalwatch_core::patient::Patient;
use vitalwatch_core::store::VitalStore;
use vitalwatch_core::validation::validate_patient_id;
use vitalwatch_core::vitals::VitalReading;

pub struct PatientService {
    store: Arc<dyn VitalStore>,
}

impl PatientService {
    pub fn new(store: Arc<dyn VitalStore>) -> Self {
        Self { store }
    }

    pub async fn list_all(&self) -> Result<Vec<Patient>, CoreError> {
        Ok(self.store.list_patients().await?)
    }

    pub async fn get(&self, patient_id: &str) -> Result<Patient, CoreError> {
        validate_patient_id(patient_id)?;
        Ok(self.store.get_patient(patient_id).await?)
    }

    /// Most recent reading for a patient; never cached.
    pub async fn latest_vitals(&self, patient_id: &str) -> Result<VitalReading, CoreError> {
        validate_patient_id(patient_id)?;
        Ok(self.store.fetch_latest_reading(patient_id).await?)
    }
}
