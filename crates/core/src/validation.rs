//! Input checks run before any store call.
//!
//! Failures are reported as [`CoreError::Validation`] so nothing is
//! partially mutated.

use uuid::Uuid;

use crate::error::CoreError;
use crate::vitals::VitalReading;

/// Maximum accepted length for a patient id.
pub const MAX_PATIENT_ID_LEN: usize = 64;

/// Validate a patient id: non-empty, bounded, ASCII alphanumerics plus `-` and `_`.
pub fn validate_patient_id(patient_id: &str) -> Result<(), CoreError> {
    if patient_id.is_empty() {
        return Err(CoreError::Validation("patient_id is required".to_string()));
    }
    if patient_id.len() > MAX_PATIENT_ID_LEN {
        return Err(CoreError::Validation(format!(
            "patient_id must be at most {MAX_PATIENT_ID_LEN} characters"
        )));
    }
    if !patient_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(CoreError::Validation(format!(
            "patient_id contains invalid characters: '{patient_id}'"
        )));
    }
    Ok(())
}

/// Parse an alert id from its textual form.
pub fn parse_alert_id(raw: &str) -> Result<Uuid, CoreError> {
    Uuid::parse_str(raw)
        .map_err(|_| CoreError::Validation(format!("alert_id is not a valid UUID: '{raw}'")))
}

/// Validate that a reading is well-formed enough to evaluate.
pub fn validate_reading(reading: &VitalReading) -> Result<(), CoreError> {
    validate_patient_id(&reading.patient_id)?;

    let signs = &reading.vital_signs;
    if !(0..=100).contains(&signs.oxygen_saturation) {
        return Err(CoreError::Validation(format!(
            "oxygen_saturation must be between 0 and 100, got {}",
            signs.oxygen_saturation
        )));
    }

    let non_negative = [
        ("blood_pressure_systolic", signs.blood_pressure_systolic),
        ("blood_pressure_diastolic", signs.blood_pressure_diastolic),
        ("heartbeat", signs.heartbeat),
        ("blood_glucose", signs.blood_glucose),
        ("respiration_rate", signs.respiration_rate),
    ];
    for (name, value) in non_negative {
        if value < 0 {
            return Err(CoreError::Validation(format!(
                "{name} must be non-negative, got {value}"
            )));
        }
    }

    if !signs.temperature.is_finite() {
        return Err(CoreError::Validation(
            "temperature must be a finite number".to_string(),
        ));
    }
    Ok(())
}
