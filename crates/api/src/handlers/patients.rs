use axum::extract::{Path, State};
use axum::Json;
use vitalwatch_core::patient::Patient;
use vitalwatch_core::vitals::VitalReading;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /patients
pub async fn list_patients(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Patient>>>> {
    let patients = state.patients.list_all().await?;
    Ok(Json(DataResponse { data: patients }))
}

/// GET /patients/{id}
pub async fn get_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> AppResult<Json<DataResponse<Patient>>> {
    let patient = state.patients.get(&patient_id).await?;
    Ok(Json(DataResponse { data: patient }))
}

/// GET /vitals/{patient_id}
///
/// Latest reading for the patient; 404 when none has been recorded.
pub async fn get_latest_vitals(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> AppResult<Json<DataResponse<VitalReading>>> {
    let reading = state.patients.latest_vitals(&patient_id).await?;
    Ok(Json(DataResponse { data: reading }))
}
