//! Handlers for alert listing and status updates.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use vitalwatch_core::alert::Alert;
use vitalwatch_core::validation::{parse_alert_id, validate_patient_id};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `PUT /alerts/{alert_id}`.
///
/// Alerts are keyed by (alert id, patient id), so the patient id travels
/// in the body.
#[derive(Debug, Deserialize)]
pub struct UpdateAlertStatusRequest {
    pub status: String,
    pub patient_id: String,
}

/// GET /alerts
pub async fn list_alerts(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Alert>>>> {
    let alerts = state.alerts.list_all().await?;
    Ok(Json(DataResponse { data: alerts }))
}

/// GET /alerts/{patient_id}
///
/// An unknown patient yields an empty list.
pub async fn list_patient_alerts(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> AppResult<Json<DataResponse<Vec<Alert>>>> {
    validate_patient_id(&patient_id)?;
    let alerts = state.alerts.list_by_patient(&patient_id).await?;
    Ok(Json(DataResponse { data: alerts }))
}

/// PUT /alerts/{alert_id}
///
/// Returns the alert with its new status. An undecodable body is a 400
/// in the usual error shape, and the store is not touched.
pub async fn update_alert_status(
    State(state): State<AppState>,
    Path(alert_id): Path<String>,
    payload: Result<Json<UpdateAlertStatusRequest>, JsonRejection>,
) -> AppResult<Json<DataResponse<Alert>>> {
    let Json(input) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let alert_id = parse_alert_id(&alert_id)?;
    let alert = state
        .alerts
        .update_status(alert_id, &input.patient_id, &input.status)
        .await?;
    Ok(Json(DataResponse { data: alert }))
}
