use axum::routing::get;
use axum::Router;

use crate::handlers::patients;
use crate::state::AppState;

/// Patient directory and latest-vitals routes.
///
/// ```text
/// GET /patients                 -> list_patients
/// GET /patients/{id}            -> get_patient
/// GET /vitals/{patient_id}      -> get_latest_vitals
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/patients", get(patients::list_patients))
        .route("/patients/{id}", get(patients::get_patient))
        .route("/vitals/{patient_id}", get(patients::get_latest_vitals))
}
