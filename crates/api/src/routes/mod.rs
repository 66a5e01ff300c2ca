pub mod alerts;
pub mod health;
pub mod patients;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api` route tree.
///
/// ```text
/// /patients                      list
/// /patients/{id}                 get
/// /vitals/{patient_id}           latest reading
///
/// /alerts                        list
/// /alerts/{id}                   list by patient (GET), update status (PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(patients::router())
        .merge(alerts::router())
}

/// Live WebSocket feeds, mounted at `/ws`.
///
/// ```text
/// /alerts                        shared alert feed
/// /vitals/{patient_id}           one patient's vitals feed
/// ```
pub fn ws_routes() -> Router<AppState> {
    Router::new()
        .route("/alerts", get(ws::alerts_ws_handler))
        .route("/vitals/{patient_id}", get(ws::vitals_ws_handler))
}
