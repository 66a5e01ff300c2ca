use axum::routing::get;
use axum::Router;

use crate::handlers::alerts;
use crate::state::AppState;

/// Alert routes.
///
/// The single path parameter is a patient id on GET and an alert id on PUT.
///
/// ```text
/// GET  /alerts            -> list_alerts
/// GET  /alerts/{id}       -> list_patient_alerts
/// PUT  /alerts/{id}       -> update_alert_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/alerts", get(alerts::list_alerts))
        .route(
            "/alerts/{id}",
            get(alerts::list_patient_alerts).put(alerts::update_alert_status),
        )
}
