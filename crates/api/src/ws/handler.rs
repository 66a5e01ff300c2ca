use axum::extract::ws::{WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use futures::StreamExt;
use tokio_util::sync::CancellationToken;
use vitalwatch_core::validation::validate_patient_id;

use crate::error::AppResult;
use crate::state::AppState;
use crate::ws::session::{watch_liveness, Feed, LiveSession};

/// GET /ws/alerts
///
/// Upgrades to the shared alert feed.
pub async fn alerts_ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state, Feed::Alerts))
}

/// GET /ws/vitals/{patient_id}
///
/// Upgrades to one patient's vitals feed. The id is validated before the
/// upgrade so a bad id gets a plain 400.
pub async fn vitals_ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    validate_patient_id(&patient_id)?;
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, Feed::Vitals(patient_id))))
}

/// Run one live session over an upgraded socket.
///
/// The inbound half is watched on a separate task purely to detect
/// disconnects; the outbound half is owned by the session.
async fn handle_socket(socket: WebSocket, state: AppState, feed: Feed) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, feed = ?feed, "WebSocket connected");

    let (sink, stream) = socket.split();

    let disconnected = CancellationToken::new();
    let reader = tokio::spawn(watch_liveness(
        conn_id.clone(),
        stream,
        disconnected.clone(),
    ));

    let session = LiveSession::new(
        conn_id.clone(),
        feed,
        sink,
        state.shutdown.child_token(),
        disconnected,
    );
    let summary = session.run(&state.live).await;

    reader.abort();
    tracing::info!(
        conn_id = %conn_id,
        reason = ?summary.close_reason,
        sent = summary.sent,
        "WebSocket disconnected"
    );
}
