//! Per-connection live feed sessions.
//!
//! A [`LiveSession`] owns one client's outbound half and walks the
//! lifecycle `Connecting -> Active -> Closing -> Closed`:
//!
//! - On start it sends the current snapshot (all alerts, or the patient's
//!   latest reading). A failed fetch is logged and the session still
//!   becomes active.
//! - While active it waits on whichever comes first: the next update
//!   (shared broadcast timer or its own private timer), external
//!   cancellation, or the disconnect signal raised by [`watch_liveness`].
//! - A failed fetch skips that tick. A failed write closes the session;
//!   nothing else is affected.

use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::Message;
use futures::{Sink, SinkExt, Stream, StreamExt};
use serde::Serialize;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use vitalwatch_core::store::{StoreError, VitalStore};
use vitalwatch_core::types::PatientId;

use crate::services::AlertService;
use crate::ws::registry::ConnectionRegistry;

/// What a session streams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feed {
    /// Every current alert, shared by all subscribers.
    Alerts,
    /// One patient's latest reading, private to the connection.
    Vitals(PatientId),
}

/// Collaborators shared by every live session.
#[derive(Clone)]
pub struct LiveContext {
    pub alerts: Arc<AlertService>,
    pub store: Arc<dyn VitalStore>,
    pub registry: Arc<ConnectionRegistry>,
    /// Period of the scoped-feed timer (and of the broadcast timer it mirrors).
    pub interval: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    Active,
    Closing,
    Closed,
}

impl SessionState {
    /// Legal lifecycle edges. `Closed` is terminal.
    pub fn can_transition_to(self, next: SessionState) -> bool {
        matches!(
            (self, next),
            (SessionState::Connecting, SessionState::Active)
                | (SessionState::Active, SessionState::Closing)
                | (SessionState::Closing, SessionState::Closed)
        )
    }
}

/// Why a session left the active state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// Writing a snapshot to the client failed.
    WriteFailed,
    /// The client closed the connection or its read side errored.
    ClientDisconnected,
    /// Server shutdown or request cancellation.
    Cancelled,
    /// The registry dropped or closed this subscriber's slot.
    Deregistered,
}

/// Diagnostics returned when a session ends.
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub conn_id: String,
    pub feed: Feed,
    pub final_state: SessionState,
    /// Number of snapshots successfully written.
    pub sent: u64,
    /// The last snapshot successfully written, if any.
    pub last_payload: Option<String>,
    pub close_reason: CloseReason,
}

pub struct LiveSession<S> {
    conn_id: String,
    feed: Feed,
    state: SessionState,
    sink: S,
    cancel: CancellationToken,
    disconnected: CancellationToken,
    sent: u64,
    last_payload: Option<String>,
}

impl<S> LiveSession<S>
where
    S: Sink<Message> + Unpin + Send,
    S::Error: Display,
{
    /// Create a session in the `Connecting` state.
    ///
    /// `cancel` is normally a child of the server shutdown token;
    /// `disconnected` is fired by the connection's liveness watcher.
    pub fn new(
        conn_id: String,
        feed: Feed,
        sink: S,
        cancel: CancellationToken,
        disconnected: CancellationToken,
    ) -> Self {
        Self {
            conn_id,
            feed,
            state: SessionState::Connecting,
            sink,
            cancel,
            disconnected,
            sent: 0,
            last_payload: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Drive the session until it closes.
    pub async fn run(mut self, ctx: &LiveContext) -> SessionSummary {
        let reason = match self.feed.clone() {
            Feed::Alerts => self.run_alerts(ctx).await,
            Feed::Vitals(patient_id) => self.run_vitals(ctx, &patient_id).await,
        };
        self.close(ctx, reason).await
    }

    async fn run_alerts(&mut self, ctx: &LiveContext) -> CloseReason {
        // Register before the initial fetch so no broadcast tick is missed;
        // a pending tick is only written after the initial snapshot.
        let mut updates = ctx.registry.register(self.conn_id.clone()).await;

        let initial = alert_snapshot(&ctx.alerts, &self.conn_id).await;
        self.transition(SessionState::Active);
        if let Some(message) = initial {
            if let Err(reason) = self.send(message).await {
                return reason;
            }
        }

        let cancel = self.cancel.clone();
        let disconnected = self.disconnected.clone();
        loop {
            tokio::select! {
                _ = cancel.cancelled() => return CloseReason::Cancelled,
                _ = disconnected.cancelled() => return CloseReason::ClientDisconnected,
                changed = updates.changed() => {
                    if changed.is_err() {
                        return CloseReason::Deregistered;
                    }
                    let update = updates.borrow_and_update().clone();
                    match update {
                        Some(Message::Close(_)) => return CloseReason::Deregistered,
                        Some(message) => {
                            if let Err(reason) = self.send(message).await {
                                return reason;
                            }
                        }
                        None => {}
                    }
                }
            }
        }
    }

    async fn run_vitals(&mut self, ctx: &LiveContext, patient_id: &str) -> CloseReason {
        let initial = vitals_snapshot(ctx, &self.conn_id, patient_id, false).await;
        self.transition(SessionState::Active);
        if let Some(message) = initial {
            if let Err(reason) = self.send(message).await {
                return reason;
            }
        }

        // First tick one full period after the initial send.
        let mut ticker = interval_at(Instant::now() + ctx.interval, ctx.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let cancel = self.cancel.clone();
        let disconnected = self.disconnected.clone();
        loop {
            tokio::select! {
                _ = cancel.cancelled() => return CloseReason::Cancelled,
                _ = disconnected.cancelled() => return CloseReason::ClientDisconnected,
                scheduled = ticker.tick() => {
                    if is_stale(scheduled, ctx.interval) {
                        tracing::debug!(conn_id = %self.conn_id, "Dropping tick overrun by a slow update");
                        continue;
                    }
                    let snapshot = vitals_snapshot(ctx, &self.conn_id, patient_id, true).await;
                    if let Some(message) = snapshot {
                        if let Err(reason) = self.send(message).await {
                            return reason;
                        }
                    }
                }
            }
        }
    }

    async fn send(&mut self, message: Message) -> Result<(), CloseReason> {
        let payload = match &message {
            Message::Text(text) => Some(text.as_str().to_owned()),
            _ => None,
        };
        match self.sink.send(message).await {
            Ok(()) => {
                self.sent += 1;
                if payload.is_some() {
                    self.last_payload = payload;
                }
                Ok(())
            }
            Err(e) => {
                tracing::warn!(conn_id = %self.conn_id, error = %e, "Live feed write failed");
                Err(CloseReason::WriteFailed)
            }
        }
    }

    fn transition(&mut self, next: SessionState) {
        if !self.state.can_transition_to(next) {
            tracing::warn!(
                conn_id = %self.conn_id,
                from = ?self.state,
                to = ?next,
                "Ignoring illegal session transition"
            );
            return;
        }
        tracing::debug!(conn_id = %self.conn_id, from = ?self.state, to = ?next, "Session transition");
        self.state = next;
    }

    async fn close(mut self, ctx: &LiveContext, reason: CloseReason) -> SessionSummary {
        self.transition(SessionState::Closing);

        if self.feed == Feed::Alerts {
            ctx.registry.deregister(&self.conn_id).await;
        }
        if reason != CloseReason::WriteFailed {
            // Best effort; the peer may already be gone.
            let _ = self.sink.close().await;
        }

        self.transition(SessionState::Closed);
        tracing::info!(
            conn_id = %self.conn_id,
            feed = ?self.feed,
            reason = ?reason,
            sent = self.sent,
            "Live session closed"
        );

        SessionSummary {
            conn_id: self.conn_id,
            feed: self.feed,
            final_state: self.state,
            sent: self.sent,
            last_payload: self.last_payload,
            close_reason: reason,
        }
    }
}

/// Read the inbound half of a connection until it closes or errors, then
/// fire `disconnected`. Inbound content is otherwise ignored.
pub async fn watch_liveness<St, E>(conn_id: String, mut stream: St, disconnected: CancellationToken)
where
    St: Stream<Item = Result<Message, E>> + Unpin,
    E: Display,
{
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(_) => {
                tracing::trace!(conn_id = %conn_id, "Ignoring inbound message");
            }
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "Live feed receive error");
                break;
            }
        }
    }
    tracing::debug!(conn_id = %conn_id, "Client disconnected");
    disconnected.cancel();
}

/// Whether a tick scheduled at `scheduled` is already a full period late,
/// meaning a slow update overran it. Stale ticks are dropped so the feed
/// keeps its cadence instead of catching up in a burst.
pub(crate) fn is_stale(scheduled: Instant, period: Duration) -> bool {
    Instant::now() >= scheduled + period
}

/// Serialize a snapshot into a text frame.
pub(crate) fn encode_snapshot<T: Serialize + ?Sized>(value: &T) -> Option<Message> {
    match serde_json::to_string(value) {
        Ok(json) => Some(Message::Text(json.into())),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode live feed snapshot");
            None
        }
    }
}

/// Fetch and encode the full alert list. `None` when the fetch fails.
pub(crate) async fn alert_snapshot(alerts: &AlertService, conn_id: &str) -> Option<Message> {
    match alerts.list_all().await {
        Ok(list) => encode_snapshot(&list),
        Err(e) => {
            tracing::warn!(conn_id, error = %e, "Failed to fetch alerts for live feed");
            None
        }
    }
}

/// Fetch and encode a patient's latest reading. `None` when the fetch fails.
///
/// With `process` set the reading is also run through the alert pipeline.
async fn vitals_snapshot(
    ctx: &LiveContext,
    conn_id: &str,
    patient_id: &str,
    process: bool,
) -> Option<Message> {
    let reading = match ctx.store.fetch_latest_reading(patient_id).await {
        Ok(reading) => reading,
        Err(StoreError::NotFound { .. }) => {
            tracing::debug!(conn_id, patient_id, "No reading yet for patient");
            return None;
        }
        Err(e) => {
            tracing::warn!(conn_id, patient_id, error = %e, "Failed to fetch latest reading");
            return None;
        }
    };

    if process {
        if let Err(e) = ctx.alerts.process_reading(&reading).await {
            tracing::warn!(conn_id, patient_id, error = %e, "Failed to process reading");
        }
    }

    encode_snapshot(&reading)
}
