//! Live WebSocket feeds.
//!
//! Two feeds are served: the shared alert feed, driven by one broadcast
//! timer and fanned out through the [`ConnectionRegistry`], and the
//! per-patient vitals feed, where each connection runs its own timer.

mod broadcast;
mod handler;
pub mod registry;
pub mod session;

pub use broadcast::start_alert_broadcast;
pub use handler::{alerts_ws_handler, vitals_ws_handler};
pub use registry::ConnectionRegistry;
pub use session::{CloseReason, Feed, LiveContext, LiveSession, SessionState, SessionSummary};
