//! Shared response envelope types for API handlers.
//!
//! All REST responses use a `{ "data": ... }` envelope. Live feed
//! snapshots are sent bare.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
