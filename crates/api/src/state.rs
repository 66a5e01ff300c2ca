use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use vitalwatch_core::store::VitalStore;

use crate::config::ServerConfig;
use crate::services::{AlertService, PatientService};
use crate::ws::{ConnectionRegistry, LiveContext};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub alerts: Arc<AlertService>,
    pub patients: Arc<PatientService>,
    /// Collaborators handed to every live WebSocket session.
    pub live: LiveContext,
    /// Root shutdown token; each live session runs under a child of it.
    pub shutdown: CancellationToken,
}

impl AppState {
    /// Wire services and the live-feed registry around a store.
    pub fn new(store: Arc<dyn VitalStore>, config: ServerConfig) -> Self {
        let alerts = Arc::new(AlertService::new(Arc::clone(&store)));
        let patients = Arc::new(PatientService::new(Arc::clone(&store)));
        let live = LiveContext {
            alerts: Arc::clone(&alerts),
            store,
            registry: Arc::new(ConnectionRegistry::new()),
            interval: config.live_feed_interval(),
        };

        Self {
            config: Arc::new(config),
            alerts,
            patients,
            live,
            shutdown: CancellationToken::new(),
        }
    }
}
