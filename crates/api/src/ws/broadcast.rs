use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::services::AlertService;
use crate::ws::registry::ConnectionRegistry;
use crate::ws::session::{alert_snapshot, is_stale};

/// Spawn the shared alert-feed timer.
///
/// Every `period` the full alert list is fetched once and fanned out to
/// all registered subscribers. Ticks with no subscribers skip the fetch;
/// a failed fetch skips the tick. Ticks missed while a slow tick was running
/// are dropped, not replayed. The task ends when `cancel` fires.
pub fn start_alert_broadcast(
    alerts: Arc<AlertService>,
    registry: Arc<ConnectionRegistry>,
    period: Duration,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            let scheduled = tokio::select! {
                _ = cancel.cancelled() => break,
                scheduled = ticker.tick() => scheduled,
            };
            if is_stale(scheduled, period) {
                tracing::debug!("Dropping broadcast tick overrun by a slow fetch");
                continue;
            }

            let count = registry.subscriber_count().await;
            if count == 0 {
                continue;
            }

            let Some(message) = alert_snapshot(&alerts, "broadcast").await else {
                continue;
            };
            let delivered = registry.broadcast(message).await;
            tracing::debug!(subscribers = count, delivered, "Alert snapshot broadcast");
        }

        tracing::info!("Alert broadcast stopped");
    })
}
