//! In-process notification poller.
//!
//! Drives the dispatcher on a fixed interval for deployments where no
//! browser client is polling `/notifications/check`. First tick fires
//! immediately; each cycle runs under a bounded timeout and a failed or
//! timed-out cycle is skipped (the next tick retries). Cancellable via
//! shutdown signal.

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use tokio::sync::oneshot;

use crate::core_state::CoreState;
use crate::notify::dispatcher::{dispatch, NotificationBatch};

/// Upper bound for one dispatch cycle.
const CYCLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Consumer of dispatched batches (the presentation layer seam).
pub trait NotificationSink: Send + Sync + 'static {
    fn deliver(&self, batch: &NotificationBatch);
}

/// Sink that logs due doses; the default for headless runs.
pub struct LogSink;

impl NotificationSink for LogSink {
    fn deliver(&self, batch: &NotificationBatch) {
        if !batch.should_play_sound {
            return;
        }
        for item in &batch.items {
            tracing::info!(
                medicine = %item.medicine.name,
                dosage = %item.medicine.dosage,
                take_time = %item.take_time.format("%H:%M"),
                "dose due"
            );
        }
    }
}

/// Handle to a running poller. Dropping the handle closes the shutdown
/// channel, which also stops the loop.
pub struct PollerHandle {
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl PollerHandle {
    /// Stop the poller. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("Notification poller shutdown signal sent");
        }
    }
}

/// Spawn the polling loop on the current tokio runtime.
pub fn start_poller(
    state: Arc<CoreState>,
    sink: Arc<dyn NotificationSink>,
    period: Duration,
) -> PollerHandle {
    let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        tracing::info!(period_secs = period.as_secs(), "Notification poller started");

        loop {
            tokio::select! {
                _ = &mut shutdown_rx => {
                    tracing::info!("Notification poller stopped");
                    break;
                }
                _ = ticker.tick() => {
                    run_cycle(&state, sink.as_ref()).await;
                }
            }
        }
    });

    PollerHandle {
        shutdown_tx: Some(shutdown_tx),
    }
}

async fn run_cycle(state: &Arc<CoreState>, sink: &dyn NotificationSink) {
    let state = state.clone();
    let work = tokio::task::spawn_blocking(move || dispatch(&state, Local::now().naive_local()));

    match tokio::time::timeout(CYCLE_TIMEOUT, work).await {
        Ok(Ok(Ok(batch))) => sink.deliver(&batch),
        Ok(Ok(Err(e))) => tracing::warn!(error = %e, "Notification cycle failed, skipping"),
        Ok(Err(e)) => tracing::warn!(error = %e, "Notification cycle task aborted"),
        Err(_) => tracing::warn!("Notification cycle timed out, skipping"),
    }
}
