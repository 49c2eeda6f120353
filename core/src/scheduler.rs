//! Refresh scheduler: periodic and one-shot triggers.
//!
//! # Design
//! A single drain task consumes triggers one at a time, which serializes
//! refreshes without any extra locking here. The periodic tick task and the
//! retry tasks only ever enqueue. Cancellation tears down every task through
//! one shared token; in-flight work is abandoned, not awaited.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::WidgetConfig;
use crate::error::ScheduleError;
use crate::host::RefreshGate;
use crate::update::Updater;

/// First retry delay after a failed refresh; doubles per consecutive
/// failure, capped at the periodic interval.
const RETRY_BACKOFF_INITIAL: Duration = Duration::from_secs(30);
/// How often an unmet precondition gate is re-checked.
const GATE_POLL_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trigger {
    Periodic,
    Immediate,
}

/// Owns the recurring background trigger and the on-demand one-shot queue.
pub struct RefreshScheduler {
    tx: mpsc::UnboundedSender<Trigger>,
    cancel: CancellationToken,
    periodic: Mutex<Option<JoinHandle<()>>>,
    interval: Duration,
    tolerance: Duration,
    gate: Arc<dyn RefreshGate>,
}

impl RefreshScheduler {
    /// Spawns the drain loop. Must be called within a tokio runtime.
    pub fn new(config: &WidgetConfig, gate: Arc<dyn RefreshGate>, updater: Arc<Updater>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<Trigger>();
        let cancel = CancellationToken::new();
        let drain_cancel = cancel.clone();
        let retry_tx = tx.clone();
        let retry_cap = config.refresh_interval;

        tokio::spawn(async move {
            let mut consecutive_failures: u32 = 0;
            loop {
                let trigger = tokio::select! {
                    _ = drain_cancel.cancelled() => break,
                    received = rx.recv() => match received {
                        Some(trigger) => trigger,
                        None => break,
                    },
                };
                debug!(?trigger, "processing refresh trigger");
                match updater.run().await {
                    Ok(()) => consecutive_failures = 0,
                    Err(err) => {
                        consecutive_failures = consecutive_failures.saturating_add(1);
                        let delay = retry_backoff(consecutive_failures, retry_cap);
                        warn!(error = %err, retry_in = ?delay, "refresh failed, scheduling one retry");
                        let tx = retry_tx.clone();
                        let cancelled = drain_cancel.clone();
                        tokio::spawn(async move {
                            tokio::select! {
                                _ = cancelled.cancelled() => {}
                                _ = tokio::time::sleep(delay) => {
                                    let _ = tx.send(Trigger::Immediate);
                                }
                            }
                        });
                    }
                }
            }
            debug!("refresh drain loop stopped");
        });

        Self {
            tx,
            cancel,
            periodic: Mutex::new(None),
            interval: config.refresh_interval,
            tolerance: config.refresh_tolerance,
            gate,
        }
    }

    /// Register the recurring trigger. Idempotent: a pending schedule is
    /// replaced, never duplicated. Each firing waits for the precondition
    /// gate; an unmet gate defers the firing (re-polled within and beyond
    /// the tolerance window), it never drops it.
    pub fn schedule_periodic(&self) -> Result<(), ScheduleError> {
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|err| ScheduleError(err.to_string()))?;
        let mut slot = self.periodic.lock();
        if let Some(previous) = slot.take() {
            debug!("replacing pending periodic schedule");
            previous.abort();
        }

        let tx = self.tx.clone();
        let cancel = self.cancel.clone();
        let gate = Arc::clone(&self.gate);
        let interval = self.interval;
        let poll = GATE_POLL_INTERVAL.min(self.tolerance);
        *slot = Some(runtime.spawn(async move {
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep(interval) => {}
                }
                while !gate.is_ready().await {
                    debug!("preconditions unmet, deferring periodic refresh");
                    tokio::select! {
                        _ = cancel.cancelled() => return,
                        _ = tokio::time::sleep(poll) => {}
                    }
                }
                if tx.send(Trigger::Periodic).is_err() {
                    break;
                }
            }
        }));
        info!(interval = ?self.interval, tolerance = ?self.tolerance, "registered periodic refresh");
        Ok(())
    }

    /// Enqueue a one-shot trigger. Bypasses the precondition gate and fires
    /// as soon as the drain loop is free.
    pub fn enqueue_immediate(&self) {
        if self.tx.send(Trigger::Immediate).is_err() {
            debug!("scheduler cancelled, dropping immediate trigger");
        }
    }

    /// Remove all pending periodic and one-shot triggers. Called when the
    /// last widget instance is removed.
    pub fn cancel_all(&self) {
        info!("cancelling all pending refresh triggers");
        self.cancel.cancel();
        if let Some(handle) = self.periodic.lock().take() {
            handle.abort();
        }
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.periodic.lock().take() {
            handle.abort();
        }
    }
}

fn retry_backoff(consecutive_failures: u32, cap: Duration) -> Duration {
    let doublings = consecutive_failures.saturating_sub(1).min(16);
    RETRY_BACKOFF_INITIAL
        .saturating_mul(1u32 << doublings)
        .min(cap)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_per_consecutive_failure() {
        let cap = Duration::from_secs(1800);
        assert_eq!(retry_backoff(1, cap), Duration::from_secs(30));
        assert_eq!(retry_backoff(2, cap), Duration::from_secs(60));
        assert_eq!(retry_backoff(3, cap), Duration::from_secs(120));
    }

    #[test]
    fn backoff_is_capped_at_the_periodic_interval() {
        let cap = Duration::from_secs(1800);
        assert_eq!(retry_backoff(7, cap), cap);
        assert_eq!(retry_backoff(u32::MAX, cap), cap);
    }
}
