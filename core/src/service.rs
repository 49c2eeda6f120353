//! Widget service: the process root.
//!
//! # Design
//! Everything the original singleton pattern would hide behind statics is
//! built here once and threaded through explicitly: fetcher into provider,
//! provider and host into updater, updater into scheduler. The embedding
//! shell drives the service through a narrow lifecycle surface and stays
//! otherwise unknown to the core.

use std::sync::Arc;

use chrono::Local;
use tracing::{info, warn};

use crate::config::WidgetConfig;
use crate::fetcher::{Fetch, HttpFetcher};
use crate::host::{RefreshGate, WidgetHost};
use crate::provider::TodoProvider;
use crate::render::{render, RenderState};
use crate::scheduler::RefreshScheduler;
use crate::types::WidgetInstanceId;
use crate::update::Updater;

/// Transient status line for a user-requested refresh.
pub const REFRESHING_STATUS: &str = "Refreshing...";

/// Owns the provider, updater, and scheduler for one widget process.
pub struct WidgetService {
    provider: Arc<TodoProvider>,
    host: Arc<dyn WidgetHost>,
    scheduler: RefreshScheduler,
    max_rows: usize,
}

impl WidgetService {
    /// Build the production wiring. Must be called within a tokio runtime.
    pub fn new(config: WidgetConfig, host: Arc<dyn WidgetHost>, gate: Arc<dyn RefreshGate>) -> Self {
        let fetcher = Arc::new(HttpFetcher::new(&config));
        Self::with_fetcher(config, fetcher, host, gate)
    }

    /// Same wiring with an injected fetcher.
    pub fn with_fetcher(
        config: WidgetConfig,
        fetcher: Arc<dyn Fetch>,
        host: Arc<dyn WidgetHost>,
        gate: Arc<dyn RefreshGate>,
    ) -> Self {
        let provider = Arc::new(TodoProvider::new(fetcher));
        let updater = Arc::new(Updater::new(provider.clone(), host.clone(), config.max_rows));
        let scheduler = RefreshScheduler::new(&config, gate, updater);
        Self {
            provider,
            host,
            scheduler,
            max_rows: config.max_rows,
        }
    }

    /// First widget instance placed: register the periodic schedule and
    /// paint. If registration fails, a one-shot refresh still runs.
    pub fn on_activated(&self) {
        info!("widget activated, scheduling refreshes");
        match self.scheduler.schedule_periodic() {
            Ok(()) => self.scheduler.enqueue_immediate(),
            Err(err) => {
                warn!(error = %err, "periodic registration failed, falling back to one-shot");
                self.scheduler.enqueue_immediate();
            }
        }
    }

    /// Last widget instance removed: drop all pending triggers.
    pub fn on_deactivated(&self) {
        info!("widget deactivated, cancelling refreshes");
        self.scheduler.cancel_all();
    }

    /// Instances were added or removed (but not down to zero): repaint.
    pub fn on_instance_count_changed(&self) {
        self.scheduler.enqueue_immediate();
    }

    /// User tapped refresh: invalidate the cache, flip the status line, and
    /// enqueue a one-shot refresh.
    pub async fn request_refresh(&self) {
        self.provider.invalidate_cache();
        for instance in self.host.instance_ids().await {
            self.host.update_status(instance, REFRESHING_STATUS).await;
        }
        self.scheduler.enqueue_immediate();
    }

    /// The host's re-pull path: render the current snapshot for one
    /// instance. `Loading` until the first refresh completes.
    pub async fn render_for(&self, instance: WidgetInstanceId) -> RenderState {
        let snapshot = self.provider.current().await;
        render(instance, snapshot.as_ref(), &Local::now(), self.max_rows)
    }

    pub fn provider(&self) -> &Arc<TodoProvider> {
        &self.provider
    }
}
