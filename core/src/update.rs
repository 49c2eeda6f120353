//! Update pipeline: one trigger firing, end to end.
//!
//! Chains refresh, render, and host dispatch for every active widget
//! instance, and reports the outcome so the scheduler can apply its retry
//! policy. Rendering and retry stay decoupled: this module never talks to
//! the scheduler.

use std::sync::Arc;

use chrono::Local;
use tracing::{debug, warn};

use crate::error::FetchError;
use crate::host::WidgetHost;
use crate::provider::TodoProvider;
use crate::render::{fallback_text, render, RenderState};
use crate::types::WidgetInstanceId;

/// Transient status line shown while a refresh is in flight.
pub const LOADING_STATUS: &str = "Loading...";

/// Runs the refresh-to-display chain for all active instances.
pub struct Updater {
    provider: Arc<TodoProvider>,
    host: Arc<dyn WidgetHost>,
    max_rows: usize,
}

impl Updater {
    pub fn new(provider: Arc<TodoProvider>, host: Arc<dyn WidgetHost>, max_rows: usize) -> Self {
        Self {
            provider,
            host,
            max_rows,
        }
    }

    /// One full update cycle. Zero active instances is a successful no-op;
    /// a fetch failure still renders the error state everywhere before the
    /// `Err` comes back.
    pub async fn run(&self) -> Result<(), FetchError> {
        let instances = self.host.instance_ids().await;
        if instances.is_empty() {
            debug!("no widget instances to update");
            return Ok(());
        }
        debug!(count = instances.len(), "updating widget instances");
        for &instance in &instances {
            self.host.update_status(instance, LOADING_STATUS).await;
        }

        let result = self.provider.refresh().await;
        let now = Local::now();
        for &instance in &instances {
            let state = render(instance, Some(&result), &now, self.max_rows);
            self.push(instance, state).await;
        }
        self.host.notify_data_changed(&instances).await;

        let status = match &result {
            Ok(_) => format!("Last updated {}", now.format("%-I:%M %p")),
            Err(_) => "Last updated Error".to_string(),
        };
        for &instance in &instances {
            self.host.update_status(instance, &status).await;
        }
        result.map(|_| ())
    }

    async fn push(&self, instance: WidgetInstanceId, state: RenderState) {
        match state {
            RenderState::Loading => self.host.update_status(instance, LOADING_STATUS).await,
            RenderState::Populated(rows) => {
                if let Err(err) = self.host.set_list_rows(instance, &rows).await {
                    warn!(instance, error = %err, "list surface rejected rows, using text fallback");
                    self.host.show_text(instance, &fallback_text(&rows)).await;
                }
            }
            RenderState::Empty(message) | RenderState::Error(message) => {
                self.host.show_text(instance, &message).await;
            }
        }
    }
}
