//! Host shell boundary.
//!
//! The embedding shell (launcher, desktop, test harness) implements these
//! traits; the core stays ignorant of its object model. Everything the shell
//! does beyond this surface, such as tap-to-intent bindings and the actual
//! drawing, is out of scope here.

use async_trait::async_trait;

use crate::error::HostError;
use crate::render::DisplayRow;
use crate::types::WidgetInstanceId;

/// Display surface operations, one call per widget instance.
#[async_trait]
pub trait WidgetHost: Send + Sync {
    /// Active widget instances for this provider identity.
    async fn instance_ids(&self) -> Vec<WidgetInstanceId>;

    /// Replace the instance's list content with the given rows. An `Err`
    /// makes the update pipeline fall back to `show_text`.
    async fn set_list_rows(
        &self,
        instance: WidgetInstanceId,
        rows: &[DisplayRow],
    ) -> Result<(), HostError>;

    /// Show a single text block (loading, empty, error, or fallback).
    async fn show_text(&self, instance: WidgetInstanceId, text: &str);

    /// Partially update the instance's status line without touching the list.
    async fn update_status(&self, instance: WidgetInstanceId, status: &str);

    /// Ask the shell to re-pull list content for the given instances.
    async fn notify_data_changed(&self, instances: &[WidgetInstanceId]);
}

/// Preconditions the periodic trigger waits for (network reachable, battery
/// not low). An unmet gate defers a firing; it never drops one.
#[async_trait]
pub trait RefreshGate: Send + Sync {
    async fn is_ready(&self) -> bool;
}

/// Gate that never defers. Used by hosts without precondition reporting and
/// by tests.
pub struct AlwaysReady;

#[async_trait]
impl RefreshGate for AlwaysReady {
    async fn is_ready(&self) -> bool {
        true
    }
}
