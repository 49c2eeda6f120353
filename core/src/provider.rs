//! Todo provider: fetch coordination and the current snapshot.
//!
//! # Design
//! One provider per process root, constructed once and passed around as a
//! plain value. Refreshes are serialized by an async mutex; an overlapping
//! trigger waits its turn and simply becomes the next snapshot write, so the
//! cached value is always the result of a whole refresh, last writer wins.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Local;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error};

use crate::fetcher::Fetch;
use crate::policy::{select_for_week, sort_for_display};
use crate::types::FetchResult;

/// Coordinates fetches and holds the single current fetch result.
pub struct TodoProvider {
    fetcher: Arc<dyn Fetch>,
    refresh_lock: Mutex<()>,
    current: RwLock<Option<FetchResult>>,
    stale: AtomicBool,
}

impl TodoProvider {
    pub fn new(fetcher: Arc<dyn Fetch>) -> Self {
        Self {
            fetcher,
            refresh_lock: Mutex::new(()),
            current: RwLock::new(None),
            stale: AtomicBool::new(false),
        }
    }

    /// Fetch, select, and sort, then store the outcome as the new snapshot.
    /// Fetch failures come back as `Err` inside the result; they never
    /// propagate as panics or early returns past this boundary.
    pub async fn refresh(&self) -> FetchResult {
        let _serialized = self.refresh_lock.lock().await;
        if self.stale.swap(false, Ordering::SeqCst) {
            debug!("cache invalidated, refresh goes to the network");
        }
        let result = match self.fetcher.fetch_all().await {
            Ok(todos) => {
                let now = Local::now();
                let mut kept = select_for_week(todos, &now);
                sort_for_display(&mut kept);
                Ok(kept)
            }
            Err(err) => {
                error!(error = %err, "refresh failed");
                Err(err)
            }
        };
        *self.current.write().await = Some(result.clone());
        result
    }

    /// The current snapshot, `None` until the first refresh completes.
    pub async fn current(&self) -> Option<FetchResult> {
        self.current.read().await.clone()
    }

    /// Mark the snapshot stale so the next `refresh` is guaranteed to hit
    /// the network. There is no short-lived cache today, so this only flips
    /// a flag, but it is the contract point a cache layer would hook into.
    pub fn invalidate_cache(&self) {
        self.stale.store(true, Ordering::SeqCst);
    }
}
