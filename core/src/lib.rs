//! Core of a home-screen todo widget.
//!
//! # Overview
//! Fetches todos from a remote HTTP endpoint, keeps the ones due this week
//! or overdue, and renders them into per-widget-instance display rows,
//! refreshed by a background scheduler with one-shot retries on failure.
//!
//! # Design
//! - `WidgetService` is the process root: fetcher, provider, updater, and
//!   scheduler are constructed once and threaded through explicitly.
//! - The host shell sits behind the `WidgetHost` and `RefreshGate` traits;
//!   the core never sees its object model.
//! - Selection and rendering are pure over a caller-supplied "now," so the
//!   week-window and urgency-color rules are testable with pinned clocks.
//! - Fetch failures become data (a `Failure` snapshot) at the provider
//!   boundary; the scheduler turns them into exactly one delayed retry each.

pub mod config;
pub mod error;
pub mod fetcher;
pub mod host;
pub mod policy;
pub mod provider;
pub mod render;
pub mod scheduler;
pub mod service;
pub mod types;
pub mod update;

pub use config::WidgetConfig;
pub use error::{FetchError, HostError, ScheduleError};
pub use fetcher::{Fetch, HttpFetcher};
pub use host::{AlwaysReady, RefreshGate, WidgetHost};
pub use provider::TodoProvider;
pub use render::{fallback_text, render, DisplayRow, DueColor, DueLine, RenderState, EMPTY_MESSAGE};
pub use scheduler::RefreshScheduler;
pub use service::WidgetService;
pub use types::{FetchResult, Todo, WidgetInstanceId};
pub use update::Updater;
