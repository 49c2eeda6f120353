//! Remote fetcher for the todo endpoint.
//!
//! # Design
//! `Fetch` is the seam the provider depends on; `HttpFetcher` is the
//! production implementation: one GET to `<base-url>/api/todos`, decoded as a
//! JSON array of todos. Retry is the scheduler's responsibility, so a fetch
//! either succeeds once or fails once with a classified `FetchError`.

use async_trait::async_trait;
use tracing::debug;

use crate::config::WidgetConfig;
use crate::error::FetchError;
use crate::types::Todo;

/// A single network call returning the full todo list.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<Todo>, FetchError>;
}

/// Reqwest-backed fetcher with fixed connect/request timeouts.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(config: &WidgetConfig) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(config.fetch_timeout)
            .timeout(config.fetch_timeout)
            .build()
            .unwrap_or_default();
        Self {
            endpoint: format!("{}/api/todos", config.base_url.trim_end_matches('/')),
            client,
        }
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch_all(&self) -> Result<Vec<Todo>, FetchError> {
        debug!(endpoint = %self.endpoint, "fetching todos");
        let response = self.client.get(&self.endpoint).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
            });
        }
        let todos: Vec<Todo> = response.json().await?;
        debug!(count = todos.len(), "fetched todos");
        Ok(todos)
    }
}
