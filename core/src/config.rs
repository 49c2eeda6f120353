//! Widget configuration.
//!
//! The embedding host owns where configuration comes from (there is no config
//! file here); this struct is the contract. Durations deserialize from
//! humantime strings ("30m", "10s") so host-side config stays readable.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tuning knobs for the fetch/refresh pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Base URL of the todo service; `/api/todos` is appended.
    pub base_url: String,
    /// Period of the background refresh.
    #[serde(with = "humantime_serde")]
    pub refresh_interval: Duration,
    /// Window after a period elapses during which a firing may be deferred
    /// while preconditions are unmet.
    #[serde(with = "humantime_serde")]
    pub refresh_tolerance: Duration,
    /// Connect and total-request bound for one fetch.
    #[serde(with = "humantime_serde")]
    pub fetch_timeout: Duration,
    /// Maximum display rows per widget instance.
    pub max_rows: usize,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            refresh_interval: Duration::from_secs(30 * 60),
            refresh_tolerance: Duration::from_secs(15 * 60),
            fetch_timeout: Duration::from_secs(10),
            max_rows: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_contract() {
        let config = WidgetConfig::default();
        assert_eq!(config.refresh_interval, Duration::from_secs(1800));
        assert_eq!(config.refresh_tolerance, Duration::from_secs(900));
        assert_eq!(config.fetch_timeout, Duration::from_secs(10));
        assert_eq!(config.max_rows, 10);
    }

    #[test]
    fn deserializes_humantime_durations() {
        let config: WidgetConfig = serde_json::from_str(
            r#"{"base_url":"http://todo.local:8081","refresh_interval":"45m","fetch_timeout":"5s"}"#,
        )
        .unwrap();
        assert_eq!(config.base_url, "http://todo.local:8081");
        assert_eq!(config.refresh_interval, Duration::from_secs(45 * 60));
        assert_eq!(config.fetch_timeout, Duration::from_secs(5));
        // Unspecified fields keep their defaults.
        assert_eq!(config.max_rows, 10);
    }
}
