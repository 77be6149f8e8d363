use std::time::Duration;

use serde::Deserialize;

/// Resolved runtime configuration controlling caching, retries, and telemetry.
///
/// Deserializes from a partial table: absent fields take the defaults below,
/// so caller overrides merge over defaults at construction. Immutable once
/// handed to the runtime.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RuntimeOptions {
    #[serde(default = "default_cache_enabled")]
    pub cache_enabled: bool,
    /// Maximum age of a cached authorization, in seconds.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
    /// Constant delay between authorization attempts, in milliseconds.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    #[serde(default = "default_analytics_enabled")]
    pub analytics_enabled: bool,
    #[serde(default)]
    pub debug_enabled: bool,
}

fn default_cache_enabled() -> bool {
    true
}
fn default_cache_ttl_secs() -> u64 {
    3600
}
fn default_retry_attempts() -> u32 {
    3
}
fn default_retry_delay_ms() -> u64 {
    1000
}
fn default_analytics_enabled() -> bool {
    true
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            cache_enabled: default_cache_enabled(),
            cache_ttl_secs: default_cache_ttl_secs(),
            retry_attempts: default_retry_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
            analytics_enabled: default_analytics_enabled(),
            debug_enabled: false,
        }
    }
}

impl RuntimeOptions {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}
