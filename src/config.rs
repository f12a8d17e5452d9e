//! # Configuration
//!
//! Lifecycle settings loaded from environment variables, and the endpoint
//! description handed to client construction.

use std::time::Duration;

use crate::constants::{
    DEFAULT_CREATE_POLL_INTERVAL_SECS, DEFAULT_CREATE_TIMEOUT_SECS,
    DEFAULT_PURGE_POLL_INTERVAL_SECS, DEFAULT_PURGE_QUEUE_TIMEOUT_SECS, SERVICE_DOMAIN,
};
use crate::types::SecretResourceId;

/// Lifecycle configuration
///
/// All settings have sensible defaults and can be overridden via environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleConfig {
    /// Wall-clock budget for a new secret to become `active` (seconds)
    pub create_timeout_secs: u64,
    /// Minimum delay between `GetSecret` polls (seconds)
    pub create_poll_interval_secs: u64,
    /// Budget for one purge task to leave the `queued` phase (seconds)
    pub purge_queue_timeout_secs: u64,
    /// Delay between task-list polls (seconds)
    pub purge_poll_interval_secs: u64,
    /// Default log level when `RUST_LOG` is unset (ERROR, WARN, INFO, DEBUG, TRACE)
    pub log_level: String,
    /// Log format (json, text)
    pub log_format: String,
    /// Record Prometheus metrics for lifecycle operations
    pub enable_metrics: bool,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            create_timeout_secs: DEFAULT_CREATE_TIMEOUT_SECS,
            create_poll_interval_secs: DEFAULT_CREATE_POLL_INTERVAL_SECS,
            purge_queue_timeout_secs: DEFAULT_PURGE_QUEUE_TIMEOUT_SECS,
            purge_poll_interval_secs: DEFAULT_PURGE_POLL_INTERVAL_SECS,
            log_level: "INFO".to_string(),
            log_format: "text".to_string(),
            enable_metrics: true,
        }
    }
}

impl LifecycleConfig {
    /// Load configuration from environment variables with defaults
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            create_timeout_secs: env_var_or_default(
                "SM_CREATE_TIMEOUT_SECS",
                DEFAULT_CREATE_TIMEOUT_SECS,
            ),
            create_poll_interval_secs: env_var_or_default(
                "SM_CREATE_POLL_INTERVAL_SECS",
                DEFAULT_CREATE_POLL_INTERVAL_SECS,
            ),
            purge_queue_timeout_secs: env_var_or_default(
                "SM_PURGE_QUEUE_TIMEOUT_SECS",
                DEFAULT_PURGE_QUEUE_TIMEOUT_SECS,
            ),
            purge_poll_interval_secs: env_var_or_default(
                "SM_PURGE_POLL_INTERVAL_SECS",
                DEFAULT_PURGE_POLL_INTERVAL_SECS,
            ),
            log_level: env_var_or_default_str("LOG_LEVEL", "INFO"),
            log_format: env_var_or_default_str("LOG_FORMAT", "text"),
            enable_metrics: env_var_or_default_bool("ENABLE_METRICS", true),
        }
    }

    /// Get activation wait budget
    #[must_use]
    pub fn create_timeout(&self) -> Duration {
        Duration::from_secs(self.create_timeout_secs)
    }

    /// Get activation poll interval
    #[must_use]
    pub fn create_poll_interval(&self) -> Duration {
        Duration::from_secs(self.create_poll_interval_secs)
    }

    /// Get purge queue wait budget
    #[must_use]
    pub fn purge_queue_timeout(&self) -> Duration {
        Duration::from_secs(self.purge_queue_timeout_secs)
    }

    /// Get purge poll interval
    #[must_use]
    pub fn purge_poll_interval(&self) -> Duration {
        Duration::from_secs(self.purge_poll_interval_secs)
    }
}

/// Where a Secrets Manager instance is reached
///
/// Built once and passed into client construction. Never rewritten afterwards;
/// a different instance or region means a different `EndpointConfig`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    pub instance_id: String,
    pub region: String,
    /// Use the private (service network) endpoint
    pub private: bool,
}

impl EndpointConfig {
    pub fn new(instance_id: impl Into<String>, region: impl Into<String>, private: bool) -> Self {
        Self {
            instance_id: instance_id.into(),
            region: region.into(),
            private,
        }
    }

    /// Endpoint of the instance that owns the given secret
    #[must_use]
    pub fn for_resource(id: &SecretResourceId, private: bool) -> Self {
        Self::new(id.instance_id.clone(), id.region.clone(), private)
    }

    /// Base URL of the instance API
    #[must_use]
    pub fn service_url(&self) -> String {
        if self.private {
            format!(
                "https://{}.private.{}.{}",
                self.instance_id, self.region, SERVICE_DOMAIN
            )
        } else {
            format!("https://{}.{}.{}", self.instance_id, self.region, SERVICE_DOMAIN)
        }
    }
}

/// Read environment variable or return default value
fn env_var_or_default<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Read environment variable as boolean or return default
fn env_var_or_default_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|v| {
            let v_lower = v.to_lowercase();
            v_lower == "true" || v_lower == "1" || v_lower == "yes" || v_lower == "on"
        })
        .unwrap_or(default)
}

/// Read environment variable as string or return default
fn env_var_or_default_str(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
