//! # Logging
//!
//! Installs a `tracing` subscriber for callers that do not bring their own.
//! The lifecycle waiters only emit events; nothing is printed unless a
//! subscriber is installed.

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::config::LifecycleConfig;

/// Install a global fmt subscriber
///
/// `RUST_LOG` takes precedence; otherwise `config.log_level` applies to this crate.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing(config: &LifecycleConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "secrets_manager_lifecycle={}",
            config.log_level.to_lowercase()
        )
        .into()
    });

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = if config.log_format.eq_ignore_ascii_case("json") {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    result
        .map_err(|e| anyhow::anyhow!(e))
        .context("Failed to install tracing subscriber")
}
