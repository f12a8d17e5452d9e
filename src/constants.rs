//! # Constants
//!
//! Shared constants used by the lifecycle waiters.
//!
//! These values represent reasonable defaults and can be overridden via
//! [`LifecycleConfig`](crate::config::LifecycleConfig) or environment variables.

/// Default wall-clock budget for a secret to reach `active` after creation (seconds)
pub const DEFAULT_CREATE_TIMEOUT_SECS: u64 = 1200;

/// Default delay between `GetSecret` polls while waiting for activation (seconds)
pub const DEFAULT_CREATE_POLL_INTERVAL_SECS: u64 = 5;

/// Default budget for a purge task to leave the `queued` phase (seconds)
pub const DEFAULT_PURGE_QUEUE_TIMEOUT_SECS: u64 = 120;

/// Default delay between task-list polls while a purge task is queued (seconds)
pub const DEFAULT_PURGE_POLL_INTERVAL_SECS: u64 = 5;

/// Task type the remote system uses for version payload purges
pub const DELETE_CREDENTIALS_TASK_TYPE: &str = "delete_credentials";

/// Domain suffix of Secrets Manager instance endpoints
pub const SERVICE_DOMAIN: &str = "secrets-manager.appdomain.cloud";

/// Operation label used for activation waits in logs and metrics
pub const OPERATION_CREATE_WAIT: &str = "create_wait";

/// Operation label used for purge queue waits in logs and metrics
pub const OPERATION_PURGE_WAIT: &str = "purge_wait";
