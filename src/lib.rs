//! Secrets Manager Lifecycle Library
//!
//! Reconciles the asynchronous parts of a custom credentials secret's life
//! against a remote secrets-management API:
//!
//! 1. **Activation** - after `CreateSecret`, poll until the secret leaves
//!    `pre_activation` and reports `active`, failing fast if it vanishes or is
//!    `destroyed`.
//! 2. **Deletion** - purge the payloads of the previous and current versions,
//!    wait for each purge task to leave the remote queue, then force-delete
//!    the secret.
//!
//! The remote API is consumed through [`client::RemoteSecretClient`]; this
//! crate ships no HTTP implementation of it.

pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod lifecycle;
pub mod observability;
pub mod types;

pub use client::RemoteSecretClient;
pub use config::{EndpointConfig, LifecycleConfig};
pub use error::{ClientError, ErrorKind, LifecycleError, Result};
pub use lifecycle::{
    CreationWaiter, DeletionReport, DeletionSequencer, PurgeOutcome, QueueExit, SecretLifecycle,
    VersionPurgeCoordinator,
};
pub use types::{
    LifecycleState, SecretKind, SecretPrototype, SecretResourceId, SecretType, SecretView,
    TaskStatus, TaskType, TaskView, VersionView,
};
