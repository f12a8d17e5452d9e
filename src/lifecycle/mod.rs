//! # Secret Lifecycle
//!
//! Caller-facing entry points for the asynchronous parts of a secret's life:
//!
//! - [`SecretLifecycle::create_and_wait`] creates a secret and, for kinds that
//!   provision out of band, blocks until it is `active`.
//! - [`SecretLifecycle::wait_for_active`] runs the activation wait on its own.
//! - [`SecretLifecycle::delete_with_purge`] purges version payloads and then
//!   force-deletes the secret.
//!
//! Every call runs on the caller's task. Nothing is spawned; the only
//! suspension points are the remote calls and the sleeps between polls.
//! Callers are expected to serialize lifecycle operations per secret.

pub mod creation;
pub mod deletion;
pub mod purge;

use std::time::Duration;

use tracing::{info, info_span, Instrument};

use crate::client::RemoteSecretClient;
use crate::config::LifecycleConfig;
use crate::error::{LifecycleError, Result};
use crate::types::{LifecycleState, SecretPrototype, SecretView};

pub use creation::CreationWaiter;
pub use deletion::{purge_targets, DeletionReport, DeletionSequencer};
pub use purge::{PurgeOutcome, QueueExit, VersionPurgeCoordinator};

/// Lifecycle operations against one remote secrets client
#[derive(Debug, Clone)]
pub struct SecretLifecycle<C> {
    client: C,
    config: LifecycleConfig,
}

impl<C> SecretLifecycle<C>
where
    C: RemoteSecretClient,
{
    pub fn new(client: C, config: LifecycleConfig) -> Self {
        Self { client, config }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    /// Create a secret and wait for it to become usable
    ///
    /// Kinds that provision asynchronously are waited on with the configured
    /// create timeout and re-read once active. Other kinds return the created
    /// view directly.
    ///
    /// # Errors
    ///
    /// Create failures are returned as [`LifecycleError::Transport`]; the wait
    /// can fail as described on [`CreationWaiter::wait_for_active`].
    pub async fn create_and_wait(&self, prototype: &SecretPrototype) -> Result<SecretView> {
        let span = info_span!(
            "secret.create",
            secret.name = %prototype.base.name,
            secret.kind = prototype.secret_type().as_str()
        );

        async move {
            let created = self.client.create_secret(prototype).await?;
            info!(secret.id = %created.id, state = %created.state, "Secret created");

            if !prototype.kind.provisions_asynchronously() {
                return Ok(created);
            }

            CreationWaiter::from_config(&self.config)
                .wait_for_active(&self.client, &created.id)
                .await?;

            self.client
                .get_secret(&created.id)
                .await
                .map_err(|err| LifecycleError::from_client(&created.id, err))
        }
        .instrument(span)
        .await
    }

    /// Wait until `secret_id` is `active`, for at most `timeout`
    ///
    /// # Errors
    ///
    /// See [`CreationWaiter::wait_for_active`].
    pub async fn wait_for_active(
        &self,
        secret_id: &str,
        timeout: Duration,
    ) -> Result<LifecycleState> {
        CreationWaiter::from_config(&self.config)
            .with_timeout(timeout)
            .wait_for_active(&self.client, secret_id)
            .await
    }

    /// Purge the last two versions' payloads, then force-delete the secret
    ///
    /// # Errors
    ///
    /// See [`DeletionSequencer::delete_with_purge`].
    pub async fn delete_with_purge(&self, secret_id: &str) -> Result<DeletionReport> {
        DeletionSequencer::from_config(&self.client, &self.config)
            .delete_with_purge(secret_id)
            .await
    }
}
