//! # Version Purge Coordinator
//!
//! Clears the sensitive payload of one secret version ahead of deletion.
//!
//! A payload purge is asynchronous on the remote side: the delete call only
//! enqueues a `delete_credentials` task. Once that task leaves `queued` the
//! remote system keeps working on it even if the secret itself is deleted, so
//! the coordinator waits for the queue exit and not for completion.
//!
//! A task that is no longer listed is treated as having left the queue with
//! status `failed`. It may already be done; either way the wait must end.

use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::{debug, info, info_span, warn, Instrument};

use crate::client::RemoteSecretClient;
use crate::config::LifecycleConfig;
use crate::constants::OPERATION_PURGE_WAIT;
use crate::error::{LifecycleError, Result};
use crate::observability::metrics;
use crate::types::TaskStatus;

/// How a purge task left the queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueExit {
    /// Status the task was last seen in, `failed` when it was not found
    pub status: TaskStatus,
    /// Whether the task was still listed when the wait ended
    pub task_found: bool,
}

impl QueueExit {
    fn observed(status: TaskStatus) -> Self {
        Self {
            status,
            task_found: true,
        }
    }

    fn absent() -> Self {
        Self {
            status: TaskStatus::Failed,
            task_found: false,
        }
    }
}

/// Result of purging one version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurgeOutcome {
    pub version_id: String,
    pub exit: QueueExit,
}

/// Issues version payload purges and waits for their tasks to leave the queue
#[derive(Debug)]
pub struct VersionPurgeCoordinator<'a, C: ?Sized> {
    client: &'a C,
    queue_timeout: Duration,
    poll_interval: Duration,
    record_metrics: bool,
}

impl<'a, C> VersionPurgeCoordinator<'a, C>
where
    C: RemoteSecretClient + ?Sized,
{
    pub fn new(client: &'a C, queue_timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            client,
            queue_timeout,
            poll_interval,
            record_metrics: true,
        }
    }

    pub fn from_config(client: &'a C, config: &LifecycleConfig) -> Self {
        Self::new(
            client,
            config.purge_queue_timeout(),
            config.purge_poll_interval(),
        )
        .with_metrics(config.enable_metrics)
    }

    #[must_use]
    pub fn with_metrics(mut self, enabled: bool) -> Self {
        self.record_metrics = enabled;
        self
    }

    /// Enqueue the payload purge of one version
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Transport`] if the remote call fails.
    pub async fn purge_version(&self, secret_id: &str, version_id: &str) -> Result<()> {
        info!(
            secret.id = secret_id,
            version.id = version_id,
            "Clearing secret version data"
        );
        self.client
            .delete_secret_version_payload(secret_id, version_id)
            .await?;
        if self.record_metrics {
            metrics::increment_version_purges();
        }
        Ok(())
    }

    /// Poll the task list until the purge task for `version_id` is no longer `queued`
    ///
    /// Polling starts immediately and repeats every poll interval. The last
    /// sleep is shortened so one final poll lands exactly on the deadline.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::Timeout`] if the task is still queued when `timeout`
    /// elapses, [`LifecycleError::Vanished`] if the secret is gone, and
    /// [`LifecycleError::Transport`] if listing tasks fails otherwise.
    pub async fn wait_until_left_queue(
        &self,
        secret_id: &str,
        version_id: &str,
        timeout: Duration,
    ) -> Result<QueueExit> {
        let span = info_span!(
            "secret.version.wait_left_queue",
            secret.id = secret_id,
            version.id = version_id
        );

        async move {
            let start = Instant::now();
            let result = self.poll_queue(secret_id, version_id, timeout, start).await;

            if self.record_metrics {
                let outcome = match &result {
                    Ok(exit) if exit.task_found => "left_queue",
                    Ok(_) => "task_absent",
                    Err(err) => err.kind().as_str(),
                };
                metrics::record_wait_outcome(
                    OPERATION_PURGE_WAIT,
                    outcome,
                    start.elapsed().as_secs_f64(),
                );
            }
            result
        }
        .instrument(span)
        .await
    }

    /// Purge one version and wait for its task to leave the queue
    ///
    /// # Errors
    ///
    /// See [`purge_version`](Self::purge_version) and
    /// [`wait_until_left_queue`](Self::wait_until_left_queue).
    pub async fn purge_and_wait(&self, secret_id: &str, version_id: &str) -> Result<PurgeOutcome> {
        self.purge_version(secret_id, version_id).await?;
        let exit = self
            .wait_until_left_queue(secret_id, version_id, self.queue_timeout)
            .await?;
        Ok(PurgeOutcome {
            version_id: version_id.to_string(),
            exit,
        })
    }

    async fn poll_queue(
        &self,
        secret_id: &str,
        version_id: &str,
        timeout: Duration,
        start: Instant,
    ) -> Result<QueueExit> {
        loop {
            if self.record_metrics {
                metrics::increment_polls(OPERATION_PURGE_WAIT);
            }

            let tasks = self
                .client
                .list_pending_tasks(secret_id)
                .await
                .map_err(|err| LifecycleError::from_client(secret_id, err))?;
            let Some(task) = tasks.iter().find(|task| task.is_purge_of(version_id)) else {
                warn!("Clear version data task not found, assuming it left the queue");
                return Ok(QueueExit::absent());
            };

            debug!(status = %task.status, "Found clear version data task");
            if task.status.has_left_queue() {
                return Ok(QueueExit::observed(task.status.clone()));
            }

            let elapsed = start.elapsed();
            if elapsed >= timeout {
                return Err(LifecycleError::Timeout {
                    operation: OPERATION_PURGE_WAIT,
                    resource: format!("version {version_id} of secret {secret_id}"),
                    last_observed: Some(task.status.to_string()),
                    elapsed,
                });
            }
            sleep(self.poll_interval.min(timeout - elapsed)).await;
        }
    }
}
