//! # Deletion Sequencer
//!
//! Deletes a secret only after the payloads of its last two versions have been
//! handed to the remote purge queue.
//!
//! Order within one call:
//!
//! 1. list the secret's versions
//! 2. purge the previous (second-to-last) version, if it still has a payload
//! 3. purge the current (last) version, if it still has a payload
//! 4. force-delete the secret
//!
//! Each purge is awaited only until its task leaves `queued`. Force-delete is
//! then safe: the remote purge keeps running after the secret record is gone,
//! whereas a non-forced delete would race the in-flight purge.
//!
//! The current version is attempted even if the previous one failed. If either
//! purge failed, the first error is returned and the secret is left in place so
//! the caller can retry the whole delete.

use tracing::{info, info_span, warn, Instrument};

use crate::client::RemoteSecretClient;
use crate::config::LifecycleConfig;
use crate::error::{LifecycleError, Result};
use crate::lifecycle::purge::{PurgeOutcome, VersionPurgeCoordinator};
use crate::observability::metrics;
use crate::types::VersionView;

/// What a successful delete did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionReport {
    pub secret_id: String,
    /// Purged versions in the order they were purged
    pub purged: Vec<PurgeOutcome>,
}

/// Versions whose payload must be purged before deletion, previous first
#[must_use]
pub fn purge_targets(versions: &[VersionView]) -> Vec<&VersionView> {
    let previous = versions
        .len()
        .checked_sub(2)
        .and_then(|idx| versions.get(idx));
    let current = versions.last();

    [previous, current]
        .into_iter()
        .flatten()
        .filter(|version| version.payload_available)
        .collect()
}

/// Purges version payloads, then force-deletes the secret
#[derive(Debug)]
pub struct DeletionSequencer<'a, C: ?Sized> {
    client: &'a C,
    coordinator: VersionPurgeCoordinator<'a, C>,
    record_metrics: bool,
}

impl<'a, C> DeletionSequencer<'a, C>
where
    C: RemoteSecretClient + ?Sized,
{
    pub fn new(client: &'a C, coordinator: VersionPurgeCoordinator<'a, C>) -> Self {
        Self {
            client,
            coordinator,
            record_metrics: true,
        }
    }

    pub fn from_config(client: &'a C, config: &LifecycleConfig) -> Self {
        Self::new(client, VersionPurgeCoordinator::from_config(client, config))
            .with_metrics(config.enable_metrics)
    }

    #[must_use]
    pub fn with_metrics(mut self, enabled: bool) -> Self {
        self.record_metrics = enabled;
        self
    }

    /// Purge the last two versions' payloads, then force-delete the secret
    ///
    /// # Errors
    ///
    /// Listing versions or any purge failing skips the force-delete and returns
    /// the first error. [`LifecycleError::Vanished`] if the secret is not found
    /// while listing versions or tasks. A force-delete failure is returned as-is.
    pub async fn delete_with_purge(&self, secret_id: &str) -> Result<DeletionReport> {
        let span = info_span!("secret.delete_with_purge", secret.id = secret_id);

        async move {
            let versions = self
                .client
                .list_secret_versions(secret_id)
                .await
                .map_err(|err| LifecycleError::from_client(secret_id, err))?;
            let targets = purge_targets(&versions);
            info!(
                versions = versions.len(),
                purge_targets = targets.len(),
                "Clearing secret version data before deletion"
            );

            let mut purged = Vec::with_capacity(targets.len());
            let mut first_error: Option<LifecycleError> = None;
            for version in targets {
                match self.coordinator.purge_and_wait(secret_id, &version.id).await {
                    Ok(outcome) => purged.push(outcome),
                    Err(err) => {
                        warn!(
                            version.id = %version.id,
                            error = %err,
                            "Failed to clear secret version data"
                        );
                        if first_error.is_none() {
                            first_error = Some(err);
                        }
                    }
                }
            }
            if let Some(err) = first_error {
                warn!("Skipping secret deletion because version data was not cleared");
                return Err(err);
            }

            info!("Force deleting secret");
            self.client.force_delete_secret(secret_id).await?;
            if self.record_metrics {
                metrics::increment_force_deletes();
            }

            Ok(DeletionReport {
                secret_id: secret_id.to_string(),
                purged,
            })
        }
        .instrument(span)
        .await
    }
}
