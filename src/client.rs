//! # Remote Client
//!
//! The narrow interface the lifecycle waiters consume from a Secrets Manager
//! REST client. Endpoint resolution, authentication and request marshalling
//! live in the implementation, which is constructed from an
//! [`EndpointConfig`](crate::config::EndpointConfig).

use async_trait::async_trait;

use crate::error::ClientError;
use crate::types::{SecretPrototype, SecretView, TaskView, VersionView};

/// Client trait for a remote secrets-management API
///
/// Implementations must report a missing secret as [`ClientError::NotFound`]
/// so the waiters can tell a vanished resource from a transport failure.
#[async_trait]
pub trait RemoteSecretClient: Send + Sync {
    /// Read a snapshot of the secret
    async fn get_secret(&self, secret_id: &str) -> Result<SecretView, ClientError>;

    /// Create a secret from a prototype
    async fn create_secret(&self, prototype: &SecretPrototype) -> Result<SecretView, ClientError>;

    /// Enqueue an asynchronous purge of one version's payload
    ///
    /// Returns once the purge task is enqueued, not once the payload is gone.
    async fn delete_secret_version_payload(
        &self,
        secret_id: &str,
        version_id: &str,
    ) -> Result<(), ClientError>;

    /// List version metadata, oldest first
    async fn list_secret_versions(&self, secret_id: &str) -> Result<Vec<VersionView>, ClientError>;

    /// List tasks the remote system still holds for the secret
    async fn list_pending_tasks(&self, secret_id: &str) -> Result<Vec<TaskView>, ClientError>;

    /// Delete the secret even if purge tasks are still outstanding
    async fn force_delete_secret(&self, secret_id: &str) -> Result<(), ClientError>;
}
