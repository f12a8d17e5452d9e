//! # Errors
//!
//! Two layers of errors:
//!
//! - [`ClientError`] is what a [`RemoteSecretClient`](crate::client::RemoteSecretClient)
//!   implementation returns for a single remote call.
//! - [`LifecycleError`] is what the waiters and the deletion sequencer return to
//!   their caller. It separates the conditions a caller reports differently:
//!   a vanished resource, a terminal remote failure, an exhausted wait budget,
//!   and an ordinary transport error.

use std::time::Duration;
use thiserror::Error;

/// Result type for lifecycle operations
pub type Result<T> = std::result::Result<T, LifecycleError>;

/// Errors returned by a remote secrets client
#[derive(Debug, Error)]
pub enum ClientError {
    /// The requested resource does not exist (HTTP 404)
    #[error("{resource} not found")]
    NotFound { resource: String },

    /// The remote API rejected the request
    #[error("remote API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Network, authentication, or decoding failure
    #[error("transport error: {0}")]
    Transport(#[source] anyhow::Error),
}

impl ClientError {
    /// Create a not-found error for the given resource description
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Create an API error
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<anyhow::Error> for ClientError {
    fn from(err: anyhow::Error) -> Self {
        Self::Transport(err)
    }
}

/// Coarse classification of a [`LifecycleError`]
///
/// Useful for callers that map errors onto user-facing diagnostics or metric labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Vanished,
    RemoteTerminalFailure,
    Timeout,
    Transport,
}

impl ErrorKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Vanished => "vanished",
            ErrorKind::RemoteTerminalFailure => "terminal_failure",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Transport => "transport_error",
        }
    }
}

/// Errors surfaced by the lifecycle waiters and the deletion sequencer
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// The tracked secret disappeared while it was expected to exist
    #[error("secret {secret_id} no longer exists")]
    Vanished { secret_id: String },

    /// The secret reached a terminal failure state while waiting for success
    #[error("provisioning of secret {secret_id} failed: remote state is {state}")]
    RemoteTerminalFailure { secret_id: String, state: String },

    /// The wait budget elapsed before a target or terminal state was observed
    #[error(
        "timed out after {elapsed:?} waiting for {operation} on {resource} (last observed: {})",
        .last_observed.as_deref().unwrap_or("nothing")
    )]
    Timeout {
        operation: &'static str,
        resource: String,
        last_observed: Option<String>,
        elapsed: Duration,
    },

    /// Any other failure from the remote client, propagated unchanged
    #[error(transparent)]
    Transport(#[from] ClientError),
}

impl LifecycleError {
    /// Convert a client error raised while tracking `secret_id`
    ///
    /// Not-found means the secret itself is gone; everything else is transport.
    pub fn from_client(secret_id: &str, err: ClientError) -> Self {
        if err.is_not_found() {
            LifecycleError::Vanished {
                secret_id: secret_id.to_string(),
            }
        } else {
            LifecycleError::Transport(err)
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            LifecycleError::Vanished { .. } => ErrorKind::Vanished,
            LifecycleError::RemoteTerminalFailure { .. } => ErrorKind::RemoteTerminalFailure,
            LifecycleError::Timeout { .. } => ErrorKind::Timeout,
            LifecycleError::Transport(_) => ErrorKind::Transport,
        }
    }

    #[must_use]
    pub fn is_vanished(&self) -> bool {
        self.kind() == ErrorKind::Vanished
    }

    #[must_use]
    pub fn is_terminal_failure(&self) -> bool {
        self.kind() == ErrorKind::RemoteTerminalFailure
    }

    #[must_use]
    pub fn is_timeout(&self) -> bool {
        self.kind() == ErrorKind::Timeout
    }

    #[must_use]
    pub fn is_transport(&self) -> bool {
        self.kind() == ErrorKind::Transport
    }
}
