//! # Creation Waiter
//!
//! Blocks the caller until a newly created secret finishes provisioning.
//!
//! Creating a custom credentials secret starts an out-of-band job on the remote
//! side. The secret sits in `pre_activation` until the job completes and is only
//! usable once it reports `active`. Each poll ends in one of:
//!
//! - a target state: return it
//! - not-found: the secret vanished, fail with [`LifecycleError::Vanished`]
//! - `destroyed`: the job failed, fail with [`LifecycleError::RemoteTerminalFailure`]
//! - anything else: sleep for the poll interval and try again, until the timeout
//!
//! The sleep before the deadline is shortened so the final poll happens exactly
//! at the deadline and never after it.

use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::{debug, info, info_span, warn, Instrument};

use crate::client::RemoteSecretClient;
use crate::config::LifecycleConfig;
use crate::constants::OPERATION_CREATE_WAIT;
use crate::error::{ClientError, LifecycleError, Result};
use crate::observability::metrics;
use crate::types::LifecycleState;

/// What a single observation means for the wait loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Observation {
    Reached(LifecycleState),
    Settling(LifecycleState),
}

/// Classify one observed state
///
/// Target states win over the terminal-failure check so a caller could, in
/// principle, wait for `destroyed` itself.
pub(crate) fn classify(
    secret_id: &str,
    state: LifecycleState,
    pending: &[LifecycleState],
    target: &[LifecycleState],
) -> Result<Observation> {
    if target.contains(&state) {
        return Ok(Observation::Reached(state));
    }
    if state.is_terminal_failure() {
        return Err(LifecycleError::RemoteTerminalFailure {
            secret_id: secret_id.to_string(),
            state: state.to_string(),
        });
    }
    if !pending.contains(&state) {
        warn!(
            secret.id = secret_id,
            state = %state,
            "Secret is in an unexpected state while provisioning, continuing to wait"
        );
    }
    Ok(Observation::Settling(state))
}

/// Polls secret state until provisioning succeeds, fails, or times out
#[derive(Debug, Clone)]
pub struct CreationWaiter {
    timeout: Duration,
    poll_interval: Duration,
    record_metrics: bool,
}

impl CreationWaiter {
    #[must_use]
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
            record_metrics: true,
        }
    }

    #[must_use]
    pub fn from_config(config: &LifecycleConfig) -> Self {
        Self::new(config.create_timeout(), config.create_poll_interval())
            .with_metrics(config.enable_metrics)
    }

    #[must_use]
    pub fn with_metrics(mut self, enabled: bool) -> Self {
        self.record_metrics = enabled;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Wait until `secret_id` reports `active`
    ///
    /// # Errors
    ///
    /// [`LifecycleError::Vanished`] if the secret is not found on any poll,
    /// [`LifecycleError::RemoteTerminalFailure`] if it reaches `destroyed`,
    /// [`LifecycleError::Timeout`] if the budget runs out, and
    /// [`LifecycleError::Transport`] for any other client failure.
    pub async fn wait_for_active<C>(&self, client: &C, secret_id: &str) -> Result<LifecycleState>
    where
        C: RemoteSecretClient + ?Sized,
    {
        self.wait(
            secret_id,
            &[LifecycleState::PreActivation],
            &[LifecycleState::Active],
            move || async move { client.get_secret(secret_id).await.map(|secret| secret.state) },
        )
        .await
    }

    /// Poll `fetch` until it reports a state in `target`
    ///
    /// `pending` lists the states expected while settling. Other non-target
    /// states are logged and waited out as well.
    ///
    /// # Errors
    ///
    /// See [`CreationWaiter::wait_for_active`].
    pub async fn wait<F, Fut>(
        &self,
        secret_id: &str,
        pending: &[LifecycleState],
        target: &[LifecycleState],
        fetch: F,
    ) -> Result<LifecycleState>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<LifecycleState, ClientError>>,
    {
        let span = info_span!(
            "secret.wait_for_state",
            secret.id = secret_id,
            timeout_secs = self.timeout.as_secs()
        );

        async move {
            let start = Instant::now();
            let result = self.poll(secret_id, pending, target, fetch, start).await;

            let elapsed = start.elapsed();
            match &result {
                Ok(state) => info!(state = %state, ?elapsed, "Secret reached target state"),
                Err(err) => warn!(error = %err, ?elapsed, "Waiting for secret state failed"),
            }
            if self.record_metrics {
                let outcome = match &result {
                    Ok(_) => "success",
                    Err(err) => err.kind().as_str(),
                };
                metrics::record_wait_outcome(OPERATION_CREATE_WAIT, outcome, elapsed.as_secs_f64());
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn poll<F, Fut>(
        &self,
        secret_id: &str,
        pending: &[LifecycleState],
        target: &[LifecycleState],
        mut fetch: F,
        start: Instant,
    ) -> Result<LifecycleState>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<LifecycleState, ClientError>>,
    {
        loop {
            if self.record_metrics {
                metrics::increment_polls(OPERATION_CREATE_WAIT);
            }

            let state = fetch()
                .await
                .map_err(|err| LifecycleError::from_client(secret_id, err))?;
            debug!(state = %state, "Observed secret state");

            let settling = match classify(secret_id, state, pending, target)? {
                Observation::Reached(state) => return Ok(state),
                Observation::Settling(state) => state,
            };

            let elapsed = start.elapsed();
            if elapsed >= self.timeout {
                return Err(LifecycleError::Timeout {
                    operation: OPERATION_CREATE_WAIT,
                    resource: format!("secret {secret_id}"),
                    last_observed: Some(settling.to_string()),
                    elapsed,
                });
            }
            sleep(self.poll_interval.min(self.timeout - elapsed)).await;
        }
    }
}
