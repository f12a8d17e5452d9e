//! Common test utilities for lifecycle integration tests
//!
//! Provides a scripted in-memory `RemoteSecretClient` that records every call
//! in order, so tests can assert on call sequences and poll counts.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

use secrets_manager_lifecycle::{
    ClientError, LifecycleConfig, LifecycleState, RemoteSecretClient, SecretPrototype, SecretType,
    SecretView, TaskStatus, TaskView, VersionView,
};

/// One recorded client call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    GetSecret(String),
    CreateSecret(String),
    DeleteVersionPayload { secret_id: String, version_id: String },
    ListVersions(String),
    ListTasks(String),
    ForceDelete(String),
}

/// Scripted reply for a remote call
#[derive(Debug, Clone)]
pub enum Reply<T> {
    Ok(T),
    NotFound,
    Error(u16),
}

impl<T> Reply<T> {
    fn into_result(self, resource: &str) -> Result<T, ClientError> {
        match self {
            Reply::Ok(value) => Ok(value),
            Reply::NotFound => Err(ClientError::not_found(resource.to_string())),
            Reply::Error(status) => Err(ClientError::api(status, "scripted failure")),
        }
    }
}

/// Pops the next scripted item, repeating the last one once the script runs dry
fn next_scripted<T: Clone>(script: &mut VecDeque<T>) -> Option<T> {
    if script.len() > 1 {
        script.pop_front()
    } else {
        script.front().cloned()
    }
}

#[derive(Debug, Default)]
struct MockState {
    calls: Vec<Call>,
    secret_states: VecDeque<Reply<LifecycleState>>,
    created_id: String,
    versions: Option<Reply<Vec<VersionView>>>,
    /// Per-version task status script; `None` entries mean the task is not listed
    task_scripts: HashMap<String, VecDeque<Option<TaskStatus>>>,
    purge_requested: Vec<String>,
    failing_purges: HashSet<String>,
    force_delete_error: Option<u16>,
    tasks_not_found: bool,
}

#[derive(Debug, Default)]
pub struct MockSecretClient {
    state: Mutex<MockState>,
}

impl MockSecretClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the lifecycle states returned by successive `get_secret` calls
    pub fn with_secret_states(self, states: Vec<Reply<LifecycleState>>) -> Self {
        self.state.lock().unwrap().secret_states = states.into();
        self
    }

    pub fn with_created_id(self, id: &str) -> Self {
        self.state.lock().unwrap().created_id = id.to_string();
        self
    }

    pub fn with_versions(self, versions: Vec<VersionView>) -> Self {
        self.state.lock().unwrap().versions = Some(Reply::Ok(versions));
        self
    }

    pub fn with_versions_reply(self, reply: Reply<Vec<VersionView>>) -> Self {
        self.state.lock().unwrap().versions = Some(reply);
        self
    }

    /// Script the task status seen on each task-list poll after the purge of `version_id`
    pub fn with_task_script(self, version_id: &str, script: Vec<Option<TaskStatus>>) -> Self {
        self.state
            .lock()
            .unwrap()
            .task_scripts
            .insert(version_id.to_string(), script.into());
        self
    }

    pub fn with_failing_purge(self, version_id: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .failing_purges
            .insert(version_id.to_string());
        self
    }

    /// Report the secret as missing on every task-list poll
    pub fn with_tasks_not_found(self) -> Self {
        self.state.lock().unwrap().tasks_not_found = true;
        self
    }

    pub fn with_force_delete_error(self, status: u16) -> Self {
        self.state.lock().unwrap().force_delete_error = Some(status);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|call| predicate(call)).count()
    }

    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }
}

fn view(id: &str, state: LifecycleState) -> SecretView {
    SecretView {
        id: id.to_string(),
        name: format!("{id}-name"),
        secret_type: SecretType::CustomCredentials,
        state,
        versions_total: 1,
        created_at: None,
        updated_at: None,
    }
}

#[async_trait]
impl RemoteSecretClient for MockSecretClient {
    async fn get_secret(&self, secret_id: &str) -> Result<SecretView, ClientError> {
        self.record(Call::GetSecret(secret_id.to_string()));
        let reply = {
            let mut state = self.state.lock().unwrap();
            next_scripted(&mut state.secret_states).unwrap_or(Reply::NotFound)
        };
        reply
            .into_result(&format!("secret {secret_id}"))
            .map(|state| view(secret_id, state))
    }

    async fn create_secret(&self, prototype: &SecretPrototype) -> Result<SecretView, ClientError> {
        self.record(Call::CreateSecret(prototype.base.name.clone()));
        let id = self.state.lock().unwrap().created_id.clone();
        let initial = if prototype.kind.provisions_asynchronously() {
            LifecycleState::PreActivation
        } else {
            LifecycleState::Active
        };
        let mut created = view(&id, initial);
        created.secret_type = prototype.secret_type();
        Ok(created)
    }

    async fn delete_secret_version_payload(
        &self,
        secret_id: &str,
        version_id: &str,
    ) -> Result<(), ClientError> {
        self.record(Call::DeleteVersionPayload {
            secret_id: secret_id.to_string(),
            version_id: version_id.to_string(),
        });
        let mut state = self.state.lock().unwrap();
        if state.failing_purges.contains(version_id) {
            return Err(ClientError::api(500, "purge rejected"));
        }
        state.purge_requested.push(version_id.to_string());
        Ok(())
    }

    async fn list_secret_versions(&self, secret_id: &str) -> Result<Vec<VersionView>, ClientError> {
        self.record(Call::ListVersions(secret_id.to_string()));
        let state = self.state.lock().unwrap();
        let reply = state.versions.clone().unwrap_or(Reply::Ok(Vec::new()));
        // Payloads whose purge was accepted are gone on later listings
        reply
            .into_result(&format!("secret {secret_id}"))
            .map(|versions| {
                versions
                    .into_iter()
                    .map(|mut version| {
                        if state.purge_requested.contains(&version.id) {
                            version.payload_available = false;
                        }
                        version
                    })
                    .collect()
            })
    }

    async fn list_pending_tasks(&self, secret_id: &str) -> Result<Vec<TaskView>, ClientError> {
        self.record(Call::ListTasks(secret_id.to_string()));
        let mut state = self.state.lock().unwrap();
        if state.tasks_not_found {
            return Err(ClientError::not_found(format!("secret {secret_id}")));
        }
        let requested = state.purge_requested.clone();
        let mut tasks = Vec::new();
        for version_id in requested {
            let status = state
                .task_scripts
                .get_mut(&version_id)
                .and_then(next_scripted)
                .flatten();
            if let Some(status) = status {
                tasks.push(TaskView::delete_credentials(version_id, status));
            }
        }
        Ok(tasks)
    }

    async fn force_delete_secret(&self, secret_id: &str) -> Result<(), ClientError> {
        self.record(Call::ForceDelete(secret_id.to_string()));
        match self.state.lock().unwrap().force_delete_error {
            Some(status) => Err(ClientError::api(status, "delete rejected")),
            None => Ok(()),
        }
    }
}

/// Configuration with short, round timings for paused-clock tests
pub fn test_config() -> LifecycleConfig {
    LifecycleConfig {
        create_timeout_secs: 60,
        create_poll_interval_secs: 5,
        purge_queue_timeout_secs: 30,
        purge_poll_interval_secs: 5,
        ..LifecycleConfig::default()
    }
}

pub fn delete_payload(secret_id: &str, version_id: &str) -> Call {
    Call::DeleteVersionPayload {
        secret_id: secret_id.to_string(),
        version_id: version_id.to_string(),
    }
}
