//! # Types
//!
//! Snapshots of remote state read by the lifecycle waiters, plus the secret
//! prototypes handed to `CreateSecret`.
//!
//! All views are owned by the remote system. The waiters only ever read them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::constants::DELETE_CREDENTIALS_TASK_TYPE;

/// Secret lifecycle state (NIST SP 800-57 naming used by the service)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    PreActivation,
    Active,
    Suspended,
    Deactivated,
    Destroyed,
    /// A state this crate does not know about. Treated as still settling.
    #[serde(untagged)]
    Other(String),
}

impl LifecycleState {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            LifecycleState::PreActivation => "pre_activation",
            LifecycleState::Active => "active",
            LifecycleState::Suspended => "suspended",
            LifecycleState::Deactivated => "deactivated",
            LifecycleState::Destroyed => "destroyed",
            LifecycleState::Other(state) => state,
        }
    }

    /// `destroyed` can never become `active` again
    #[must_use]
    pub fn is_terminal_failure(&self) -> bool {
        matches!(self, LifecycleState::Destroyed)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LifecycleState {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "pre_activation" => LifecycleState::PreActivation,
            "active" => LifecycleState::Active,
            "suspended" => LifecycleState::Suspended,
            "deactivated" => LifecycleState::Deactivated,
            "destroyed" => LifecycleState::Destroyed,
            other => LifecycleState::Other(other.to_string()),
        })
    }
}

/// Secret type discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecretType {
    Arbitrary,
    UsernamePassword,
    Kv,
    IamCredentials,
    ImportedCert,
    PublicCert,
    PrivateCert,
    ServiceCredentials,
    CustomCredentials,
}

impl SecretType {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SecretType::Arbitrary => "arbitrary",
            SecretType::UsernamePassword => "username_password",
            SecretType::Kv => "kv",
            SecretType::IamCredentials => "iam_credentials",
            SecretType::ImportedCert => "imported_cert",
            SecretType::PublicCert => "public_cert",
            SecretType::PrivateCert => "private_cert",
            SecretType::ServiceCredentials => "service_credentials",
            SecretType::CustomCredentials => "custom_credentials",
        }
    }
}

/// Snapshot of a secret as returned by `GetSecret`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecretView {
    pub id: String,
    pub name: String,
    pub secret_type: SecretType,
    #[serde(rename = "state_description")]
    pub state: LifecycleState,
    #[serde(default)]
    pub versions_total: u32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Metadata of one secret version, as listed by `ListSecretVersions`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionView {
    pub id: String,
    pub payload_available: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl VersionView {
    pub fn new(id: impl Into<String>, payload_available: bool) -> Self {
        Self {
            id: id.into(),
            payload_available,
            created_at: None,
        }
    }
}

/// Kind of an asynchronous secret task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    CreateCredentials,
    DeleteCredentials,
    #[serde(untagged)]
    Other(String),
}

impl TaskType {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            TaskType::CreateCredentials => "create_credentials",
            TaskType::DeleteCredentials => DELETE_CREDENTIALS_TASK_TYPE,
            TaskType::Other(kind) => kind,
        }
    }
}

/// Status of an asynchronous secret task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Queued,
    Processing,
    CredentialsCreated,
    CredentialsDeleted,
    Failed,
    #[serde(untagged)]
    Other(String),
}

impl TaskStatus {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::Queued => "queued",
            TaskStatus::Processing => "processing",
            TaskStatus::CredentialsCreated => "credentials_created",
            TaskStatus::CredentialsDeleted => "credentials_deleted",
            TaskStatus::Failed => "failed",
            TaskStatus::Other(status) => status,
        }
    }

    /// Anything other than `queued` means the task has been picked up
    #[must_use]
    pub fn has_left_queue(&self) -> bool {
        !matches!(self, TaskStatus::Queued)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the per-secret task queue, as listed by `ListPendingTasks`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskView {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub secret_version_id: String,
    pub status: TaskStatus,
}

impl TaskView {
    pub fn delete_credentials(version_id: impl Into<String>, status: TaskStatus) -> Self {
        Self {
            id: None,
            task_type: TaskType::DeleteCredentials,
            secret_version_id: version_id.into(),
            status,
        }
    }

    /// True when this is the payload purge task for `version_id`
    #[must_use]
    pub fn is_purge_of(&self, version_id: &str) -> bool {
        self.task_type == TaskType::DeleteCredentials && self.secret_version_id == version_id
    }
}

/// Rotation policy attached to a secret prototype
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RotationPolicy {
    pub auto_rotate: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// Fields shared by every secret prototype
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SecretBase {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_group_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_metadata: BTreeMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub version_custom_metadata: BTreeMap<String, serde_json::Value>,
}

/// Kind-specific part of a secret prototype
///
/// Serialized with the `secret_type` tag the service expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "secret_type", rename_all = "snake_case")]
pub enum SecretKind {
    Arbitrary {
        payload: String,
    },
    UsernamePassword {
        username: String,
        password: String,
    },
    Kv {
        data: BTreeMap<String, serde_json::Value>,
    },
    CustomCredentials {
        configuration: String,
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        parameters: BTreeMap<String, serde_json::Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ttl: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rotation: Option<RotationPolicy>,
    },
}

impl SecretKind {
    #[must_use]
    pub fn secret_type(&self) -> SecretType {
        match self {
            SecretKind::Arbitrary { .. } => SecretType::Arbitrary,
            SecretKind::UsernamePassword { .. } => SecretType::UsernamePassword,
            SecretKind::Kv { .. } => SecretType::Kv,
            SecretKind::CustomCredentials { .. } => SecretType::CustomCredentials,
        }
    }

    /// Whether creating this kind starts an out-of-band job that must finish
    /// before the secret is usable
    #[must_use]
    pub fn provisions_asynchronously(&self) -> bool {
        matches!(self, SecretKind::CustomCredentials { .. })
    }
}

/// Request body for `CreateSecret`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecretPrototype {
    #[serde(flatten)]
    pub base: SecretBase,
    #[serde(flatten)]
    pub kind: SecretKind,
}

impl SecretPrototype {
    pub fn new(name: impl Into<String>, kind: SecretKind) -> Self {
        Self {
            base: SecretBase {
                name: name.into(),
                ..SecretBase::default()
            },
            kind,
        }
    }

    /// Custom credentials secret generated by the named configuration
    pub fn custom_credentials(name: impl Into<String>, configuration: impl Into<String>) -> Self {
        Self::new(
            name,
            SecretKind::CustomCredentials {
                configuration: configuration.into(),
                parameters: BTreeMap::new(),
                ttl: None,
                rotation: None,
            },
        )
    }

    #[must_use]
    pub fn secret_type(&self) -> SecretType {
        self.kind.secret_type()
    }
}

/// Error parsing a [`SecretResourceId`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("wrong format of resource ID {0:?}: expected `<region>/<instance_id>/<secret_id>`")]
pub struct ResourceIdError(String);

/// Composite identifier of a secret: `<region>/<instance_id>/<secret_id>`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SecretResourceId {
    pub region: String,
    pub instance_id: String,
    pub secret_id: String,
}

impl SecretResourceId {
    pub fn new(
        region: impl Into<String>,
        instance_id: impl Into<String>,
        secret_id: impl Into<String>,
    ) -> Self {
        Self {
            region: region.into(),
            instance_id: instance_id.into(),
            secret_id: secret_id.into(),
        }
    }
}

impl FromStr for SecretResourceId {
    type Err = ResourceIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('/').collect();
        match parts.as_slice() {
            [region, instance_id, secret_id]
                if !region.is_empty() && !instance_id.is_empty() && !secret_id.is_empty() =>
            {
                Ok(Self::new(*region, *instance_id, *secret_id))
            }
            _ => Err(ResourceIdError(s.to_string())),
        }
    }
}

impl fmt::Display for SecretResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.region, self.instance_id, self.secret_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_state_deserialize() {
        let state: LifecycleState = serde_json::from_str("\"pre_activation\"").unwrap();
        assert_eq!(state, LifecycleState::PreActivation);

        let state: LifecycleState = serde_json::from_str("\"rotating\"").unwrap();
        assert_eq!(state, LifecycleState::Other("rotating".to_string()));
        assert_eq!(state.as_str(), "rotating");
    }

    #[test]
    fn test_lifecycle_state_from_str_matches_display() {
        for name in [
            "pre_activation",
            "active",
            "suspended",
            "deactivated",
            "destroyed",
        ] {
            let state: LifecycleState = name.parse().unwrap();
            assert_eq!(state.to_string(), name);
        }
        assert!(LifecycleState::Destroyed.is_terminal_failure());
        assert!(!LifecycleState::Suspended.is_terminal_failure());
    }

    #[test]
    fn test_task_view_deserialize_and_match() {
        let json = r#"{"type":"delete_credentials","secret_version_id":"v2","status":"queued"}"#;
        let task: TaskView = serde_json::from_str(json).unwrap();
        assert!(task.is_purge_of("v2"));
        assert!(!task.is_purge_of("v1"));
        assert!(!task.status.has_left_queue());

        let json = r#"{"type":"create_credentials","secret_version_id":"v2","status":"processing"}"#;
        let task: TaskView = serde_json::from_str(json).unwrap();
        assert!(!task.is_purge_of("v2"));
        assert!(task.status.has_left_queue());
    }

    #[test]
    fn test_unknown_task_status_has_left_queue() {
        let status: TaskStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(status, TaskStatus::Other("cancelled".to_string()));
        assert!(status.has_left_queue());
    }

    #[test]
    fn test_custom_credentials_prototype_serializes_with_tag() {
        let mut prototype = SecretPrototype::custom_credentials("db-creds", "postgres-config");
        prototype.base.labels = vec!["team-a".to_string()];
        let value = serde_json::to_value(&prototype).unwrap();

        assert_eq!(value["secret_type"], "custom_credentials");
        assert_eq!(value["name"], "db-creds");
        assert_eq!(value["configuration"], "postgres-config");
        assert_eq!(value["labels"][0], "team-a");
        assert!(value.get("ttl").is_none());
        assert!(prototype.kind.provisions_asynchronously());
        assert_eq!(prototype.secret_type(), SecretType::CustomCredentials);
    }

    #[test]
    fn test_arbitrary_prototype_is_synchronous() {
        let prototype = SecretPrototype::new(
            "plain",
            SecretKind::Arbitrary {
                payload: "value".to_string(),
            },
        );
        assert!(!prototype.kind.provisions_asynchronously());
        assert_eq!(prototype.secret_type().as_str(), "arbitrary");
    }

    #[test]
    fn test_resource_id_parse() {
        let id: SecretResourceId = "us-south/1234-abcd/5678-efgh".parse().unwrap();
        assert_eq!(id.region, "us-south");
        assert_eq!(id.instance_id, "1234-abcd");
        assert_eq!(id.secret_id, "5678-efgh");
        assert_eq!(id.to_string(), "us-south/1234-abcd/5678-efgh");
    }

    #[test]
    fn test_resource_id_rejects_wrong_format() {
        for raw in ["", "secret", "us-south/instance", "a/b/c/d", "us-south//secret"] {
            assert!(
                raw.parse::<SecretResourceId>().is_err(),
                "{raw:?} should not parse"
            );
        }
    }
}
