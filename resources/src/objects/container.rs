use serde::{Deserialize, Serialize};

use super::{
    action::{EnvVar, ExecAction, HTTPGetAction, LivenessProbe},
    volume::{Port, VolumeMount},
};
use crate::codec::{first_match, impl_codec, is_default, nullable, one_of};

/// When to pull a container image.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum PullPolicy {
    /// Always attempt to pull the latest image.
    /// Container will fail if the pull fails.
    PullAlways,
    /// Never pull an image, only use a local image.
    /// Container will fail if the image isn't present.
    PullNever,
    /// Pull if the image isn't present on disk.
    /// Container will fail if the image isn't present and the pull fails.
    PullIfNotPresent,
    /// A policy name this client doesn't know, kept verbatim.
    Other(String),
}

impl PullPolicy {
    pub fn as_str(&self) -> &str {
        match self {
            PullPolicy::PullAlways => "PullAlways",
            PullPolicy::PullNever => "PullNever",
            PullPolicy::PullIfNotPresent => "PullIfNotPresent",
            PullPolicy::Other(name) => name,
        }
    }
}

/// Both the `PullAlways` names and the short `Always` ones are read.
impl From<String> for PullPolicy {
    fn from(name: String) -> Self {
        match name.as_str() {
            "PullAlways" | "Always" => PullPolicy::PullAlways,
            "PullNever" | "Never" => PullPolicy::PullNever,
            "PullIfNotPresent" | "IfNotPresent" => PullPolicy::PullIfNotPresent,
            _ => PullPolicy::Other(name),
        }
    }
}

impl From<PullPolicy> for String {
    fn from(policy: PullPolicy) -> Self {
        match policy {
            PullPolicy::Other(name) => name,
            known => known.as_str().to_owned(),
        }
    }
}

impl std::fmt::Display for PullPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single application container to run within a pod.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Container {
    /// Required: This must be a DNS_LABEL.
    /// Each container in a pod must have a unique name.
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub name: String,
    /// Required.
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub image: String,
    /// Optional: Defaults to whatever is defined in the image.
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub command: Vec<String>,
    /// Optional: Defaults to Docker's default.
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub working_dir: String,
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub ports: Vec<Port>,
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub env: Vec<EnvVar>,
    /// Optional: Defaults to unlimited.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<i64>,
    /// Optional: Defaults to unlimited.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<i64>,
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub volume_mounts: Vec<VolumeMount>,
    /// Written as `livenessProbe`, `livenessProb` is accepted when reading.
    #[serde(skip_serializing_if = "Option::is_none", alias = "livenessProb")]
    pub liveness_probe: Option<LivenessProbe>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lifecycle: Option<Lifecycle>,
    /// Optional: Default to false.
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub privileged: bool,
    /// Optional: Policy for pulling images for this container.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_pull_policy: Option<PullPolicy>,
}

impl Container {
    pub fn new(name: impl Into<String>, image: impl Into<String>) -> Self {
        Container {
            name: name.into(),
            image: image.into(),
            ..Container::default()
        }
    }
}

one_of! {
    /// A specific action that should be taken.
    pub enum Handler {
        "exec" => Exec(ExecAction),
        "httpGet" => HTTPGet(HTTPGetAction),
    }
}

/// Actions the management system should take in response to container
/// lifecycle events. For the PostStart and PreStop lifecycle handlers,
/// management of the container blocks until the action is complete.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Lifecycle {
    /// Called immediately after a container is created. If the handler fails,
    /// the container is terminated and restarted.
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "first_match")]
    pub post_start: Option<Handler>,
    /// Called immediately before a container is terminated. The reason for
    /// termination is passed to the handler. Regardless of the outcome of the
    /// handler, the container is eventually terminated.
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "first_match")]
    pub pre_stop: Option<Handler>,
}

impl_codec!(Container, Lifecycle);

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;
    use crate::{
        codec::Codec,
        objects::{
            action::ProbeAction,
            volume::Protocol,
        },
    };

    fn redis() -> Value {
        json!({
            "name": "redis",
            "image": "redis:latest",
            "command": ["redis-server", "--appendonly", "yes"],
            "workingDir": "/data",
            "ports": [{"name": "db", "containerPort": 6379, "protocol": "TCP"}],
            "env": [{"name": "MASTER", "value": "true"}],
            "memory": 134217728,
            "cpu": 500,
            "volumeMounts": [{"name": "data", "mountPath": "/data"}],
            "livenessProbe": {"tcpSocket": {"port": 6379}, "initialDelaySeconds": 30},
            "lifecycle": {"preStop": {"exec": {"command": ["redis-cli", "shutdown"]}}},
            "privileged": true,
            "imagePullPolicy": "PullIfNotPresent",
        })
    }

    #[test]
    fn decode_full_container() {
        let container = Container::decode(&redis()).unwrap();
        assert_eq!(container.name, "redis");
        assert_eq!(container.command.len(), 3);
        assert_eq!(container.ports[0].container_port, Some(6379));
        assert_eq!(container.ports[0].protocol, Protocol::TCP);
        assert_eq!(container.env[0], EnvVar::new("MASTER", "true"));
        assert_eq!(container.cpu, Some(500));
        assert_eq!(container.volume_mounts[0].mount_path, "/data");
        assert!(matches!(
            container.liveness_probe.as_ref().and_then(|probe| probe.action.as_ref()),
            Some(ProbeAction::TCPSocket(_))
        ));
        assert!(matches!(
            container.lifecycle.as_ref().and_then(|lifecycle| lifecycle.pre_stop.as_ref()),
            Some(Handler::Exec(_))
        ));
        assert!(container.privileged);
        assert_eq!(container.image_pull_policy, Some(PullPolicy::PullIfNotPresent));
    }

    #[test]
    fn round_trip() {
        let container = Container::decode(&redis()).unwrap();
        assert_eq!(Value::Object(container.encode()), redis());
        assert_eq!(Container::decode(&Value::Object(container.encode())).unwrap(), container);
    }

    #[test]
    fn empty_fields_are_left_out() {
        let container = Container {
            privileged: false,
            command: vec![],
            ..Container::new("web", "nginx")
        };
        assert_eq!(container.as_text(), r#"{"image":"nginx","name":"web"}"#);
        assert_eq!(Container::default().as_text(), "{}");
        assert_eq!(Container::decode(&json!({})).unwrap(), Container::default());
    }

    #[test]
    fn liveness_probe_old_key() {
        let container =
            Container::decode(&json!({"livenessProb": {"exec": {"command": ["true"]}}})).unwrap();
        assert!(container.liveness_probe.is_some());
        assert!(container.as_text().contains("livenessProbe"));
    }

    #[test]
    fn handler_order() {
        let lifecycle = Lifecycle::decode(&json!({
            "postStart": {"httpGet": {"path": "/start"}, "exec": {"command": ["touch", "/ready"]}},
            "preStop": {"unknown": {}},
        }))
        .unwrap();
        assert!(matches!(lifecycle.post_start, Some(Handler::Exec(_))));
        assert_eq!(lifecycle.pre_stop, None);
    }

    #[test]
    fn pull_policy_names() {
        let container = Container::decode(&json!({"imagePullPolicy": "IfNotPresent"})).unwrap();
        assert_eq!(container.image_pull_policy, Some(PullPolicy::PullIfNotPresent));
        assert_eq!(container.as_text(), r#"{"imagePullPolicy":"PullIfNotPresent"}"#);

        let container = Container::decode(&json!({"imagePullPolicy": "Sometimes"})).unwrap();
        assert_eq!(container.image_pull_policy, Some(PullPolicy::Other("Sometimes".to_string())));
        assert_eq!(container.as_text(), r#"{"imagePullPolicy":"Sometimes"}"#);
    }
}
