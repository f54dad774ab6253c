use std::{collections::BTreeMap, fmt::Write};

use indenter::indented;
use serde::{Deserialize, Serialize};

use super::{
    container_status::{ContainerStatus, PodStatus},
    impl_object,
    manifest::ContainerManifest,
    Labels, TypeMeta,
};
use crate::{
    codec::{impl_codec, is_default, nullable, one_of},
    utils::fmt_labels,
};

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct RestartPolicyAlways {}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct RestartPolicyOnFailure {}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct RestartPolicyNever {}

one_of! {
    /// How the containers of a pod are restarted when they exit.
    pub enum RestartPolicy {
        "always" => Always(RestartPolicyAlways),
        "onFailure" => OnFailure(RestartPolicyOnFailure),
        "never" => Never(RestartPolicyNever),
    }
}

impl Default for RestartPolicy {
    fn default() -> Self {
        RestartPolicy::Always(RestartPolicyAlways {})
    }
}

impl std::fmt::Display for RestartPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RestartPolicy::Always(_) => write!(f, "Always"),
            RestartPolicy::OnFailure(_) => write!(f, "OnFailure"),
            RestartPolicy::Never(_) => write!(f, "Never"),
        }
    }
}

/// The state of a pod, used as either input (desired state)
/// or output (current state).
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PodState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest: Option<ContainerManifest>,
    /// One of Waiting, Running or Terminated, see [`PodStatus`].
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub status: String,
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub host: String,
    #[serde(
        rename = "hostIP",
        skip_serializing_if = "is_default",
        deserialize_with = "nullable"
    )]
    pub host_ip: String,
    #[serde(
        rename = "podIP",
        skip_serializing_if = "is_default",
        deserialize_with = "nullable"
    )]
    pub pod_ip: String,
    /// The key of this map is the *name* of the container within the manifest.
    /// It has one entry per container in the manifest. The value of this map
    /// is currently the output of `docker inspect`.
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub info: BTreeMap<String, ContainerStatus>,
}

impl PodState {
    /// The status string as a [`PodStatus`], `None` if empty or unknown.
    pub fn phase(&self) -> Option<PodStatus> {
        self.status.parse().ok()
    }

    /// Images of the manifest's containers, in order.
    pub fn images(&self) -> Vec<&str> {
        self.manifest
            .iter()
            .flat_map(|manifest| manifest.containers.iter())
            .map(|container| container.image.as_str())
            .collect()
    }
}

/// A collection of containers, used as either input (create, update)
/// or output (list, get).
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Pod {
    #[serde(flatten)]
    pub meta: TypeMeta,
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub labels: Labels,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desired_state: Option<PodState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_state: Option<PodState>,
}

impl Pod {
    pub fn host(&self) -> Option<&str> {
        self.current_state
            .as_ref()
            .map(|state| state.host.as_str())
            .filter(|host| !host.is_empty())
    }

    pub fn phase(&self) -> Option<PodStatus> {
        self.current_state.as_ref().and_then(PodState::phase)
    }

    pub fn images(&self) -> Vec<&str> {
        self.desired_state
            .as_ref()
            .map(PodState::images)
            .unwrap_or_default()
    }
}

impl std::fmt::Display for Pod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{:<16} {}", "Name:", self.meta.id)?;
        writeln!(f, "{:<16} {}", "Labels:", fmt_labels(&self.labels))?;
        if let Some(timestamp) = &self.meta.creation_timestamp {
            writeln!(f, "{:<16} {}", "Created:", timestamp)?;
        }
        writeln!(f, "{:<16} {}", "Image(s):", self.images().join(","))?;
        let state = match &self.current_state {
            Some(state) => state,
            None => return Ok(()),
        };
        writeln!(f, "{:<16} {}/{}", "Host:", state.host, state.host_ip)?;
        writeln!(f, "{:<16} {}", "Status:", state.status)?;
        writeln!(f, "{:<16} {}", "Pod IP:", state.pod_ip)?;
        if state.info.is_empty() {
            return Ok(());
        }
        writeln!(f, "Containers:")?;
        for (name, status) in state.info.iter() {
            let restarts = status.restart_count.unwrap_or_default();
            writeln!(indented(f), "{}: {} ({} restarts)", name, status.image, restarts)?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct PodList {
    #[serde(flatten)]
    pub meta: TypeMeta,
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub items: Vec<Pod>,
}

/// Holds the information used for creating pods.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PodTemplate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desired_state: Option<PodState>,
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub labels: Labels,
}

impl_codec!(
    RestartPolicyAlways,
    RestartPolicyOnFailure,
    RestartPolicyNever,
    PodState,
    Pod,
    PodList,
    PodTemplate,
);
impl_object!(Pod, PodList);

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;
    use crate::{
        codec::Codec,
        objects::{container::Container, volume::Port},
    };

    #[test]
    fn restart_policy_markers_are_equal() {
        assert_eq!(RestartPolicyAlways {}, RestartPolicyAlways::default());
        assert_eq!(RestartPolicy::default().to_string(), "Always");
        assert_ne!(
            RestartPolicy::Never(RestartPolicyNever {}),
            RestartPolicy::OnFailure(RestartPolicyOnFailure {})
        );
    }

    #[test]
    fn restart_policy_probe_order() {
        let state = PodState::decode(&json!({"manifest": {
            "restartPolicy": {"never": {}, "onFailure": {}},
        }}))
        .unwrap();
        assert_eq!(
            state.manifest.unwrap().restart_policy,
            Some(RestartPolicy::OnFailure(RestartPolicyOnFailure {}))
        );

        let state = PodState::decode(&json!({"manifest": {"restartPolicy": {}}})).unwrap();
        assert_eq!(state.manifest.unwrap().restart_policy, None);
    }

    #[test]
    fn decode_pod() {
        let pod = Pod::decode(&json!({
            "id": "pod1",
            "labels": {"name": "redis"},
            "desiredState": {"manifest": {
                "version": "v1beta1",
                "id": "pod1",
                "containers": [{
                    "name": "redis",
                    "image": "redis:latest",
                    "ports": [{"containerPort": 6379}],
                }],
            }},
        }))
        .unwrap();
        assert_eq!(pod.meta.id, "pod1");
        assert_eq!(pod.labels.get("name").unwrap(), "redis");
        let manifest = pod.desired_state.as_ref().unwrap().manifest.as_ref().unwrap();
        assert_eq!(manifest.containers[0].name, "redis");
        assert_eq!(manifest.containers[0].ports[0], Port::container(6379));
        assert_eq!(pod.current_state, None);
        assert_eq!(pod.host(), None);
        assert_eq!(pod.images(), ["redis:latest"]);
        assert!(Pod::default().images().is_empty());
    }

    #[test]
    fn current_state() {
        let pod = Pod::decode(&json!({
            "id": "pod1",
            "currentState": {
                "status": "Running",
                "host": "minion-2",
                "hostIP": "10.245.2.3",
                "podIP": "10.244.2.5",
                "info": {
                    "redis": {"state": {"running": {}}, "restartCount": 1, "image": "redis"},
                    "net": {"state": {"waiting": {}}},
                },
            },
        }))
        .unwrap();
        assert_eq!(pod.phase(), Some(PodStatus::Running));
        assert_eq!(pod.host(), Some("minion-2"));
        let state = pod.current_state.as_ref().unwrap();
        assert_eq!(state.host_ip, "10.245.2.3");
        assert!(state.info["redis"].is_running());
        assert!(!state.info["net"].is_running());
        let text = pod.to_string();
        assert!(text.contains("minion-2/10.245.2.3"));
        assert!(text.contains("redis: redis (1 restarts)"));
    }

    #[test]
    fn empty_state_is_still_encoded() {
        let pod = Pod {
            meta: TypeMeta::named("web"),
            desired_state: Some(PodState::default()),
            ..Pod::default()
        };
        assert_eq!(Value::Object(pod.encode()), json!({"id": "web", "desiredState": {}}));
        assert_eq!(Pod::default().as_text(), "{}");
    }

    #[test]
    fn pod_list_keeps_order() {
        let raw = json!({
            "kind": "PodList",
            "items": [{"id": "c"}, {"id": "a"}, {"id": "b"}],
        });
        let list = PodList::decode(&raw).unwrap();
        let ids: Vec<&String> = list.items.iter().map(|pod| &pod.meta.id).collect();
        assert_eq!(ids, ["c", "a", "b"]);
        for (item, raw) in list.items.iter().zip(raw["items"].as_array().unwrap()) {
            assert_eq!(item, &Pod::decode(raw).unwrap());
        }
        assert_eq!(Value::Object(list.encode()), raw);
    }

    #[test]
    fn equality_is_structural() {
        let build = || Pod {
            meta: TypeMeta::named("web"),
            labels: Labels::from([("app".to_string(), "web".to_string())]),
            desired_state: Some(PodState {
                manifest: Some(ContainerManifest {
                    containers: vec![Container::new("web", "nginx")],
                    ..ContainerManifest::default()
                }),
                ..PodState::default()
            }),
            ..Pod::default()
        };
        assert_eq!(build(), build());
        let mut changed = build();
        changed.meta.namespace = "prod".to_string();
        assert_ne!(build(), changed);
        let mut changed = build();
        changed.labels.clear();
        assert_ne!(build(), changed);
    }

    #[test]
    fn template() {
        let template = PodTemplate::decode(&json!({
            "desiredState": {"manifest": {"containers": [{"name": "web", "image": "nginx"}]}},
            "labels": {"app": "web"},
        }))
        .unwrap();
        assert_eq!(template.labels["app"], "web");
        assert_eq!(PodTemplate::decode(&json!({})).unwrap(), PodTemplate::default());
    }
}
