use serde::{Deserialize, Serialize};

use super::{
    impl_object,
    pod::{PodState, PodTemplate},
    Labels, TypeMeta,
};
use crate::{
    codec::{impl_codec, is_default, nullable},
    utils::{fmt_labels, selector_match},
};

/// The state of a replication controller, either input (create, update)
/// or output (list, get).
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ReplicationControllerState {
    /// Number of pods to keep running. `Some(0)` scales the controller down.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i64>,
    /// Label query over the pods this controller owns.
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub replica_selector: Labels,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pod_template: Option<PodTemplate>,
}

/// Ensures that a number of pod replicas are running at any given time.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ReplicationController {
    #[serde(flatten)]
    pub meta: TypeMeta,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desired_state: Option<ReplicationControllerState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_state: Option<ReplicationControllerState>,
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub labels: Labels,
}

impl ReplicationController {
    /// Whether a pod carrying `labels` is owned by this controller.
    pub fn selects(&self, labels: &Labels) -> bool {
        self.desired_state
            .as_ref()
            .map_or(false, |state| selector_match(&state.replica_selector, labels))
    }

    /// Images of the pod template's containers.
    pub fn images(&self) -> Vec<&str> {
        self.desired_state
            .as_ref()
            .and_then(|state| state.pod_template.as_ref())
            .and_then(|template| template.desired_state.as_ref())
            .map(PodState::images)
            .unwrap_or_default()
    }
}

impl std::fmt::Display for ReplicationController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{:<16} {}", "Name:", self.meta.id)?;
        let desired = self.desired_state.clone().unwrap_or_default();
        writeln!(f, "{:<16} {}", "Selector:", fmt_labels(&desired.replica_selector))?;
        writeln!(f, "{:<16} {}", "Labels:", fmt_labels(&self.labels))?;
        let current = self
            .current_state
            .as_ref()
            .and_then(|state| state.replicas)
            .unwrap_or_default();
        writeln!(
            f,
            "{:<16} {} current / {} desired",
            "Replicas:",
            current,
            desired.replicas.unwrap_or_default()
        )
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ReplicationControllerList {
    #[serde(flatten)]
    pub meta: TypeMeta,
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub items: Vec<ReplicationController>,
}

impl_codec!(ReplicationControllerState, ReplicationController, ReplicationControllerList);
impl_object!(ReplicationController, ReplicationControllerList);
