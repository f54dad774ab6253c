use serde::{Deserialize, Serialize};

use super::{container::Container, impl_object, pod::RestartPolicy, volume::Volume, TypeMeta};
use crate::codec::{first_match, impl_codec, is_default, nullable};

/// The deprecated container list format superseded by [`PodSpec`].
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ContainerManifest {
    /// Required: This must be a supported version string, such as "v1beta1".
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub version: String,
    /// Required: This must be a DNS_SUBDOMAIN.
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub id: String,
    /// Identifies the pod instance this manifest belongs to.
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub uuid: String,
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub volumes: Vec<Volume>,
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub containers: Vec<Container>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "first_match")]
    pub restart_policy: Option<RestartPolicy>,
}

impl ContainerManifest {
    pub fn container(&self, name: &str) -> Option<&Container> {
        self.containers
            .iter()
            .find(|container| container.name == name)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ContainerManifestList {
    #[serde(flatten)]
    pub meta: TypeMeta,
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub items: Vec<ContainerManifest>,
}

/// A description of a pod.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PodSpec {
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub volumes: Vec<Volume>,
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub containers: Vec<Container>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "first_match")]
    pub restart_policy: Option<RestartPolicy>,
}

impl From<ContainerManifest> for PodSpec {
    fn from(manifest: ContainerManifest) -> Self {
        PodSpec {
            volumes: manifest.volumes,
            containers: manifest.containers,
            restart_policy: manifest.restart_policy,
        }
    }
}

/// A collection of containers that should be run on a host. A BoundPod
/// is the logical representation of a pod as it is used by a kubelet.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct BoundPod {
    #[serde(flatten)]
    pub meta: TypeMeta,
    /// Spec defines the behavior of a pod.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spec: Option<PodSpec>,
}

/// A collection of Pods bound to a host.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct BoundPods {
    #[serde(flatten)]
    pub meta: TypeMeta,
    /// Host is the name of a node that these pods were bound to.
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub host: String,
    /// Items is the list of all pods bound to a given host.
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub items: Vec<BoundPod>,
}

impl_codec!(ContainerManifest, ContainerManifestList, PodSpec, BoundPod, BoundPods);
impl_object!(ContainerManifestList, BoundPod, BoundPods);
