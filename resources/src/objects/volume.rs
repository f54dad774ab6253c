use serde::{Deserialize, Serialize};

use crate::codec::{first_match, impl_codec, is_default, nullable, one_of};

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Volume {
    /// Volume's name.
    /// Must be a DNS_LABEL and unique within the pod.
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub name: String,
    /// Where the volume comes from. If not specified, the volume
    /// is an EmptyDir.
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "first_match")]
    pub source: Option<VolumeSource>,
}

impl Volume {
    /// The declared source, falling back to an EmptyDir for volumes that
    /// don't specify one.
    pub fn source_or_default(&self) -> VolumeSource {
        self.source
            .clone()
            .unwrap_or(VolumeSource::EmptyDir(EmptyDir {}))
    }
}

one_of! {
    /// Exactly one location a volume is backed by.
    pub enum VolumeSource {
        /// A pre-existing directory on the host machine that is directly
        /// exposed to the container.
        "hostDir" => HostDir(HostDir),
        /// A temporary directory that shares a pod's lifetime.
        "emptyDir" => EmptyDir(EmptyDir),
        /// A GCE disk resource attached to the host machine and then exposed
        /// to the pod.
        "persistentDisk" => GCEPersistentDisk(GCEPersistentDisk),
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct HostDir {
    /// Path of the directory on the host.
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub path: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct EmptyDir {}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct GCEPersistentDisk {
    /// Unique name of the PD resource.
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub pd_name: String,
    /// Required: Filesystem type to mount.
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub fs_type: String,
    /// Optional: Partition on the disk to mount.
    /// If omitted, kubelet will attempt to mount the device name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partition: Option<i64>,
    /// Optional: Defaults to false (read/write).
    /// Written as `readOnly`, `readonly` is accepted when reading.
    #[serde(
        skip_serializing_if = "is_default",
        deserialize_with = "nullable",
        alias = "readonly"
    )]
    pub read_only: bool,
}

/// Network protocols supported for things like container ports.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(from = "String", into = "String")]
pub enum Protocol {
    #[default]
    TCP,
    UDP,
    /// A protocol name this client doesn't know, kept verbatim.
    Other(String),
}

impl Protocol {
    pub fn as_str(&self) -> &str {
        match self {
            Protocol::TCP => "TCP",
            Protocol::UDP => "UDP",
            Protocol::Other(name) => name,
        }
    }
}

impl From<String> for Protocol {
    fn from(name: String) -> Self {
        match name.as_str() {
            "TCP" => Protocol::TCP,
            "UDP" => Protocol::UDP,
            _ => Protocol::Other(name),
        }
    }
}

impl From<Protocol> for String {
    fn from(protocol: Protocol) -> Self {
        match protocol {
            Protocol::Other(name) => name,
            known => known.as_str().to_owned(),
        }
    }
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Port {
    /// Optional: If specified, this must be a DNS_LABEL. Each named port
    /// in a pod must have a unique name.
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub name: String,
    /// Optional: If specified, this must be a valid port number, 0 < x < 65536.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_port: Option<i64>,
    /// Required: This must be a valid port number, 0 < x < 65536.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_port: Option<i64>,
    /// Optional: Defaults to "TCP".
    #[serde(deserialize_with = "nullable")]
    pub protocol: Protocol,
    /// Optional: What host IP to bind the external port to.
    #[serde(
        rename = "hostIP",
        skip_serializing_if = "is_default",
        deserialize_with = "nullable"
    )]
    pub host_ip: String,
}

impl Port {
    pub fn container(port: i64) -> Self {
        Port {
            container_port: Some(port),
            ..Port::default()
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct VolumeMount {
    /// Required: This must match the Name of a Volume.
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub name: String,
    /// Optional: Defaults to false (read-write).
    /// Written as `readOnly`, `readonly` is accepted when reading.
    #[serde(
        skip_serializing_if = "is_default",
        deserialize_with = "nullable",
        alias = "readonly"
    )]
    pub read_only: bool,
    /// Required.
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub mount_path: String,
}

impl_codec!(Volume, HostDir, EmptyDir, GCEPersistentDisk, Port, VolumeMount);
