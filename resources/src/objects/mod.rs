use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::codec::{impl_codec, is_default, nullable, Codec, DecodeError};

pub mod action;
pub mod binding;
pub mod container;
pub mod container_status;
pub mod event;
pub mod manifest;
pub mod node;
pub mod object_reference;
pub mod pod;
pub mod replication_controller;
pub mod service;
pub mod status;
pub mod volume;

use self::{
    binding::Binding,
    event::{Event, EventList, ServerOp, ServerOpList},
    manifest::{BoundPod, BoundPods, ContainerManifestList},
    node::{Minion, MinionList},
    pod::{Pod, PodList},
    replication_controller::{ReplicationController, ReplicationControllerList},
    service::{Endpoints, EndpointsList, Service, ServiceList},
    status::Status,
};

pub type Labels = BTreeMap<String, String>;

/// API version these objects are modelled after.
pub const API_VERSION: &str = "v1beta2";

/// Identity and versioning fields shared by every top level object.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct TypeMeta {
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub kind: String,
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub id: String,
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub uid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<Time>,
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub self_link: String,
    /// Opaque value the server uses for optimistic concurrency.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<u64>,
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub api_version: String,
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub namespace: String,
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub annotations: BTreeMap<String, String>,
}

impl TypeMeta {
    pub fn named(id: impl Into<String>) -> Self {
        TypeMeta {
            id: id.into(),
            ..TypeMeta::default()
        }
    }
}

/// Either a number or a name, e.g. a port given as `8080` or `"http"`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum IntOrString {
    Int(i64),
    String(String),
}

impl std::fmt::Display for IntOrString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntOrString::Int(value) => write!(f, "{}", value),
            IntOrString::String(value) => write!(f, "{}", value),
        }
    }
}

impl From<i64> for IntOrString {
    fn from(value: i64) -> Self {
        IntOrString::Int(value)
    }
}

impl From<&str> for IntOrString {
    fn from(value: &str) -> Self {
        IntOrString::String(value.to_owned())
    }
}

/// A point in time sent by the server. Text that isn't RFC 3339 is kept
/// as it came in and written back unchanged.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum Time {
    Parsed(DateTime<Utc>),
    Raw(String),
}

impl Time {
    pub fn datetime(&self) -> Option<&DateTime<Utc>> {
        match self {
            Time::Parsed(time) => Some(time),
            Time::Raw(_) => None,
        }
    }
}

impl std::fmt::Display for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Time::Parsed(time) => write!(f, "{}", time.to_rfc3339()),
            Time::Raw(text) => write!(f, "{}", text),
        }
    }
}

impl From<DateTime<Utc>> for Time {
    fn from(time: DateTime<Utc>) -> Self {
        Time::Parsed(time)
    }
}

/// A top level API object carrying a [`TypeMeta`] envelope.
pub trait Object: Codec {
    /// Kind name the server uses for this object.
    const KIND: &'static str;

    fn meta(&self) -> &TypeMeta;

    fn meta_mut(&mut self) -> &mut TypeMeta;

    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn id(&self) -> &String {
        &self.meta().id
    }
}

macro_rules! impl_object {
    ($($name:ident),+ $(,)?) => {
        $(
            impl $crate::objects::Object for $name {
                const KIND: &'static str = stringify!($name);

                fn meta(&self) -> &$crate::objects::TypeMeta {
                    &self.meta
                }

                fn meta_mut(&mut self) -> &mut $crate::objects::TypeMeta {
                    &mut self.meta
                }
            }
        )+
    };
}

pub(crate) use impl_object;

impl_codec!(TypeMeta);

macro_rules! kube_object {
    ($($name:ident),+ $(,)?) => {
        /// Any top level object, told apart by its `kind` key.
        #[derive(Debug, Clone, PartialEq)]
        pub enum KubeObject {
            $($name($name),)+
        }

        impl KubeObject {
            pub fn decode(raw: &Value) -> Result<Self, DecodeError> {
                let kind = match raw.get("kind") {
                    Some(Value::String(kind)) => kind.as_str(),
                    _ if raw.is_object() => "",
                    _ => {
                        return Err(DecodeError::NotAnObject {
                            kind: "KubeObject",
                            text: raw.to_string(),
                        })
                    },
                };
                $(
                    if kind == $name::KIND {
                        return Ok(KubeObject::$name($name::decode(raw)?));
                    }
                )+
                Err(DecodeError::UnknownKind(kind.to_owned()))
            }

            pub fn encode(&self) -> Map<String, Value> {
                match self {
                    $(KubeObject::$name(object) => object.encode(),)+
                }
            }

            pub fn as_text(&self) -> String {
                match self {
                    $(KubeObject::$name(object) => object.as_text(),)+
                }
            }

            pub fn kind(&self) -> &'static str {
                match self {
                    $(KubeObject::$name(_) => $name::KIND,)+
                }
            }

            pub fn meta(&self) -> &TypeMeta {
                match self {
                    $(KubeObject::$name(object) => object.meta(),)+
                }
            }
        }

        $(
            impl From<$name> for KubeObject {
                fn from(object: $name) -> Self {
                    KubeObject::$name(object)
                }
            }
        )+
    };
}

kube_object!(
    Pod,
    PodList,
    ReplicationController,
    ReplicationControllerList,
    Service,
    ServiceList,
    Endpoints,
    EndpointsList,
    Minion,
    MinionList,
    Binding,
    Event,
    EventList,
    ServerOp,
    ServerOpList,
    Status,
    BoundPod,
    BoundPods,
    ContainerManifestList,
);

impl KubeObject {
    pub fn from_json_str(text: &str) -> Result<Self, DecodeError> {
        let raw: Value = serde_json::from_str(text).map_err(|source| DecodeError::Parse {
            text: text.to_owned(),
            source,
        })?;
        Self::decode(&raw)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, DecodeError> {
        let raw: Value = serde_yaml::from_str(text).map_err(|source| DecodeError::ParseYaml {
            text: text.to_owned(),
            source,
        })?;
        Self::decode(&raw)
    }

    pub fn id(&self) -> &String {
        &self.meta().id
    }

    /// Collection path objects of this kind are created under.
    pub fn resource(&self) -> Option<&'static str> {
        resource_path(self.kind())
    }
}

/// Collection path of a kind or list kind, e.g. `Pod` and `PodList` map
/// to `pods`.
pub fn resource_path(kind: &str) -> Option<&'static str> {
    let path = match kind.strip_suffix("List").unwrap_or(kind) {
        "Pod" => "pods",
        "ReplicationController" => "replicationControllers",
        "Service" => "services",
        "Endpoints" => "endpoints",
        "Minion" => "minions",
        "Binding" => "bindings",
        "Event" => "events",
        "ServerOp" => "operations",
        _ => return None,
    };
    Some(path)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    #[test]
    fn type_meta_keys() {
        let raw = json!({
            "kind": "Pod",
            "id": "redis-master",
            "uid": "8a5c3f4e",
            "creationTimestamp": "2014-10-21T15:00:00Z",
            "selfLink": "/api/v1beta2/pods/redis-master",
            "resourceVersion": 12,
            "apiVersion": "v1beta2",
            "namespace": "default",
            "annotations": {"owner": "ops"},
        });
        let meta = TypeMeta::decode(&raw).unwrap();
        assert_eq!(meta.kind, "Pod");
        assert_eq!(meta.id, "redis-master");
        assert_eq!(meta.resource_version, Some(12));
        assert_eq!(meta.annotations.get("owner").unwrap(), "ops");
        assert_eq!(Value::Object(meta.encode()), raw);
    }

    #[test]
    fn null_fields_read_as_absent() {
        let meta = TypeMeta::decode(&json!({"id": null, "annotations": null})).unwrap();
        assert_eq!(meta, TypeMeta::default());
    }

    #[test]
    fn dispatch_on_kind() {
        let object = KubeObject::decode(&json!({"kind": "Service", "id": "frontend", "port": 80}))
            .unwrap();
        assert_eq!(object.kind(), "Service");
        assert_eq!(object.id(), "frontend");
        match object {
            KubeObject::Service(service) => assert_eq!(service.port, Some(80)),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn unknown_kind() {
        let err = KubeObject::decode(&json!({"kind": "Deployment"})).unwrap_err();
        assert!(matches!(err, DecodeError::UnknownKind(kind) if kind == "Deployment"));
        let err = KubeObject::decode(&json!({})).unwrap_err();
        assert!(matches!(err, DecodeError::UnknownKind(kind) if kind.is_empty()));
    }

    #[test]
    fn different_kinds_never_equal() {
        let pod = KubeObject::from(Pod {
            meta: TypeMeta::named("a"),
            ..Pod::default()
        });
        let service = KubeObject::from(Service {
            meta: TypeMeta::named("a"),
            ..Service::default()
        });
        assert_ne!(pod, service);
        assert_eq!(pod, pod.clone());
    }

    #[test]
    fn resource_paths() {
        assert_eq!(resource_path("Pod"), Some("pods"));
        assert_eq!(resource_path("ReplicationControllerList"), Some("replicationControllers"));
        assert_eq!(resource_path("Status"), None);
        let object = KubeObject::from(Endpoints::default());
        assert_eq!(object.resource(), Some("endpoints"));
    }

    #[test]
    fn loose_timestamps() {
        let meta = TypeMeta::decode(&json!({"creationTimestamp": "2014-10-21T15:00:00Z"})).unwrap();
        let time = meta.creation_timestamp.as_ref().and_then(Time::datetime);
        assert_eq!(time, Utc.with_ymd_and_hms(2014, 10, 21, 15, 0, 0).single().as_ref());

        let raw = json!({"id": "web", "creationTimestamp": "2014-10-21 15:00:00"});
        let meta = TypeMeta::decode(&raw).unwrap();
        assert_eq!(meta.creation_timestamp, Some(Time::Raw("2014-10-21 15:00:00".to_string())));
        assert_eq!(meta.creation_timestamp.as_ref().and_then(Time::datetime), None);
        assert_eq!(Value::Object(meta.encode()), raw);
    }

    #[test]
    fn int_or_string() {
        let port: IntOrString = serde_json::from_value(json!(8080)).unwrap();
        assert_eq!(port, IntOrString::Int(8080));
        let port: IntOrString = serde_json::from_value(json!("http")).unwrap();
        assert_eq!(port.to_string(), "http");
    }
}
