use serde::{Deserialize, Serialize};

use super::{impl_object, object_reference::ObjectReference, Time, TypeMeta};
use crate::codec::{impl_codec, is_default, nullable};

/// A report of an event somewhere in the cluster.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Event {
    #[serde(flatten)]
    pub meta: TypeMeta,
    /// The object this event is about.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub involved_object: Option<ObjectReference>,
    /// Short, machine understandable string that describes the current
    /// status of the referred object, e.g. "Running".
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub status: String,
    /// Why the object has this status, in CamelCase.
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub reason: String,
    /// A human-readable description of the status of this operation.
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub message: String,
    /// The component reporting this event, e.g. "kubelet".
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub source: String,
    /// The time at which the event was first recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Time>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct EventList {
    #[serde(flatten)]
    pub meta: TypeMeta,
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub items: Vec<Event>,
}

/// An operation in progress on the server.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ServerOp {
    #[serde(flatten)]
    pub meta: TypeMeta,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ServerOpList {
    #[serde(flatten)]
    pub meta: TypeMeta,
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub items: Vec<ServerOp>,
}

impl_codec!(Event, EventList, ServerOp, ServerOpList);
impl_object!(Event, EventList, ServerOp, ServerOpList);

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::{json, Value};

    use super::*;
    use crate::codec::Codec;

    #[test]
    fn event_keys() {
        let raw = json!({
            "kind": "Event",
            "id": "redis-master.started",
            "involvedObject": {"kind": "Pod", "name": "redis-master", "fieldPath": "spec.containers[0]"},
            "status": "running",
            "reason": "started",
            "message": "Started container redis",
            "source": "kubelet",
            "timestamp": "2014-10-21T15:00:00Z",
        });
        let event = Event::decode(&raw).unwrap();
        assert_eq!(event.involved_object.as_ref().unwrap().name, "redis-master");
        assert_eq!(event.source, "kubelet");
        assert_eq!(
            event.timestamp,
            Utc.with_ymd_and_hms(2014, 10, 21, 15, 0, 0).single().map(Time::from)
        );
        assert_eq!(Value::Object(event.encode()), raw);
    }

    #[test]
    fn server_op_is_envelope_only() {
        let op = ServerOp::decode(&json!({"kind": "ServerOp", "id": "op-1", "status": "x"})).unwrap();
        assert_eq!(op.as_text(), r#"{"id":"op-1","kind":"ServerOp"}"#);
        let list = ServerOpList::decode(&json!({"items": [{"id": "op-1"}, {"id": "op-2"}]})).unwrap();
        assert_eq!(list.items[1].meta.id, "op-2");
    }

    #[test]
    fn defaults() {
        assert_eq!(Event::decode(&json!({})).unwrap(), Event::default());
        assert_eq!(EventList::default().as_text(), "{}");
    }
}
