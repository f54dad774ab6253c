use std::{collections::BTreeMap, fmt::Write};

use indenter::indented;
use serde::{Deserialize, Serialize};

use super::{impl_object, IntOrString, TypeMeta};
use crate::codec::{impl_codec, is_default, nullable};

/// Resources available on a node, e.g. `{"cpu": 4, "memory": "8Gi"}`.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct NodeResources {
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub capacity: BTreeMap<String, IntOrString>,
}

/// A worker node in the cluster.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Minion {
    #[serde(flatten)]
    pub meta: TypeMeta,
    /// Queried from the cloud provider if unset.
    #[serde(
        rename = "hostIP",
        skip_serializing_if = "is_default",
        deserialize_with = "nullable"
    )]
    pub host_ip: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<NodeResources>,
}

impl std::fmt::Display for Minion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{:<16} {}", "Name:", self.meta.id)?;
        writeln!(f, "{:<16} {}", "Host IP:", self.host_ip)?;
        if let Some(timestamp) = &self.meta.creation_timestamp {
            writeln!(f, "{:<16} {}", "Created:", timestamp)?;
        }
        let capacity = match &self.resources {
            Some(resources) if !resources.capacity.is_empty() => &resources.capacity,
            _ => return Ok(()),
        };
        writeln!(f, "Capacity:")?;
        for (name, quantity) in capacity.iter() {
            writeln!(indented(f), "{}: {}", name, quantity)?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct MinionList {
    #[serde(flatten)]
    pub meta: TypeMeta,
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub items: Vec<Minion>,
}

impl_codec!(NodeResources, Minion, MinionList);
impl_object!(Minion, MinionList);

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;
    use crate::codec::Codec;

    #[test]
    fn minion_keys() {
        let raw = json!({
            "kind": "Minion",
            "id": "10.245.2.2",
            "hostIP": "10.245.2.2",
            "resources": {"capacity": {"cpu": 1000, "memory": "3Gi"}},
        });
        let minion = Minion::decode(&raw).unwrap();
        let capacity = &minion.resources.as_ref().unwrap().capacity;
        assert_eq!(capacity["cpu"], IntOrString::Int(1000));
        assert_eq!(capacity["memory"], IntOrString::from("3Gi"));
        assert_eq!(Value::Object(minion.encode()), raw);

        let text = minion.to_string();
        assert!(text.contains("Capacity:"));
        assert!(text.contains("    memory: 3Gi"));
    }

    #[test]
    fn empty_resources() {
        let minion = Minion::decode(&json!({"id": "m", "resources": {"capacity": null}})).unwrap();
        assert_eq!(minion.resources, Some(NodeResources::default()));
        assert_eq!(minion.as_text(), r#"{"id":"m","resources":{}}"#);
        assert!(!minion.to_string().contains("Capacity"));
    }

    #[test]
    fn minion_list() {
        let list = MinionList::decode(&json!({
            "kind": "MinionList",
            "items": [{"id": "b"}, {"id": "a"}],
        }))
        .unwrap();
        assert_eq!(list.items[0].meta.id, "b");
        assert_eq!(MinionList::decode(&json!({})).unwrap(), MinionList::default());
    }
}
