use serde::{Deserialize, Serialize};

use super::Object;
use crate::codec::{impl_codec, is_default, nullable};

/// Enough information to let you inspect or modify the referred object.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ObjectReference {
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub kind: String,
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub namespace: String,
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub name: String,
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub uid: String,
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub api_version: String,
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub resource_version: String,
    /// If referring to a piece of an object instead of an entire object,
    /// this string should contain a valid field access statement, such as
    /// `desiredState.manifest.containers[2]`.
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub field_path: String,
}

impl ObjectReference {
    /// A reference to the whole of `object`.
    pub fn to<T: Object>(object: &T) -> Self {
        let meta = object.meta();
        ObjectReference {
            kind: T::KIND.to_owned(),
            namespace: meta.namespace.clone(),
            name: meta.id.clone(),
            uid: meta.uid.clone(),
            api_version: meta.api_version.clone(),
            resource_version: meta
                .resource_version
                .map(|version| version.to_string())
                .unwrap_or_default(),
            field_path: String::new(),
        }
    }
}

impl_codec!(ObjectReference);
