use serde::{Deserialize, Serialize};

use super::{impl_object, TypeMeta};
use crate::codec::{impl_codec, is_default, nullable};

/// Written to the server to bind a pod to a host.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Binding {
    #[serde(flatten)]
    pub meta: TypeMeta,
    /// Written as `podID`, the misspelled `postID` is accepted when reading.
    #[serde(
        rename = "podID",
        alias = "postID",
        skip_serializing_if = "is_default",
        deserialize_with = "nullable"
    )]
    pub pod_id: String,
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub host: String,
}

impl Binding {
    pub fn new(pod_id: impl Into<String>, host: impl Into<String>) -> Self {
        Binding {
            pod_id: pod_id.into(),
            host: host.into(),
            ..Binding::default()
        }
    }
}

impl_codec!(Binding);
impl_object!(Binding);
