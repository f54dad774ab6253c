use serde::{
    de::Error as _,
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};
use serde_json::{Map, Value};

use super::IntOrString;
use crate::codec::{impl_codec, is_default, nullable, one_of, OneOf};

/// An environment variable present in a container.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct EnvVar {
    /// Required: this must be a C_IDENTIFIER.
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub name: String,
    /// Optional: defaults to "".
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub value: String,
}

impl EnvVar {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        EnvVar {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// An action based on HTTP GET requests.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct HTTPGetAction {
    /// Path to access on the HTTP server.
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub path: String,
    /// Name or number of the port to access on the container.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<IntOrString>,
    /// Host name to connect to, defaults to the pod IP.
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub host: String,
}

/// An action based on opening a socket.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct TCPSocketAction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<IntOrString>,
}

/// A "run in container" action.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ExecAction {
    /// Command line to execute inside the container. The working directory
    /// is root ('/') in the container's filesystem. It is exec'd, not run
    /// inside a shell.
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub command: Vec<String>,
}

one_of! {
    /// What a liveness probe does to check the container.
    pub enum ProbeAction {
        "httpGet" => HTTPGet(HTTPGetAction),
        "tcpSocket" => TCPSocket(TCPSocketAction),
        "exec" => Exec(ExecAction),
    }
}

/// A liveness probe examined against a container.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LivenessProbe {
    pub action: Option<ProbeAction>,
    /// Length of time before health checking is activated. In seconds.
    pub initial_delay_seconds: Option<i64>,
}

const INITIAL_DELAY_SECONDS: &str = "initialDelaySeconds";

impl Serialize for LivenessProbe {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = usize::from(self.action.is_some()) + usize::from(self.initial_delay_seconds.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        if let Some(action) = &self.action {
            match action {
                ProbeAction::HTTPGet(branch) => map.serialize_entry(action.branch(), branch)?,
                ProbeAction::TCPSocket(branch) => map.serialize_entry(action.branch(), branch)?,
                ProbeAction::Exec(branch) => map.serialize_entry(action.branch(), branch)?,
            }
        }
        if let Some(delay) = self.initial_delay_seconds {
            map.serialize_entry(INITIAL_DELAY_SECONDS, &delay)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for LivenessProbe {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut raw = Map::<String, Value>::deserialize(deserializer)?;
        let initial_delay_seconds = match raw.remove(INITIAL_DELAY_SECONDS) {
            Some(delay) => serde_json::from_value(delay).map_err(D::Error::custom)?,
            None => None,
        };
        let action = ProbeAction::probe(&mut raw).map_err(D::Error::custom)?;
        Ok(LivenessProbe {
            action,
            initial_delay_seconds,
        })
    }
}

impl_codec!(EnvVar, HTTPGetAction, TCPSocketAction, ExecAction, LivenessProbe);
