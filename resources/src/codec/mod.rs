//! Uniform JSON codec shared by every object in [`crate::objects`].
//!
//! Decoding is lenient: every key is optional, unknown keys are ignored and
//! `null` is read as "absent". Encoding drops empty strings, empty
//! collections, `false` and unset optionals, so an all-default value encodes
//! to `{}`.

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

mod one_of;

pub use one_of::{first_match, OneOf};
pub(crate) use one_of::one_of;

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The value handed to `decode` was not a JSON object.
    #[error("expected a JSON object for {kind}, got [{text}]")]
    NotAnObject { kind: &'static str, text: String },
    /// The text could not be parsed as JSON at all.
    #[error("parsing error [{text}]")]
    Parse {
        text: String,
        #[source]
        source: serde_json::Error,
    },
    /// The text could not be parsed as YAML at all.
    #[error("parsing error [{text}]")]
    ParseYaml {
        text: String,
        #[source]
        source: serde_yaml::Error,
    },
    /// A known key carried a value of the wrong JSON type.
    #[error("malformed {kind} [{text}]: {source}")]
    Malformed {
        kind: &'static str,
        text: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("unknown object kind '{0}'")]
    UnknownKind(String),
}

impl DecodeError {
    /// The raw text that failed to decode, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            DecodeError::NotAnObject { text, .. }
            | DecodeError::Parse { text, .. }
            | DecodeError::ParseYaml { text, .. }
            | DecodeError::Malformed { text, .. } => Some(text),
            DecodeError::UnknownKind(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, DecodeError>;

/// decode / encode / as_text for one wire record.
pub trait Codec: Serialize + DeserializeOwned {
    /// Type name used in error messages.
    const NAME: &'static str;

    /// Build a value from an already parsed JSON object.
    fn decode(raw: &Value) -> Result<Self> {
        if !raw.is_object() {
            return Err(DecodeError::NotAnObject {
                kind: Self::NAME,
                text: raw.to_string(),
            });
        }
        Self::deserialize(raw).map_err(|source| {
            tracing::debug!("Failed to decode {}: {}", Self::NAME, source);
            DecodeError::Malformed {
                kind: Self::NAME,
                text: raw.to_string(),
                source,
            }
        })
    }

    /// Project the value to a JSON object, leaving out empty fields.
    fn encode(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                tracing::error!("{} encoded to a non-object value: {}", Self::NAME, other);
                Map::new()
            },
            Err(err) => {
                tracing::error!("Failed to encode {}: {}", Self::NAME, err);
                Map::new()
            },
        }
    }

    /// Canonical JSON text with keys sorted at every level.
    fn as_text(&self) -> String {
        canonical(Value::Object(self.encode())).to_string()
    }

    fn from_json_str(text: &str) -> Result<Self> {
        let raw: Value = serde_json::from_str(text).map_err(|source| DecodeError::Parse {
            text: text.to_owned(),
            source,
        })?;
        Self::decode(&raw)
    }

    fn from_yaml_str(text: &str) -> Result<Self> {
        let raw: Value = serde_yaml::from_str(text).map_err(|source| DecodeError::ParseYaml {
            text: text.to_owned(),
            source,
        })?;
        Self::decode(&raw)
    }
}

/// Rebuild every object with its keys in sorted order.
pub fn canonical(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, canonical(value)))
                    .collect(),
            )
        },
        Value::Array(items) => Value::Array(items.into_iter().map(canonical).collect()),
        other => other,
    }
}

pub(crate) fn is_default<T: Default + PartialEq>(v: &T) -> bool {
    *v == T::default()
}

/// Read `null` the same way as a missing key.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

macro_rules! impl_codec {
    ($($name:ident),+ $(,)?) => {
        $(
            impl $crate::codec::Codec for $name {
                const NAME: &'static str = stringify!($name);
            }
        )+
    };
}

pub(crate) use impl_codec;
