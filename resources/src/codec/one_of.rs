use serde::{de::Error as _, Deserialize, Deserializer};
use serde_json::{Map, Value};

/// A record that holds exactly one of several branches, each under its own
/// wire key, e.g. `{"hostDir": {...}}` or `{"emptyDir": {}}`.
pub trait OneOf: Sized {
    /// Branch keys in the order they are probed on decode.
    const BRANCHES: &'static [&'static str];

    fn decode_branch(key: &str, raw: Value) -> serde_json::Result<Self>;

    /// Wire key of the populated branch.
    fn branch(&self) -> &'static str;

    /// Take the first branch present in `raw`. Keys holding `null` count as
    /// missing. `Ok(None)` when no branch key is present.
    fn probe(raw: &mut Map<String, Value>) -> serde_json::Result<Option<Self>> {
        for key in Self::BRANCHES {
            match raw.remove(*key) {
                None | Some(Value::Null) => continue,
                Some(branch) => return Self::decode_branch(key, branch).map(Some),
            }
        }
        Ok(None)
    }
}

/// `deserialize_with` helper for `Option<T: OneOf>` fields: an object with no
/// recognised branch decodes to `None` instead of failing.
pub fn first_match<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: OneOf,
{
    let mut raw = match Option::<Map<String, Value>>::deserialize(deserializer)? {
        Some(raw) => raw,
        None => return Ok(None),
    };
    T::probe(&mut raw).map_err(D::Error::custom)
}

/// Declare a [`OneOf`] enum together with its serde impls.
///
/// Branches are listed as `"wireKey" => Variant(Payload)` in decode order.
/// Encoding writes a single-entry object keyed by the populated branch.
macro_rules! one_of {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $key:literal => $variant:ident($branch:ty)
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant($branch),
            )+
        }

        impl $crate::codec::OneOf for $name {
            const BRANCHES: &'static [&'static str] = &[$($key),+];

            fn decode_branch(key: &str, raw: serde_json::Value) -> serde_json::Result<Self> {
                match key {
                    $($key => serde_json::from_value(raw).map($name::$variant),)+
                    other => Err(<serde_json::Error as serde::de::Error>::custom(
                        format!("unknown {} branch `{}`", stringify!($name), other),
                    )),
                }
            }

            fn branch(&self) -> &'static str {
                match self {
                    $($name::$variant(..) => $key,)+
                }
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                use serde::ser::SerializeMap;

                let mut map = serializer.serialize_map(Some(1))?;
                match self {
                    $($name::$variant(branch) => map.serialize_entry($key, branch)?,)+
                }
                map.end()
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let mut raw = <serde_json::Map<String, serde_json::Value> as serde::Deserialize>::deserialize(deserializer)?;
                <Self as $crate::codec::OneOf>::probe(&mut raw)
                    .map_err(<D::Error as serde::de::Error>::custom)?
                    .ok_or_else(|| {
                        <D::Error as serde::de::Error>::custom(format!(
                            "expected one of {:?}",
                            <Self as $crate::codec::OneOf>::BRANCHES
                        ))
                    })
            }
        }
    };
}

pub(crate) use one_of;
