use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use chrono_humanize::{Accuracy, HumanTime, Tense};
use resources::{
    client::Api,
    codec::canonical,
    objects::{
        event::Event,
        node::Minion,
        pod::Pod,
        replication_controller::ReplicationController,
        service::{Endpoints, Service},
        KubeObject,
    },
};
use serde_json::Value;

use crate::ResourceKind;

/// Fetch one object by name, or every object of `kind`.
pub fn fetch(api: &Api, kind: ResourceKind, name: Option<&str>) -> Result<Vec<KubeObject>> {
    let objects = match name {
        Some(name) => {
            let path = format!("{}/{}", kind, name);
            let object: KubeObject = match kind {
                ResourceKind::Pods => api.get::<Pod>(&path)?.into(),
                ResourceKind::ReplicationControllers => {
                    api.get::<ReplicationController>(&path)?.into()
                },
                ResourceKind::Services => api.get::<Service>(&path)?.into(),
                ResourceKind::Endpoints => api.get::<Endpoints>(&path)?.into(),
                ResourceKind::Minions => api.get::<Minion>(&path)?.into(),
                ResourceKind::Events => api.get::<Event>(&path)?.into(),
            };
            vec![object]
        },
        None => match kind {
            ResourceKind::Pods => into_objects(api.get_pods()?.items),
            ResourceKind::ReplicationControllers => {
                into_objects(api.get_replication_controllers()?.items)
            },
            ResourceKind::Services => into_objects(api.get_services()?.items),
            ResourceKind::Endpoints => into_objects(api.get_endpoints()?.items),
            ResourceKind::Minions => into_objects(api.get_minions()?.items),
            ResourceKind::Events => into_objects(api.get_events()?.items),
        },
    };
    Ok(objects)
}

fn into_objects<T: Into<KubeObject>>(items: Vec<T>) -> Vec<KubeObject> {
    items.into_iter().map(Into::into).collect()
}

/// Pretty JSON with sorted keys.
pub fn to_json(object: &KubeObject) -> Result<String> {
    serde_json::to_string_pretty(&canonical(Value::Object(object.encode())))
        .with_context(|| format!("Failed to print {}", object.id()))
}

/// Rough age such as "5 minutes", "<unknown>" without a timestamp.
pub fn age(timestamp: Option<&DateTime<Utc>>, now: DateTime<Utc>) -> String {
    match timestamp {
        Some(timestamp) => HumanTime::from(now - *timestamp).to_text_en(Accuracy::Rough, Tense::Present),
        None => "<unknown>".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use resources::objects::TypeMeta;

    use super::*;

    #[test]
    fn ages() {
        let now = Utc.with_ymd_and_hms(2014, 10, 21, 15, 0, 0).unwrap();
        let created = now - Duration::minutes(5);
        assert_eq!(age(Some(&created), now), "5 minutes");
        assert_eq!(age(None, now), "<unknown>");
    }

    #[test]
    fn json_keys_are_sorted() {
        let object = KubeObject::from(Pod {
            meta: TypeMeta {
                kind: "Pod".to_string(),
                id: "web".to_string(),
                ..TypeMeta::default()
            },
            ..Pod::default()
        });
        assert_eq!(to_json(&object).unwrap(), "{\n  \"id\": \"web\",\n  \"kind\": \"Pod\"\n}");
    }
}
