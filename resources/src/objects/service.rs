use std::fmt::Write;

use indenter::indented;
use serde::{Deserialize, Serialize};

use super::{impl_object, volume::Protocol, IntOrString, Labels, TypeMeta};
use crate::{
    codec::{impl_codec, is_default, nullable},
    utils::{fmt_labels, selector_match},
};

/// A named abstraction of a software service (for example, mysql)
/// consisting of a local port that the proxy listens on, and the selector
/// that determines which pods will answer requests sent through the proxy.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Service {
    #[serde(flatten)]
    pub meta: TypeMeta,
    /// Required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<i64>,
    /// Optional: Supports "TCP" and "UDP". Left unset unless given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<Protocol>,
    /// Organizes and categorizes the service.
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub labels: Labels,
    /// Pods with these labels receive the traffic.
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub selector: Labels,
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub create_external_load_balancer: bool,
    /// Name or number of the port on the selected pods.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_port: Option<IntOrString>,
    /// Assigned by the master. Read-only.
    #[serde(
        rename = "portalIP",
        skip_serializing_if = "is_default",
        deserialize_with = "nullable"
    )]
    pub portal_ip: String,
    /// Assigned by the master. Read-only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_port: Option<i64>,
}

impl Service {
    /// Whether a pod carrying `labels` backs this service.
    pub fn selects(&self, labels: &Labels) -> bool {
        selector_match(&self.selector, labels)
    }
}

impl std::fmt::Display for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{:<16} {}", "Name:", self.meta.id)?;
        writeln!(f, "{:<16} {}", "Labels:", fmt_labels(&self.labels))?;
        writeln!(f, "{:<16} {}", "Selector:", fmt_labels(&self.selector))?;
        writeln!(f, "{:<16} {}", "Portal IP:", self.portal_ip)?;
        writeln!(f, "Port:")?;
        let protocol = self.protocol.clone().unwrap_or_default();
        match (&self.port, &self.container_port) {
            (Some(port), Some(target)) => {
                writeln!(indented(f), "{}/{} -> {}", port, protocol, target)?
            },
            (Some(port), None) => writeln!(indented(f), "{}/{}", port, protocol)?,
            _ => writeln!(indented(f), "<none>")?,
        }
        if self.create_external_load_balancer {
            writeln!(f, "{:<16} {}", "External LB:", "yes")?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ServiceList {
    #[serde(flatten)]
    pub meta: TypeMeta,
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub items: Vec<Service>,
}

/// A collection of endpoints that implement the actual service,
/// for example `["10.10.1.1:1909", "10.10.2.2:8834"]`.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Endpoints {
    #[serde(flatten)]
    pub meta: TypeMeta,
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub endpoints: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct EndpointsList {
    #[serde(flatten)]
    pub meta: TypeMeta,
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub items: Vec<Endpoints>,
}

impl_codec!(Service, ServiceList, Endpoints, EndpointsList);
impl_object!(Service, ServiceList, Endpoints, EndpointsList);

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;
    use crate::codec::Codec;

    #[test]
    fn port_only_service() {
        let service = Service {
            port: Some(80),
            ..Service::default()
        };
        assert_eq!(Value::Object(service.encode()), json!({"port": 80}));
        assert_eq!(service.protocol, None);
    }

    #[test]
    fn service_keys() {
        let raw = json!({
            "kind": "Service",
            "id": "redismaster",
            "port": 10000,
            "protocol": "TCP",
            "labels": {"name": "redis-master"},
            "selector": {"name": "redis-master"},
            "createExternalLoadBalancer": true,
            "containerPort": "redis",
            "portalIP": "10.0.0.11",
            "proxyPort": 43210,
        });
        let service = Service::decode(&raw).unwrap();
        assert_eq!(service.protocol, Some(Protocol::TCP));
        assert_eq!(service.container_port, Some(IntOrString::from("redis")));
        assert_eq!(service.portal_ip, "10.0.0.11");
        assert!(service.create_external_load_balancer);
        assert_eq!(Value::Object(service.encode()), raw);
        assert!(service.to_string().contains("10000/TCP -> redis"));
    }

    #[test]
    fn selector() {
        let service = Service::decode(&json!({"selector": {"name": "redis-master"}})).unwrap();
        let master = Labels::from([("name".to_string(), "redis-master".to_string())]);
        let slave = Labels::from([("name".to_string(), "redis-slave".to_string())]);
        assert!(service.selects(&master));
        assert!(!service.selects(&slave));
    }

    #[test]
    fn endpoints_keep_order() {
        let raw = json!({
            "kind": "Endpoints",
            "id": "redismaster",
            "endpoints": ["10.10.2.2:8834", "10.10.1.1:1909"],
        });
        let endpoints = Endpoints::decode(&raw).unwrap();
        assert_eq!(endpoints.endpoints, ["10.10.2.2:8834", "10.10.1.1:1909"]);
        assert_eq!(Value::Object(endpoints.encode()), raw);
        assert_eq!(Endpoints::decode(&json!({"endpoints": []})).unwrap(), Endpoints::default());
    }

    #[test]
    fn lists_default() {
        assert_eq!(ServiceList::decode(&json!({})).unwrap(), ServiceList::default());
        assert_eq!(EndpointsList::decode(&json!({})).unwrap(), EndpointsList::default());
        assert_eq!(ServiceList::default().as_text(), "{}");
    }
}
