use anyhow::Result;
use chrono::Utc;
use clap::{ArgEnum, Args};
use resources::{
    client::Api,
    codec::canonical,
    objects::{KubeObject, Time},
    utils::fmt_labels,
};
use serde_json::Value;

use crate::{
    utils::{age, fetch, to_json},
    ResourceKind,
};

#[derive(Copy, Clone, PartialEq, Eq, ArgEnum)]
pub enum Output {
    Table,
    Json,
}

#[derive(Args)]
pub struct Arg {
    /// Kind of resource
    #[clap(arg_enum)]
    kind: ResourceKind,
    /// Name of resource
    name: Option<String>,
    /// Output format
    #[clap(short, long, arg_enum, default_value = "table")]
    output: Output,
}

impl Arg {
    pub fn handle(&self, api: &Api) -> Result<()> {
        let objects = fetch(api, self.kind, self.name.as_deref())?;
        match self.output {
            Output::Json if self.name.is_some() => {
                for object in objects.iter() {
                    println!("{}", to_json(object)?);
                }
            },
            Output::Json => {
                let items: Vec<Value> = objects
                    .iter()
                    .map(|object| canonical(Value::Object(object.encode())))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&items)?);
            },
            Output::Table => print_table(self.kind, &objects),
        }
        Ok(())
    }
}

fn print_table(kind: ResourceKind, objects: &[KubeObject]) {
    let now = Utc::now();
    match kind {
        ResourceKind::Pods => {
            println!(
                "{: <24} {: <24} {: <16} {: <24} {: <10} {: <10}",
                "NAME", "IMAGE(S)", "HOST", "LABELS", "STATUS", "AGE"
            );
        },
        ResourceKind::ReplicationControllers => {
            println!("{: <24} {: <24} {: <24} {: <8}", "NAME", "IMAGE(S)", "SELECTOR", "REPLICAS");
        },
        ResourceKind::Services => {
            println!(
                "{: <24} {: <24} {: <24} {: <16} {: <8}",
                "NAME", "LABELS", "SELECTOR", "IP", "PORT"
            );
        },
        ResourceKind::Endpoints => println!("{: <24} {}", "NAME", "ENDPOINTS"),
        ResourceKind::Minions => println!("{: <24} {: <16} {: <10}", "NAME", "HOST IP", "AGE"),
        ResourceKind::Events => {
            println!(
                "{: <24} {: <24} {: <12} {: <12} {: <12} {}",
                "TIME", "NAME", "KIND", "REASON", "SOURCE", "MESSAGE"
            );
        },
    }

    for object in objects {
        match object {
            KubeObject::Pod(pod) => {
                let state = pod.current_state.clone().unwrap_or_default();
                println!(
                    "{: <24} {: <24} {: <16} {: <24} {: <10} {: <10}",
                    pod.meta.id,
                    pod.images().join(","),
                    state.host,
                    fmt_labels(&pod.labels),
                    state.status,
                    age(pod.meta.creation_timestamp.as_ref().and_then(Time::datetime), now)
                );
            },
            KubeObject::ReplicationController(controller) => {
                let desired = controller.desired_state.clone().unwrap_or_default();
                println!(
                    "{: <24} {: <24} {: <24} {: <8}",
                    controller.meta.id,
                    controller.images().join(","),
                    fmt_labels(&desired.replica_selector),
                    desired.replicas.unwrap_or_default()
                );
            },
            KubeObject::Service(service) => {
                let port = service.port.map(|port| port.to_string()).unwrap_or_default();
                println!(
                    "{: <24} {: <24} {: <24} {: <16} {: <8}",
                    service.meta.id,
                    fmt_labels(&service.labels),
                    fmt_labels(&service.selector),
                    service.portal_ip,
                    port
                );
            },
            KubeObject::Endpoints(endpoints) => {
                println!("{: <24} {}", endpoints.meta.id, endpoints.endpoints.join(","));
            },
            KubeObject::Minion(minion) => {
                println!(
                    "{: <24} {: <16} {: <10}",
                    minion.meta.id,
                    minion.host_ip,
                    age(minion.meta.creation_timestamp.as_ref().and_then(Time::datetime), now)
                );
            },
            KubeObject::Event(event) => {
                let involved = event.involved_object.clone().unwrap_or_default();
                let time = event
                    .timestamp
                    .as_ref()
                    .map(Time::to_string)
                    .unwrap_or_default();
                println!(
                    "{: <24} {: <24} {: <12} {: <12} {: <12} {}",
                    time, involved.name, involved.kind, event.reason, event.source, event.message
                );
            },
            other => tracing::debug!("Skipping {} {}", other.kind(), other.id()),
        }
    }
}
