use anyhow::{anyhow, Result};
use clap::Args;
use resources::{client::Api, objects::KubeObject};

use crate::{
    utils::{fetch, to_json},
    ResourceKind,
};

#[derive(Args)]
pub struct Arg {
    /// Kind of resource
    #[clap(arg_enum)]
    kind: ResourceKind,
    /// Name of resource
    name: String,
}

impl Arg {
    pub fn handle(&self, api: &Api) -> Result<()> {
        let object = fetch(api, self.kind, Some(&self.name))?
            .pop()
            .ok_or_else(|| anyhow!("{} \"{}\" not found", self.kind, self.name))?;
        match &object {
            KubeObject::Pod(pod) => print!("{}", pod),
            KubeObject::ReplicationController(controller) => print!("{}", controller),
            KubeObject::Service(service) => print!("{}", service),
            KubeObject::Minion(minion) => print!("{}", minion),
            _ => println!("{}", to_json(&object)?),
        }
        Ok(())
    }
}
