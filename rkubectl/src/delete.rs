use anyhow::{Context, Result};
use clap::Args;
use resources::{
    client::Api,
    objects::status::{Status, StatusPhase},
};

use crate::ResourceKind;

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
        let status: Status = api
            .delete(&format!("{}/{}", self.kind, self.name))
            .with_context(|| format!("Failed to delete {} \"{}\"", self.kind, self.name))?;
        match status.phase() {
            Some(StatusPhase::Working) => {
                println!("{} \"{}\" is being deleted", self.kind, self.name)
            },
            _ => println!("{} \"{}\" deleted", self.kind, self.name),
        }
        Ok(())
    }
}
