use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use resources::{client::Api, objects::KubeObject};

#[derive(Args)]
pub struct Arg {
    /// The definition YAML or JSON file of the resource to create
    #[clap(short, long, parse(from_os_str), value_name = "FILE")]
    file: PathBuf,
}

impl Arg {
    pub fn handle(&self, api: &Api) -> Result<()> {
        let path = self.file.as_path();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to open file {}", path.display()))?;
        let object = KubeObject::from_yaml_str(&text)
            .with_context(|| format!("Failed to parse file {}", path.display()))?;
        tracing::debug!("Creating {} {}", object.kind(), object.id());
        api.create(&object)
            .with_context(|| format!("Failed to create using file {}", path.display()))?;
        println!("{} \"{}\" created", object.kind(), object.id());
        Ok(())
    }
}
