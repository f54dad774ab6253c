use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgEnum, Parser, Subcommand};
use resources::{
    client::Api,
    config::{auth::resolve_credentials, ClusterConfig},
};
use strum::Display;
use tracing_subscriber::EnvFilter;

mod create;
mod delete;
mod describe;
mod get;
mod utils;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
struct Cli {
    /// API server URL including the version, e.g. https://10.245.1.2/api/v1beta2
    #[clap(long, global = true, value_name = "URL")]
    url: Option<String>,
    /// User id for basic auth
    #[clap(long, global = true)]
    user_id: Option<String>,
    /// Password for basic auth
    #[clap(long, global = true)]
    user_pw: Option<String>,
    /// Request timeout in seconds
    #[clap(long, global = true, value_name = "SECONDS")]
    timeout: Option<u64>,
    /// Skip verification of the server certificate
    #[clap(long, global = true)]
    insecure: bool,
    /// Config file, defaults to ~/.rkubectl.yaml
    #[clap(long, global = true, parse(from_os_str), value_name = "FILE")]
    config: Option<PathBuf>,
    /// Print debug logs
    #[clap(short, long, global = true)]
    verbose: bool,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a resource using configuration file.
    Create(create::Arg),
    /// Delete a resource by name.
    Delete(delete::Arg),
    /// Show details of a resource.
    Describe(describe::Arg),
    /// Get resources
    Get(get::Arg),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ArgEnum, Display)]
#[strum(serialize_all = "camelCase")]
pub enum ResourceKind {
    Pods,
    ReplicationControllers,
    Services,
    Endpoints,
    Minions,
    Events,
}

impl Cli {
    /// Config file, then environment, then flags.
    fn cluster_config(&self) -> Result<ClusterConfig> {
        let mut config = ClusterConfig::load(self.config.as_deref())
            .with_context(|| "Failed to load config".to_string())?;
        if let Some(url) = &self.url {
            config.base_url = url.to_owned();
        }
        if self.timeout.is_some() {
            config.timeout = self.timeout;
        }
        if self.insecure {
            config.insecure_skip_tls_verify = true;
        }
        Ok(config)
    }

    fn api(&self) -> Result<Api> {
        let config = self.cluster_config()?;
        tracing::debug!("Using API server {}", config.base_url);
        let mut api = Api::new(&config)
            .with_context(|| format!("Failed to create client for {}", config.base_url))?;
        match resolve_credentials(self.user_id.as_deref(), self.user_pw.as_deref()) {
            Some(credentials) => api.set_credentials(credentials),
            None => tracing::warn!("No credentials found, requests will be rejected"),
        }
        Ok(api)
    }
}

fn init_tracing(verbose: bool) {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) if verbose => EnvFilter::new("rkubectl=debug,resources=debug"),
        Err(_) => EnvFilter::new("warn"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let api = cli.api()?;

    match &cli.command {
        Commands::Create(arg) => arg.handle(&api)?,
        Commands::Delete(arg) => arg.handle(&api)?,
        Commands::Describe(arg) => arg.handle(&api)?,
        Commands::Get(arg) => arg.handle(&api)?,
    }

    Ok(())
}
