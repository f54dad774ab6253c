pub mod auth;

use std::{collections::BTreeMap, path::Path};

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

pub use self::auth::{AuthError, AuthFile};

/// Default API endpoint of a local vagrant cluster.
pub const DEFAULT_BASE_URL: &str = "https://10.245.1.2/api/v1beta2";

/// Prefix of the environment variables overriding [`ClusterConfig`] fields.
pub const ENV_PREFIX: &str = "RKUBECTL";

/// Where and how to reach the API server.
///
/// Keys are snake_case both in YAML and in the environment,
/// e.g. `base_url` or `RKUBECTL_BASE_URL`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ClusterConfig {
    /// API server URL including the version prefix
    pub base_url: String,
    /// Request timeout in seconds, no timeout if unset
    pub timeout: Option<u64>,
    /// Extra headers sent with every request
    pub request_headers: BTreeMap<String, String>,
    pub user_agent: String,
    /// Accept self-signed server certificates
    pub insecure_skip_tls_verify: bool,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        ClusterConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
            request_headers: BTreeMap::new(),
            user_agent: concat!("rkubectl/", env!("CARGO_PKG_VERSION")).to_string(),
            insecure_skip_tls_verify: false,
        }
    }
}

impl ClusterConfig {
    /// Layer the YAML file at `path` (required when given, otherwise
    /// `~/.rkubectl.yaml` if present) under `RKUBECTL_*` variables.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => Some(File::new(&path.to_string_lossy(), FileFormat::Yaml)),
            None => home_file(".rkubectl.yaml")
                .map(|path| File::new(&path.to_string_lossy(), FileFormat::Yaml).required(false)),
        };
        let mut builder = Config::builder();
        if let Some(file) = file {
            builder = builder.add_source(file);
        }
        builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize::<ClusterConfig>()
    }
}

/// `$HOME/<name>`, `None` if `HOME` is unset.
pub(crate) fn home_file(name: &str) -> Option<std::path::PathBuf> {
    std::env::var_os("HOME").map(|home| Path::new(&home).join(name))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults() {
        let config = ClusterConfig::default();
        assert_eq!(config.base_url, "https://10.245.1.2/api/v1beta2");
        assert_eq!(config.timeout, None);
        assert!(!config.insecure_skip_tls_verify);
        assert!(config.user_agent.starts_with("rkubectl/"));
    }

    #[test]
    fn load_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "base_url: http://127.0.0.1:8080/api/v1beta2\ntimeout: 30\nrequest_headers:\n  x-trace: abc"
        )
        .unwrap();
        let config = ClusterConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:8080/api/v1beta2");
        assert_eq!(config.timeout, Some(30));
        assert_eq!(config.request_headers["x-trace"], "abc");
        assert_eq!(config.user_agent, ClusterConfig::default().user_agent);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ClusterConfig::load(Some(&dir.path().join("absent.yaml"))).is_err());
    }
}
