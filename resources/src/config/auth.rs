use std::{
    env,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use super::home_file;
use crate::{client::Credentials, codec::nullable};

pub const USERNAME_ENV: &str = "KUBERNETESUSERNAME";
pub const PASSWORD_ENV: &str = "KUBERNETESPASSWORD";

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("failed to read auth file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse auth file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// The `.kubernetes_auth` file written by the cluster setup scripts.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default, rename_all = "PascalCase")]
pub struct AuthFile {
    #[serde(deserialize_with = "nullable")]
    pub user: String,
    #[serde(deserialize_with = "nullable")]
    pub password: String,
    #[serde(rename = "CAFile", deserialize_with = "nullable")]
    pub ca_file: String,
    #[serde(deserialize_with = "nullable")]
    pub cert_file: String,
    #[serde(deserialize_with = "nullable")]
    pub key_file: String,
}

impl AuthFile {
    /// `~/.kubernetes_vagrant_auth` when `KUBERNETES_PROVIDER=vagrant`,
    /// `~/.kubernetes_auth` otherwise.
    pub fn default_path() -> Option<PathBuf> {
        let name = match env::var("KUBERNETES_PROVIDER").as_deref() {
            Ok("vagrant") => ".kubernetes_vagrant_auth",
            _ => ".kubernetes_auth",
        };
        home_file(name)
    }

    pub fn load(path: &Path) -> Result<Self, AuthError> {
        let text = std::fs::read_to_string(path).map_err(|source| AuthError::Io {
            path: path.to_owned(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| AuthError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    pub fn credentials(&self) -> Option<Credentials> {
        Credentials::new(&self.user, &self.password)
    }
}

/// Pick credentials from, in order: the given user/password, the
/// `KUBERNETESUSERNAME`/`KUBERNETESPASSWORD` variables, the default auth
/// file. A source only counts when both halves are non-empty.
pub fn resolve_credentials(user: Option<&str>, password: Option<&str>) -> Option<Credentials> {
    if let Some(credentials) = Credentials::new(user.unwrap_or_default(), password.unwrap_or_default()) {
        return Some(credentials);
    }
    let from_env = Credentials::new(
        &env::var(USERNAME_ENV).unwrap_or_default(),
        &env::var(PASSWORD_ENV).unwrap_or_default(),
    );
    if from_env.is_some() {
        return from_env;
    }
    let path = AuthFile::default_path()?;
    if !path.exists() {
        return None;
    }
    match AuthFile::load(&path) {
        Ok(file) => file.credentials(),
        Err(err) => {
            tracing::warn!("Ignoring auth file: {}", err);
            None
        },
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_auth_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"User": "admin", "Password": "s3cret", "CAFile": "/srv/ca.crt", "CertFile": "", "KeyFile": null}}"#
        )
        .unwrap();
        let auth = AuthFile::load(file.path()).unwrap_or_else(|err| panic!("{:?}", err));
        assert_eq!(auth.user, "admin");
        assert_eq!(auth.ca_file, "/srv/ca.crt");
        let credentials = auth.credentials().unwrap();
        assert_eq!(credentials.user_id(), "admin");
        assert_eq!(credentials.password(), "s3cret");
    }

    #[test]
    fn null_fields_read_as_empty() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"User": null, "Password": null, "CAFile": null, "CertFile": null, "KeyFile": null}}"#
        )
        .unwrap();
        assert_eq!(AuthFile::load(file.path()).unwrap(), AuthFile::default());
    }

    #[test]
    fn broken_auth_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "User: admin").unwrap();
        assert!(matches!(AuthFile::load(file.path()), Err(AuthError::Parse { .. })));

        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            AuthFile::load(&dir.path().join(".kubernetes_auth")),
            Err(AuthError::Io { .. })
        ));
    }

    #[test]
    fn incomplete_file_has_no_credentials() {
        let auth = AuthFile {
            user: "admin".to_string(),
            ..AuthFile::default()
        };
        assert_eq!(auth.credentials(), None);
    }

    #[test]
    fn explicit_credentials_win() {
        let credentials = resolve_credentials(Some("ops"), Some("pw")).unwrap();
        assert_eq!(credentials.user_id(), "ops");
    }
}
