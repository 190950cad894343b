//! Session persistence configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const fn default_persist() -> bool {
    true
}

fn default_keyring_service() -> String {
    "korpus-cli".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Keep the bearer token across process restarts.
    #[serde(default = "default_persist")]
    pub persist: bool,

    /// OS keychain service name the token is stored under.
    #[serde(default = "default_keyring_service")]
    pub keyring_service: String,

    /// Override for the fallback credentials file (`~/.korpus/credentials`).
    #[serde(default)]
    pub credentials_path: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            persist: default_persist(),
            keyring_service: default_keyring_service(),
            credentials_path: None,
        }
    }
}

impl SessionConfig {
    /// Resolve the credentials file: explicit override, else under the home directory.
    #[must_use]
    pub fn resolved_credentials_path(&self) -> Option<PathBuf> {
        self.credentials_path
            .clone()
            .or_else(|| dirs::home_dir().map(|home| home.join(".korpus").join("credentials")))
    }
}
