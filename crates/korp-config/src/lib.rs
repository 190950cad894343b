//! # korp-config
//!
//! Layered configuration loading for korpus using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`KORPUS_*` prefix, `__` as separator)
//! 2. Project-level `.korpus/config.toml`
//! 3. User-level `~/.config/korpus/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `KORPUS_SERVER__BASE_URL` -> `server.base_url`,
//! `KORPUS_RETRAIN__MAX_ATTEMPTS` -> `retrain.max_attempts`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use korp_config::KorpConfig;
//!
//! let config = KorpConfig::load().expect("config");
//! println!("backend: {}", config.server.base_url);
//! ```

mod error;
mod retrain;
mod server;
mod session;
mod stats;

pub use error::ConfigError;
pub use retrain::RetrainConfig;
pub use server::ServerConfig;
pub use session::SessionConfig;
pub use stats::StatsConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct KorpConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub retrain: RetrainConfig,
    #[serde(default)]
    pub stats: StatsConfig,
}

impl KorpConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT read `.env`; the binary loads it before calling this.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a source fails to parse or a value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Extract and validate a config from an arbitrary figment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if extraction fails or a value is invalid.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment or layer extra providers.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        let local_path = PathBuf::from(".korpus/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("KORPUS_").split("__"))
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.server.has_http_scheme() {
            return Err(ConfigError::InvalidValue {
                field: "server.base_url".into(),
                reason: format!("expected http:// or https://, got '{}'", self.server.base_url),
            });
        }
        self.retrain.validate()
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("korpus").join("config.toml"))
    }
}
