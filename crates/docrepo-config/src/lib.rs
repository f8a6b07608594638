//! # docrepo-config
//!
//! Layered configuration loading for docrepo using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`DOCREPO_*` prefix, `__` as separator)
//! 2. Project-level `.docrepo/config.toml`
//! 3. User-level `~/.config/docrepo/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `DOCREPO_MONGO__URI` -> `mongo.uri`,
//! `DOCREPO_GENERAL__DEFAULT_PAGE_SIZE` -> `general.default_page_size`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use docrepo_config::DocRepoConfig;
//!
//! let config = DocRepoConfig::load_with_dotenv().expect("config");
//!
//! if config.mongo.is_configured() {
//!     println!("MongoDB database: {}", config.mongo.database);
//! }
//! ```

mod error;
mod general;
mod mongo;

pub use error::ConfigError;
pub use general::GeneralConfig;
pub use mongo::MongoConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable prefix recognised by [`DocRepoConfig::figment`].
pub const ENV_PREFIX: &str = "DOCREPO_";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DocRepoConfig {
    #[serde(default)]
    pub mongo: MongoConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl DocRepoConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if a source fails to parse or a value has
    /// the wrong type, and `ConfigError::InvalidValue` if the merged result
    /// fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Extract and validate a config from an arbitrary figment.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.mongo.validate()?;
        if config.general.default_page_size <= 0 {
            return Err(ConfigError::InvalidValue {
                field: "general.default_page_size".into(),
                reason: "must be greater than zero".into(),
            });
        }
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".docrepo/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("docrepo").join("config.toml"))
    }

    /// Load `.env` from the workspace root.
    ///
    /// Walks up from `CARGO_MANIFEST_DIR` (if available) or current dir looking
    /// for a `.env` file. Silently does nothing if no `.env` is found.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // crate -> crates/ -> workspace root
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}
