//! # kn-config
//!
//! Layered configuration loading for keep2notion using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`KEEP2NOTION_*` prefix, `__` as separator)
//! 2. An explicit file passed with `--config`
//! 3. Project-level `./keep2notion.toml`
//! 4. User-level `~/.config/keep2notion/config.toml`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `KEEP2NOTION_NOTION__TOKEN` -> `notion.token`,
//! `KEEP2NOTION_KEEP__IMPORT_MEDIA` -> `keep.import_media`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use kn_config::KnConfig;
//!
//! let config = KnConfig::load_with_dotenv(None).expect("config");
//! config.validate_for_import().expect("import settings");
//! ```

mod error;
mod import;
mod keep;
mod notion;

pub use error::ConfigError;
pub use import::ImportConfig;
pub use keep::KeepConfig;
pub use notion::{NotionConfig, page_id_from_url};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "KEEP2NOTION_";
const PROJECT_CONFIG_FILE: &str = "keep2notion.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct KnConfig {
    #[serde(default)]
    pub keep: KeepConfig,
    #[serde(default)]
    pub notion: NotionConfig,
    #[serde(default)]
    pub import: ImportConfig,
}

impl KnConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`load_with_dotenv`](Self::load_with_dotenv)
    /// if `.env` files should be honored.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingFile`] if `explicit` does not exist and
    /// [`ConfigError::Figment`] if any source fails to parse.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        Self::figment(explicit)?.extract().map_err(ConfigError::from)
    }

    /// Load configuration after reading `.env` from the current directory.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load).
    pub fn load_with_dotenv(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load(explicit)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or layer extra
    /// providers on top.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingFile`] if `explicit` does not exist.
    pub fn figment(explicit: Option<&Path>) -> Result<Figment, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(PROJECT_CONFIG_FILE);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ConfigError::MissingFile(path.display().to_string()));
            }
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        Ok(figment)
    }

    /// Check that everything an import run needs is present and well-formed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] naming the first missing field,
    /// or [`ConfigError::InvalidValue`] if the root URL cannot be parsed.
    pub fn validate_for_import(&self) -> Result<(), ConfigError> {
        if !self.keep.is_configured() {
            return Err(ConfigError::NotConfigured {
                section: "keep".into(),
                missing: "email".into(),
            });
        }
        if self.notion.token.trim().is_empty() {
            return Err(ConfigError::NotConfigured {
                section: "notion".into(),
                missing: "token".into(),
            });
        }
        if self.notion.root_url.trim().is_empty() {
            return Err(ConfigError::NotConfigured {
                section: "notion".into(),
                missing: "root_url".into(),
            });
        }
        self.notion.root_page_id().map(|_| ())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("keep2notion").join("config.toml"))
    }
}
