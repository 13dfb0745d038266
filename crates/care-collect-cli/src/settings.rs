//! Runtime settings.
//!
//! Sources, lowest priority first: built-in defaults, the config file
//! (`care-collect.toml` in the working directory, or `--config`), then
//! `CARE_COLLECT_*` environment variables.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use care_collect_core::IdPolicy;
use config::{Config, Environment, File};
use serde::Deserialize;

pub const DEFAULT_CONFIG_NAME: &str = "care-collect";
pub const DEFAULT_DATABASE_PATH: &str = "care-collect.db";

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Settings {
    /// SQLite file holding the store
    pub database_path: PathBuf,
    /// How new patient IDs are assigned
    pub id_policy: IdPolicy,
}

impl Settings {
    /// Load settings, reading `config_path` if given.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let file = match config_path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };

        let settings = Config::builder()
            .set_default("database_path", DEFAULT_DATABASE_PATH)?
            .set_default("id_policy", "auto")?
            .add_source(file)
            .add_source(Environment::with_prefix("CARE_COLLECT"))
            .build()
            .context("failed to read configuration")?
            .try_deserialize::<Settings>()
            .context("invalid configuration")?;

        log::debug!("loaded settings: {:?}", settings);
        Ok(settings)
    }
}
