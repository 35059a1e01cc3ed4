//! Layered settings
//!
//! An optional `lander` config file (toml/yaml/json, picked by extension)
//! overlaid with `LANDER__*` environment variables. Nested keys use a double
//! underscore, e.g. `LANDER__SYNC__MISSING_POLICY=archive`.

#![allow(clippy::result_large_err)]

use config::{Config, Environment, File};
use lander_core::errors::{ExError, ExErrorKind, Result};
use lander_core::logging_facility::Profile;
use lander_store::SyncOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// File stem looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_NAME: &str = "lander";

pub const ENV_PREFIX: &str = "LANDER";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub database_path: PathBuf,
    /// On-disk fallback document; the compiled-in one is used when unset
    pub fallback_path: Option<PathBuf>,
    /// Bundle requested from the download provider
    pub download_bundle_key: String,
    /// Provider catalog used by the landing preview
    pub catalog_path: Option<PathBuf>,
    pub log_profile: Profile,
    pub sync: SyncOptions,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("lander.db"),
            fallback_path: None,
            download_bundle_key: "default".to_string(),
            catalog_path: None,
            log_profile: Profile::default(),
            sync: SyncOptions::default(),
        }
    }
}

impl Settings {
    /// Load settings
    ///
    /// With `path` the file must exist; without it `./lander.*` is optional.
    ///
    /// # Errors
    /// `ConfigParse` when a source cannot be read or does not deserialize.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => File::from(p).required(true),
            None => File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };

        let settings = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .and_then(|c| c.try_deserialize::<Settings>())
            .map_err(|e| {
                ExError::new(ExErrorKind::ConfigParse)
                    .with_op("settings_load")
                    .with_message(e.to_string())
            })?;

        tracing::debug!(
            database = %settings.database_path.display(),
            snapshot_dir = %settings.sync.snapshot_dir.display(),
            "settings loaded"
        );
        Ok(settings)
    }
}
