use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::RwLock;

use super::error::{Error, Result};

// File layers only: embedded defaults, then an optional user file. The
// environment is layered on top at build time, overrides from `set` above that.
lazy_static! {
    static ref BUILDER: RwLock<ConfigBuilder<DefaultState>> = RwLock::new(Config::builder());
}

const ENV_PREFIX: &str = "PERMSCAN";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: String,
    /// Directory for `permscan.log`; empty means `logs/` next to the executable.
    pub dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditSettings {
    pub verbose: bool,
    pub suppress: bool,
    pub stealth: bool,
    pub follow_links: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSettings {
    pub console: bool,
    pub log: bool,
    pub json: bool,
    pub output_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub log: LogConfig,
    pub audit: AuditSettings,
    pub report: ReportSettings,
}

impl AppConfig {
    /// Initialize AppConfig.
    pub fn init(default_config: Option<&str>) -> Result<()> {
        let mut builder = Config::builder();

        // Embed file into executable
        // This macro will embed the configuration file into the
        // executable. Check include_str! for more info.
        if let Some(config_contents) = default_config {
            builder = builder.add_source(File::from_str(config_contents, FileFormat::Toml));
        }

        let mut w = BUILDER.write().map_err(|_| Error::new("Configuration lock poisoned"))?;
        *w = builder;

        Ok(())
    }

    /// Layer a user supplied TOML file on top of the current configuration.
    pub fn merge_config(config_file: Option<&Path>) -> Result<()> {
        if let Some(config_file_path) = config_file {
            let mut w = BUILDER.write().map_err(|_| Error::new("Configuration lock poisoned"))?;
            let builder = w.clone().add_source(File::from(config_file_path).required(true));
            // Fail early on a malformed file instead of at first fetch.
            builder.build_cloned()?;
            *w = builder;
        }
        Ok(())
    }

    /// Set a configuration value at runtime.
    pub fn set(key: &str, value: &str) -> Result<()> {
        let mut w = BUILDER.write().map_err(|_| Error::new("Configuration lock poisoned"))?;
        *w = w.clone().set_override(key, value)?;
        Ok(())
    }

    /// Get a single value.
    pub fn get<'de, T>(key: &'de str) -> Result<T>
    where
        T: serde::Deserialize<'de>,
    {
        Ok(Self::build()?.get::<T>(key)?)
    }

    /// Deserialize the whole configuration.
    pub fn fetch() -> Result<AppConfig> {
        Ok(Self::build()?.try_deserialize::<AppConfig>()?)
    }

    fn build() -> Result<Config> {
        let r = BUILDER.read().map_err(|_| Error::new("Configuration lock poisoned"))?;
        Ok(r.clone().add_source(environment()).build()?)
    }
}

/// `PERMSCAN_REPORT__OUTPUT_DIR` maps to `report.output_dir`.
fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}
