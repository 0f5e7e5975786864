use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use utils::app_config::ReportSettings;

/// Which sinks receive each root's report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Print the permission table to stdout
    pub console: bool,
    /// Write each result through the logger
    pub log: bool,
    /// Write a JSON report per root
    pub json: bool,
    /// Directory receiving JSON reports
    pub output_dir: PathBuf,
    /// Skip every sink and only note how many files were found
    pub suppress: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            console: true,
            log: false,
            json: false,
            output_dir: PathBuf::from("."),
            suppress: false,
        }
    }
}

impl ReportConfig {
    /// Build from the `[report]` configuration section.
    pub fn from_settings(settings: &ReportSettings, suppress: bool) -> Self {
        Self {
            console: settings.console,
            log: settings.log,
            json: settings.json,
            output_dir: PathBuf::from(&settings.output_dir),
            suppress,
        }
    }

    /// No sinks at all.
    pub fn suppressed() -> Self {
        Self {
            suppress: true,
            ..Default::default()
        }
    }

    /// Every sink enabled, JSON written to `output_dir`.
    pub fn all_enabled(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            console: true,
            log: true,
            json: true,
            output_dir: output_dir.into(),
            suppress: false,
        }
    }
}
