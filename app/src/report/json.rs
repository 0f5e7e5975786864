use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::audit::RootReport;
use crate::report::{report_file_name, ReportSink};
use utils::error::Result;

/// On-disk layout of a per-root report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonReport {
    pub root: String,
    pub generated_at: String,
    pub files_found: usize,
    pub files: Vec<JsonRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonRow {
    pub path: String,
    pub read: bool,
    pub write: bool,
    pub read_write: bool,
}

impl From<&RootReport> for JsonReport {
    fn from(report: &RootReport) -> Self {
        Self {
            root: report.root.clone(),
            generated_at: chrono::Local::now().to_rfc3339(),
            files_found: report.files_found,
            files: report
                .results
                .iter()
                .map(|r| JsonRow {
                    path: r.path.to_string_lossy().into_owned(),
                    read: r.can_read,
                    write: r.can_write,
                    read_write: r.read_write(),
                })
                .collect(),
        }
    }
}

/// Writes `<sanitized root>.json` into the output directory.
pub struct JsonSink {
    output_dir: PathBuf,
}

impl JsonSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn report_path(&self, root: &str) -> PathBuf {
        self.output_dir.join(report_file_name(root, "json"))
    }
}

#[async_trait::async_trait]
impl ReportSink for JsonSink {
    async fn write(&mut self, report: &RootReport) -> Result<()> {
        tokio::fs::create_dir_all(&self.output_dir).await?;

        let path = self.report_path(&report.root);
        let body = serde_json::to_vec_pretty(&JsonReport::from(report))?;
        tokio::fs::write(&path, body).await.map_err(|e| {
            utils::error::Error::with_source(
                &format!("Failed to write report {}", path.display()),
                Box::new(e),
            )
        })?;

        log::info!("Report saved: {}", path.display());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "json_sink"
    }
}
