use std::fmt::Write as _;

use crate::audit::RootReport;
use crate::report::ReportSink;
use utils::error::Result;

const HEADERS: [&str; 4] = ["File Path", "Read", "Write", "Read & Write"];

/// Prints the permission matrix of each root to stdout.
pub struct ConsoleSink;

impl ConsoleSink {
    /// Render the table without printing it.
    pub fn render(report: &RootReport) -> String {
        let path_width = report
            .results
            .iter()
            .map(|r| r.path.to_string_lossy().chars().count())
            .max()
            .unwrap_or(0)
            .max(HEADERS[0].len());

        let mut out = String::new();
        let _ = writeln!(
            out,
            "Processing {} files in {}",
            report.files_found, report.root
        );
        let _ = writeln!(
            out,
            "{:<width$}  {:<4}  {:<5}  {}",
            HEADERS[0],
            HEADERS[1],
            HEADERS[2],
            HEADERS[3],
            width = path_width
        );
        for result in &report.results {
            let _ = writeln!(
                out,
                "{:<width$}  {:<4}  {:<5}  {}",
                result.path.to_string_lossy(),
                yes_no(result.can_read),
                yes_no(result.can_write),
                yes_no(result.read_write()),
                width = path_width
            );
        }
        out
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Y"
    } else {
        "N"
    }
}

#[async_trait::async_trait]
impl ReportSink for ConsoleSink {
    async fn write(&mut self, report: &RootReport) -> Result<()> {
        print!("{}", Self::render(report));
        Ok(())
    }

    fn name(&self) -> &'static str {
        "console_sink"
    }
}
