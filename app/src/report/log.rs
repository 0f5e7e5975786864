use crate::audit::RootReport;
use crate::report::ReportSink;
use utils::error::Result;

/// Writes one log line per reported file.
pub struct LogSink;

#[async_trait::async_trait]
impl ReportSink for LogSink {
    async fn write(&mut self, report: &RootReport) -> Result<()> {
        for result in &report.results {
            ::log::info!(
                "[LogSink] {} read={} write={} read_write={}",
                result.path.display(),
                result.can_read,
                result.can_write,
                result.read_write()
            );
        }
        ::log::info!(
            "[LogSink] {} reported of {} files in {}",
            report.results.len(),
            report.files_found,
            report.root
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log_sink"
    }
}
