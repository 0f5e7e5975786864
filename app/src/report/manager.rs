use utils::error::Result;

use crate::audit::RootReport;
use crate::report::config::ReportConfig;
use crate::report::{ConsoleSink, JsonSink, LogSink, ReportSink};

/// Fans each root's report out to the configured sinks.
pub struct SinkManager {
    sinks: Vec<Box<dyn ReportSink>>,
    suppress: bool,
}

impl SinkManager {
    /// Empty manager; sinks are added with [`SinkManager::add_sink`].
    pub fn new() -> Self {
        Self {
            sinks: Vec::new(),
            suppress: false,
        }
    }

    pub fn with_config(config: &ReportConfig) -> Self {
        let mut manager = Self {
            sinks: Vec::new(),
            suppress: config.suppress,
        };

        if config.suppress {
            return manager;
        }

        if config.log {
            manager.add_sink(Box::new(LogSink));
        }
        if config.json {
            manager.add_sink(Box::new(JsonSink::new(config.output_dir.clone())));
        }
        if config.console {
            manager.add_sink(Box::new(ConsoleSink));
        }

        manager
    }

    pub fn add_sink(&mut self, sink: Box<dyn ReportSink>) {
        self.sinks.push(sink);
    }

    pub fn get_sink_count(&self) -> usize {
        self.sinks.len()
    }

    pub fn sink_names(&self) -> Vec<&'static str> {
        self.sinks.iter().map(|s| s.name()).collect()
    }

    /// Hand a complete root report to every sink, in registration order.
    pub async fn publish(&mut self, report: &RootReport) -> Result<()> {
        if self.suppress {
            log::warn!(
                "Suppressed writing output for {} files in {}",
                report.files_found,
                report.root
            );
            return Ok(());
        }

        for sink in &mut self.sinks {
            log::debug!("[{}] Writing report for {}", sink.name(), report.root);
            sink.write(report).await?;
        }
        Ok(())
    }
}

impl Default for SinkManager {
    fn default() -> Self {
        Self::new()
    }
}
