use crate::audit::RootReport;
use utils::error::Result;

pub mod config;
mod console;
mod json;
mod log;
mod manager;

pub use config::ReportConfig;
pub use console::ConsoleSink;
pub use json::{JsonReport, JsonSink};
pub use log::LogSink;
pub use manager::SinkManager;

/// Receives the finished result set of one root.
#[async_trait::async_trait]
pub trait ReportSink: Send + Sync {
    /// Called once per root, after every file of that root was evaluated.
    async fn write(&mut self, report: &RootReport) -> Result<()>;

    /// Sink name used in diagnostics.
    fn name(&self) -> &'static str;
}

const INVALID_FILE_NAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Turn a root directory into a file name for its report.
///
/// UNC roots lose their leading backslashes and any `$`; drive roots such as
/// `C:\` become `C_Drive_permissions`; the Unix root becomes
/// `root_permissions`. Remaining invalid characters turn into `_`.
pub fn report_file_name(root: &str, extension: &str) -> String {
    let mut name = root.to_string();

    if name.starts_with("\\\\") {
        name = name.trim_start_matches('\\').replace('\\', "_").replace('$', "");
    } else if is_drive_root(&name) {
        name = format!("{}_Drive_permissions", name.trim_end_matches('\\').trim_end_matches(':'));
    } else if !name.is_empty() && name.chars().all(|c| c == '/') {
        name = "root_permissions".to_string();
    }

    let mut sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_control() || INVALID_FILE_NAME_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect();
    sanitized.push('.');
    sanitized.push_str(extension);
    sanitized
}

fn is_drive_root(name: &str) -> bool {
    let bytes = name.as_bytes();
    bytes.len() == 3 && bytes[0].is_ascii_alphabetic() && &bytes[1..] == b":\\"
}
