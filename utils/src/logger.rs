use slog::o;
use slog::Drain;
use slog::Level;
use slog::LevelFilter;
#[cfg(all(target_os = "linux", feature = "journald"))]
use slog_journald::JournaldDrain;
#[cfg(feature = "syslog")]
use slog_syslog::Facility;

use std::fs::OpenOptions;
use std::path::PathBuf;

use super::error::Result;
use crate::app_config::{AppConfig, LogConfig};

const LOG_FILE_NAME: &str = "permscan.log";
const CHANNEL_SIZE: usize = 1024;

/// Install the global slog logger and bridge the `log` facade into it.
///
/// `level_override` wins over `log.level` from the configuration.
pub fn setup_logging(level_override: Option<&str>) -> Result<slog_scope::GlobalLoggerGuard> {
    let config = AppConfig::get::<LogConfig>("log").ok();

    let level = level_override
        .or(config.as_ref().map(|c| c.level.as_str()))
        .map(parse_level)
        .unwrap_or(Level::Info);
    let log_dir = config.map(|c| c.dir).unwrap_or_default();

    let guard = slog_scope::set_global_logger(default_root_logger(level, &log_dir)?);
    slog_stdlog::init_with_level(to_log_level(level))?;

    Ok(guard)
}

pub fn default_root_logger(level: Level, log_dir: &str) -> Result<slog::Logger> {
    let term_drain = default_term_drain().unwrap_or(default_discard()?);
    let file_drain = default_file_drain(log_dir).unwrap_or(default_discard()?);

    let drain = slog::Duplicate(term_drain, file_drain).fuse();

    #[cfg(feature = "syslog")]
    let drain = slog::Duplicate(default_syslog_drain().unwrap_or(default_discard()?), drain).fuse();
    #[cfg(feature = "journald")]
    #[cfg(target_os = "linux")]
    let drain = slog::Duplicate(
        default_journald_drain().unwrap_or(default_discard()?),
        drain,
    )
    .fuse();

    let drain = LevelFilter::new(drain, level).fuse();

    Ok(slog::Logger::root(drain, o!()))
}

/// Map a configured level name onto slog; unknown names fall back to info.
pub fn parse_level(name: &str) -> Level {
    match name.trim().to_ascii_lowercase().as_str() {
        "trace" => Level::Trace,
        "debug" => Level::Debug,
        "info" => Level::Info,
        "warn" | "warning" => Level::Warning,
        "error" => Level::Error,
        _ => Level::Info,
    }
}

fn to_log_level(level: Level) -> log::Level {
    match level {
        Level::Trace => log::Level::Trace,
        Level::Debug => log::Level::Debug,
        Level::Info => log::Level::Info,
        Level::Warning => log::Level::Warn,
        Level::Error | Level::Critical => log::Level::Error,
    }
}

fn default_discard() -> Result<slog_async::Async> {
    let drain = slog_async::Async::new(slog::Discard)
        .chan_size(CHANNEL_SIZE)
        .build();

    Ok(drain)
}

// term drain: Log to Terminal
fn default_term_drain() -> Result<slog_async::Async> {
    #[cfg(feature = "termlog")]
    let decorator = slog_term::TermDecorator::new().stderr().build();
    #[cfg(not(feature = "termlog"))]
    let decorator = slog_term::PlainSyncDecorator::new(std::io::stderr());

    let term = slog_term::FullFormat::new(decorator)
        .use_custom_timestamp(slog_term::timestamp_local);

    let drain = slog_async::Async::new(term.build().fuse())
        .chan_size(CHANNEL_SIZE)
        .build();

    Ok(drain)
}

fn resolve_log_dir(log_dir: &str) -> Result<PathBuf> {
    if !log_dir.is_empty() {
        return Ok(PathBuf::from(log_dir));
    }

    let mut exe_dir = std::env::current_exe()?;
    exe_dir.pop();
    if !exe_dir.exists() {
        exe_dir = std::env::current_dir()?;
    }
    Ok(exe_dir.join("logs"))
}

// file drain: Log to file
fn default_file_drain(log_dir: &str) -> Result<slog_async::Async> {
    let log_dir = resolve_log_dir(log_dir)?;
    std::fs::create_dir_all(&log_dir)?;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join(LOG_FILE_NAME))?;

    let decorator = slog_term::PlainSyncDecorator::new(file);
    let formatter = slog_term::FullFormat::new(decorator)
        .use_file_location()
        .use_custom_timestamp(slog_term::timestamp_local)
        .build()
        .fuse();

    let drain = slog_async::Async::new(formatter)
        .chan_size(CHANNEL_SIZE)
        .build();

    Ok(drain)
}

// syslog drain: Log to syslog
#[cfg(feature = "syslog")]
fn default_syslog_drain() -> Result<slog_async::Async> {
    let syslog = slog_syslog::unix_3164(Facility::LOG_USER)?;

    let drain = slog_async::Async::new(syslog.fuse())
        .chan_size(CHANNEL_SIZE)
        .build();

    Ok(drain)
}

#[cfg(all(target_os = "linux", feature = "journald"))]
fn default_journald_drain() -> Result<slog_async::Async> {
    let journald = JournaldDrain.ignore_res();
    let drain = slog_async::Async::new(journald)
        .chan_size(CHANNEL_SIZE)
        .build();

    Ok(drain)
}
