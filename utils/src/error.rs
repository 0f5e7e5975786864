use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Crate-wide error type.
///
/// File-level failures never surface here: they are contained where the file
/// is evaluated. What reaches this type is either fatal for the whole run
/// (bad input, configuration, logger setup) or fatal for one root.
#[derive(Error, Debug)]
pub enum Error {
    #[error("{msg}")]
    Message {
        msg: String,
        #[source]
        source: Option<BoxedSource>,
    },

    /// A list source (file of directories, exclusions, types or names) could not be read.
    #[error("Input unavailable: {}: {source}", .path.display())]
    InputUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A root directory given on the command line does not exist.
    #[error("Directory does not exist: {0}")]
    RootMissing(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Logger setup failed: {0}")]
    Logger(#[from] log::SetLoggerError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub fn new(msg: &str) -> Self {
        Error::Message {
            msg: msg.to_string(),
            source: None,
        }
    }

    pub fn with_source(msg: &str, source: BoxedSource) -> Self {
        Error::Message {
            msg: msg.to_string(),
            source: Some(source),
        }
    }

    /// Whether the error stops the whole run rather than a single root.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::RootMissing(_))
    }
}
