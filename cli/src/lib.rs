use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use utils::app_config::AppConfig;

mod commands;
pub mod input;

#[derive(Parser)]
#[command(name = "permscan", version)]
#[command(about = "Find files the current user can read or write", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Set the logging level (debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Configuration file layered over the built-in defaults
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Audit one or more directory trees
    Audit(AuditArgs),
}

/// Every list option takes a single value, a comma separated list or a file
/// holding one entry per line. Repeated options accumulate.
#[derive(Args, Debug, Clone, Default)]
pub struct AuditArgs {
    /// Root directories to audit
    #[arg(short, long = "directory", value_name = "PATH|LIST|FILE", required = true)]
    pub directories: Vec<String>,

    /// Path prefixes to skip
    #[arg(short, long, value_name = "PATH|LIST|FILE")]
    pub exclude: Vec<String>,

    /// File extensions to keep (`txt` or `.txt`)
    #[arg(short = 't', long = "type", value_name = "EXT|LIST|FILE")]
    pub types: Vec<String>,

    /// File name substrings to keep
    #[arg(short, long = "name", value_name = "NAME|LIST|FILE")]
    pub names: Vec<String>,

    /// Log every included and excluded file
    #[arg(short, long)]
    pub verbose: bool,

    /// Do not write any report output
    #[arg(short, long)]
    pub suppress: bool,

    /// Silently skip files the current user cannot read
    #[arg(short, long = "opsec", visible_alias = "stealth")]
    pub opsec: bool,

    /// Follow symbolic links while walking
    #[arg(long)]
    pub follow_links: bool,
}

impl Cli {
    /// Level handed to the logger. `--verbose` raises the configured level to
    /// `info` so per-file lines show up; an explicit `--log-level` wins.
    pub fn effective_log_level(&self) -> Option<String> {
        if self.log_level.is_some() {
            return self.log_level.clone();
        }

        match &self.command {
            Commands::Audit(args) if args.verbose => {
                let configured = AppConfig::get::<String>("log.level").unwrap_or_default();
                match configured.to_ascii_lowercase().as_str() {
                    "trace" | "debug" | "info" => None,
                    _ => Some("info".to_string()),
                }
            }
            _ => None,
        }
    }
}

/// Parse the process arguments.
pub fn parse() -> Cli {
    Cli::parse()
}

pub async fn cli_match(cli: Cli) -> utils::error::Result<()> {
    match cli.command {
        Commands::Audit(args) => commands::audit_cmd(args).await?,
    }

    Ok(())
}
