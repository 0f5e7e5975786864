#[cfg(not(debug_assertions))]
use human_panic::setup_panic;

#[cfg(debug_assertions)]
extern crate better_panic;

use utils::app_config::AppConfig;
use utils::error::Result;

/// The main entry point of the application.
#[tokio::main]
async fn main() -> Result<()> {
    // Human Panic. Only enabled when *not* debugging.
    #[cfg(not(debug_assertions))]
    {
        setup_panic!();
    }

    // Better Panic. Only enabled *when* debugging.
    #[cfg(debug_assertions)]
    {
        better_panic::Settings::debug()
            .most_recent_first(false)
            .lineno_suffix(true)
            .verbosity(better_panic::Verbosity::Full)
            .install();
    }

    // Parse first so --help and --version never touch configuration
    let cli = cli::parse();

    // Embedded defaults, then the user's file
    let config_contents = include_str!("resources/default_config.toml");
    AppConfig::init(Some(config_contents))?;
    AppConfig::merge_config(cli.config.as_deref())?;

    let _guard = utils::logger::setup_logging(cli.effective_log_level().as_deref())?;

    cli::cli_match(cli).await?;

    Ok(())
}
