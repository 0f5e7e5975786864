use app::audit::{audit, AuditParams};
use app::report::ReportConfig;
use utils::app_config::AppConfig;

use crate::input::parse_input_list;
use crate::AuditArgs;

pub async fn audit_cmd(args: AuditArgs) -> utils::error::Result<()> {
    let config = AppConfig::fetch()?;

    let params = AuditParams {
        directories: parse_input_list(&args.directories)?,
        exclude: parse_input_list(&args.exclude)?,
        extensions: parse_input_list(&args.types)?,
        names: parse_input_list(&args.names)?,
        verbose: args.verbose || config.audit.verbose,
        suppress: args.suppress || config.audit.suppress,
        stealth: args.opsec || config.audit.stealth,
        follow_links: args.follow_links || config.audit.follow_links,
    };

    log::info!("directory: {}", params.directories.join(", "));
    log::info!("exclude: {}", params.exclude.join(", "));
    log::info!("file type: {}", params.extensions.join(", "));
    log::info!("name: {}", params.names.join(", "));
    log::info!(
        "verbose: {}, suppress: {}, opsec: {}, follow links: {}",
        params.verbose,
        params.suppress,
        params.stealth,
        params.follow_links
    );

    if params.directories.is_empty() {
        return Err(utils::error::Error::new("No directories specified for processing"));
    }

    let report_config = ReportConfig::from_settings(&config.report, params.suppress);
    let summary = audit(params, report_config).await?;

    if summary.roots_missing.is_empty() {
        println!("Audit completed successfully!");
    } else {
        println!(
            "Audit completed with {} missing directories!",
            summary.roots_missing.len()
        );
    }
    Ok(())
}
