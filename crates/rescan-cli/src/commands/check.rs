use rescan_api::trigger_route;
use rescan_config::{AppConfig, load_from_path};

use crate::cli::{CheckArgs, OutputFormat, resolve_config};
use crate::client::CliResult;
use crate::output::{CheckReport, TriggerRow, render_check};

pub(crate) fn handle_check(args: &CheckArgs, format: OutputFormat) -> CliResult<()> {
    let path = resolve_config(args.config.as_ref());
    let config = load_from_path(&path)?;
    let report = build_report(&path.display().to_string(), &config);
    print!("{}", render_check(&report, format)?);
    Ok(())
}

pub(crate) fn build_report(path: &str, config: &AppConfig) -> CheckReport {
    CheckReport {
        path: path.to_string(),
        listen: config.bind_addr().to_string(),
        log_level: config.logging.level.clone(),
        triggers: config
            .triggers
            .tdarr
            .iter()
            .map(|tdarr| TriggerRow {
                name: tdarr.name.clone(),
                kind: "tdarr",
                route: trigger_route(&tdarr.name),
                priority: tdarr.priority,
                verbosity: tdarr.verbosity.as_str(),
                rewrite_rules: tdarr.rewrite.len(),
            })
            .collect(),
    }
}
