use std::sync::Arc;

use anyhow::anyhow;
use rescan_api::{TdarrTrigger, TriggerDeps};
use rescan_config::{AppConfig, load_from_path};
use rescan_core::{ProcessorFn, ScanRequest, paths};

use crate::cli::{OutputFormat, PreviewArgs, resolve_config};
use crate::client::{CliError, CliResult};
use crate::output::{PreviewReport, render_preview};

pub(crate) fn handle_preview(args: &PreviewArgs, format: OutputFormat) -> CliResult<()> {
    let path = resolve_config(args.config.as_ref());
    let config = load_from_path(&path)?;
    let report = preview(&config, args)?;
    print!("{}", render_preview(&report, format)?);
    Ok(())
}

pub(crate) fn preview(config: &AppConfig, args: &PreviewArgs) -> CliResult<PreviewReport> {
    if args.file.is_empty() || args.directory.is_empty() {
        return Err(CliError::validation(
            "both --directory and --file must be non-empty; the trigger would reject this event",
        ));
    }
    let tdarr = config
        .triggers
        .tdarr
        .iter()
        .find(|tdarr| tdarr.name == args.trigger)
        .ok_or_else(|| {
            CliError::validation(format!("trigger '{}' is not configured", args.trigger))
        })?;

    // Preview never dispatches; the processor only satisfies construction.
    let discard = ProcessorFn::new(|_scan: ScanRequest| Ok(()));
    let trigger = TdarrTrigger::new(tdarr, TriggerDeps::new(Arc::new(discard)))
        .map_err(|err| CliError::failure(anyhow!(err)))?;

    Ok(PreviewReport {
        trigger: tdarr.name.clone(),
        path: paths::join(&args.directory, &args.file),
        folder: trigger.folder_for(&args.directory, &args.file),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rescan_config::load_from_str;

    fn config() -> AppConfig {
        load_from_str(
            "triggers:\n  tdarr:\n    - name: tdarr\n      rewrite:\n        - from: ^/data/movies/\n          to: /mnt/films/\n        - from: ^/data/\n          to: /mnt/media/\n    - name: raw\n",
        )
        .expect("config")
    }

    fn args(trigger: &str, directory: &str, file: &str) -> PreviewArgs {
        PreviewArgs {
            trigger: trigger.to_string(),
            directory: directory.to_string(),
            file: file.to_string(),
            config: None,
        }
    }

    #[test]
    fn preview_applies_first_matching_rule() {
        let report = preview(&config(), &args("tdarr", "/data/movies/Foo", "movie.mkv"))
            .expect("preview");
        assert_eq!(report.path, "/data/movies/Foo/movie.mkv");
        assert_eq!(report.folder, "/mnt/films/Foo");

        let report =
            preview(&config(), &args("tdarr", "/data/tv/Show", "ep.mkv")).expect("preview");
        assert_eq!(report.folder, "/mnt/media/tv/Show");
    }

    #[test]
    fn preview_without_rules_strips_file_name() {
        let report = preview(&config(), &args("raw", "/data/movies/Foo/", "movie.mkv"))
            .expect("preview");
        assert_eq!(report.folder, "/data/movies/Foo");
    }

    #[test]
    fn unknown_trigger_is_a_validation_error() {
        let err = preview(&config(), &args("sonarr", "/data", "a.mkv")).expect_err("unknown");
        assert_eq!(err.exit_code(), 2);
        assert!(err.display_message().contains("sonarr"));
    }

    #[test]
    fn empty_inputs_are_rejected() {
        assert!(preview(&config(), &args("tdarr", "", "a.mkv")).is_err());
        assert!(preview(&config(), &args("tdarr", "/data", "")).is_err());
    }
}
