//! Output renderers and formatting helpers for CLI commands.

use anyhow::anyhow;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

/// Summary of a validated configuration file.
#[derive(Debug, Serialize)]
pub(crate) struct CheckReport {
    pub(crate) path: String,
    pub(crate) listen: String,
    pub(crate) log_level: String,
    pub(crate) triggers: Vec<TriggerRow>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TriggerRow {
    pub(crate) name: String,
    pub(crate) kind: &'static str,
    pub(crate) route: String,
    pub(crate) priority: i32,
    pub(crate) verbosity: &'static str,
    pub(crate) rewrite_rules: usize,
}

/// Result of previewing a notification against a trigger.
#[derive(Debug, Serialize)]
pub(crate) struct PreviewReport {
    pub(crate) trigger: String,
    pub(crate) path: String,
    pub(crate) folder: String,
}

pub(crate) fn render_check(report: &CheckReport, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => to_json(report),
        OutputFormat::Table => {
            let mut lines = vec![
                format!("config: {}", report.path),
                format!("listen: {}", report.listen),
                format!("log level: {}", report.log_level),
            ];
            if report.triggers.is_empty() {
                lines.push("no triggers configured".to_string());
            } else {
                lines.push(trigger_line(
                    "NAME", "KIND", "ROUTE", "PRIORITY", "VERBOSITY", "RULES",
                ));
                lines.extend(report.triggers.iter().map(|row| {
                    trigger_line(
                        &row.name,
                        row.kind,
                        &row.route,
                        &row.priority.to_string(),
                        row.verbosity,
                        &row.rewrite_rules.to_string(),
                    )
                }));
            }
            Ok(lines.join("\n") + "\n")
        }
    }
}

fn trigger_line(
    name: &str,
    kind: &str,
    route: &str,
    priority: &str,
    verbosity: &str,
    rules: &str,
) -> String {
    format!("{name:<20} {kind:<6} {route:<28} {priority:>8} {verbosity:<9} {rules:>5}")
}

pub(crate) fn render_preview(report: &PreviewReport, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => to_json(report),
        OutputFormat::Table => Ok(format!(
            "trigger: {}\npath: {}\nfolder: {}\n",
            report.trigger, report.path, report.folder
        )),
    }
}

fn to_json<T: Serialize>(value: &T) -> CliResult<String> {
    serde_json::to_string_pretty(value)
        .map(|text| text + "\n")
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> CheckReport {
        CheckReport {
            path: "config.yml".into(),
            listen: "0.0.0.0:3030".into(),
            log_level: "info".into(),
            triggers: vec![TriggerRow {
                name: "tdarr".into(),
                kind: "tdarr",
                route: "/triggers/tdarr".into(),
                priority: 1,
                verbosity: "info",
                rewrite_rules: 2,
            }],
        }
    }

    #[test]
    fn check_table_lists_triggers() {
        let text = render_check(&report(), OutputFormat::Table).expect("render");
        assert!(text.contains("listen: 0.0.0.0:3030"));
        assert!(text.contains("NAME"));
        assert!(text.contains("/triggers/tdarr"));
    }

    #[test]
    fn check_table_ends_each_row_with_newline() {
        let text = render_check(&report(), OutputFormat::Table).expect("render");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[4], "tdarr                tdarr  /triggers/tdarr                     1 info          2");
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn check_table_notes_empty_trigger_list() {
        let mut report = report();
        report.triggers.clear();
        let text = render_check(&report, OutputFormat::Table).expect("render");
        assert!(text.contains("no triggers configured"));
        assert!(!text.contains("NAME"));
    }

    #[test]
    fn check_json_is_structured() {
        let text = render_check(&report(), OutputFormat::Json).expect("render");
        let value: serde_json::Value = serde_json::from_str(&text).expect("json");
        assert_eq!(value["triggers"][0]["rewrite_rules"], 2);
        assert_eq!(value["listen"], "0.0.0.0:3030");
    }

    #[test]
    fn preview_renders_both_formats() {
        let report = PreviewReport {
            trigger: "tdarr".into(),
            path: "/mnt/media/movies/Foo/movie.mkv".into(),
            folder: "/mnt/media/movies/Foo".into(),
        };
        let table = render_preview(&report, OutputFormat::Table).expect("render");
        assert!(table.contains("folder: /mnt/media/movies/Foo\n"));
        let json = render_preview(&report, OutputFormat::Json).expect("render");
        let value: serde_json::Value = serde_json::from_str(&json).expect("json");
        assert_eq!(value["folder"], "/mnt/media/movies/Foo");
    }
}
