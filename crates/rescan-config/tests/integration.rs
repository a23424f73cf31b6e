use std::io::Write;
use std::path::Path;

use rescan_config::{ConfigError, LogFormatSetting, Verbosity, load_from_path};
use rescan_core::RewriteRule;

const FULL_CONFIG: &str = r"
host: 127.0.0.1
port: 4040
logging:
  level: debug
  format: json
triggers:
  tdarr:
    - name: tdarr
      priority: 5
      verbosity: trace
      rewrite:
        - from: ^/data/
          to: /mnt/media/
    - name: tdarr-4k
      rewrite:
        - from: ^/uhd/(.*)$
          to: /mnt/uhd/$1
";

#[test]
fn loads_full_configuration_from_disk() -> anyhow::Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(FULL_CONFIG.as_bytes())?;

    let config = load_from_path(file.path())?;
    assert_eq!(config.bind_addr().to_string(), "127.0.0.1:4040");
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, Some(LogFormatSetting::Json));

    let names: Vec<&str> = config.triggers.names().collect();
    assert_eq!(names, vec!["tdarr", "tdarr-4k"]);

    let primary = &config.triggers.tdarr[0];
    assert_eq!(primary.priority, 5);
    assert_eq!(primary.verbosity, Verbosity::Trace);
    assert_eq!(primary.rewrite, vec![RewriteRule::new("^/data/", "/mnt/media/")]);

    let secondary = &config.triggers.tdarr[1];
    assert_eq!(secondary.priority, 0);
    assert_eq!(secondary.verbosity, Verbosity::Info);
    Ok(())
}

#[test]
fn missing_file_reports_io_error_with_path() {
    let err = load_from_path(Path::new("/definitely/missing/rescan.yml")).unwrap_err();
    match err {
        ConfigError::Io { path, .. } => {
            assert_eq!(path, Path::new("/definitely/missing/rescan.yml"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn parse_errors_carry_the_source_path() -> anyhow::Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(b"triggers:\n  tdarr:\n    - verbosity: shouting\n")?;

    let err = load_from_path(file.path()).unwrap_err();
    match err {
        ConfigError::Parse { path, .. } => assert_eq!(path.as_deref(), Some(file.path())),
        other => panic!("unexpected error: {other:?}"),
    }
    Ok(())
}

#[test]
fn invalid_rewrite_is_rejected_at_load_time() -> anyhow::Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(b"triggers:\n  tdarr:\n    - rewrite:\n        - from: '(('\n          to: /x\n")?;

    let err = load_from_path(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidRewrite { ref trigger, .. } if trigger == "tdarr"));
    Ok(())
}
