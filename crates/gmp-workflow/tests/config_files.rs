use gmp_workflow::{ConcurrencyMode, ConfigError, WorkflowConfig};
use std::io::Write;

fn write_temp(suffix: &str, body: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(body.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_yaml_file() {
    let file = write_temp(
        ".yaml",
        "session_ttl_secs: 3600\nconfirmation_ttl_secs: 120\nconcurrency: last_writer_wins\n",
    );
    let cfg = WorkflowConfig::load(file.path()).unwrap();
    assert_eq!(cfg.session_ttl_secs, 3_600);
    assert_eq!(cfg.confirmation_ttl_secs, 120);
    assert_eq!(cfg.concurrency, ConcurrencyMode::LastWriterWins);
    assert!(cfg.enforce_plant_scope);
}

#[test]
fn test_load_toml_file() {
    let file = write_temp(".toml", "enforce_plant_scope = false\n\n[log]\njson = true\n");
    let cfg = WorkflowConfig::load(file.path()).unwrap();
    assert_eq!(
        cfg,
        WorkflowConfig::default()
            .with_plant_scope(false)
            .with_log(gmp_workflow::LogConfig {
                filter: "info".into(),
                json: true,
            })
    );
}

#[test]
fn test_unknown_extension_is_rejected() {
    let file = write_temp(".ini", "session_ttl_secs = 1\n");
    let err = WorkflowConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::UnsupportedFormat(ext) if ext == "ini"));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = WorkflowConfig::load(dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}
