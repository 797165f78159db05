//! Configuration loading tests
//!
//! Covers TOML file loading, graceful fallback to defaults when the file is
//! missing, and environment overrides.
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate process environment variables are marked #[serial].

use roster_common::config::{TomlConfig, DEFAULT_PORT};
use roster_common::Error;
use serial_test::serial;
use std::env;
use std::fs;
use tempfile::TempDir;

const SHEET_VARS: [&str; 3] = ["SPREADSHEET_ID", "RANGE", "GOOGLE_SHEETS_API_KEY"];

fn clear_env() {
    for var in SHEET_VARS {
        env::remove_var(var);
    }
    env::remove_var("ADMIN_TOKEN");
    env::remove_var("ROSTER_DATA_DIR");
    env::remove_var("GEMINI_API_KEY");
    env::remove_var("GOOGLE_GENAI_API_KEY");
}

#[test]
fn test_missing_explicit_file_uses_defaults() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("does-not-exist.toml");

    let config = TomlConfig::load_or_default(Some(&path)).unwrap();
    assert_eq!(config.port(), DEFAULT_PORT);
    assert!(config.sheets.spreadsheet_id.is_none());
}

#[test]
fn test_load_from_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    fs::write(
        &path,
        r#"
port = 6000
data_dir = "/var/lib/fleet-roster"

[sheets]
spreadsheet_id = "1AbC"
range = "Roster!A1:M"
"#,
    )
    .unwrap();

    let config = TomlConfig::load_or_default(Some(&path)).unwrap();
    assert_eq!(config.port(), 6000);
    assert_eq!(config.sheets.range.as_deref(), Some("Roster!A1:M"));
    // API key still missing
    assert!(matches!(config.sheets.validate(), Err(Error::Config(_))));
}

#[test]
fn test_invalid_toml_is_config_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    fs::write(&path, "port = [not a number").unwrap();

    assert!(matches!(
        TomlConfig::load_or_default(Some(&path)),
        Err(Error::Config(_))
    ));
}

#[test]
#[serial]
fn test_process_env_completes_sheet_config() {
    clear_env();
    env::set_var("SPREADSHEET_ID", "env-sheet");
    env::set_var("RANGE", "Fleet!A:M");
    env::set_var("GOOGLE_SHEETS_API_KEY", "env-key");

    let config = TomlConfig::default().apply_env();
    let coords = config.sheets.validate().unwrap();
    assert_eq!(coords.spreadsheet_id, "env-sheet");
    assert_eq!(coords.range, "Fleet!A:M");
    assert_eq!(coords.api_key, "env-key");

    clear_env();
}

#[test]
#[serial]
fn test_process_env_data_dir_and_admin_token() {
    clear_env();
    env::set_var("ROSTER_DATA_DIR", "/tmp/roster-env-data");
    env::set_var("ADMIN_TOKEN", "letmein");

    let config = TomlConfig::default().apply_env();
    assert_eq!(
        config.data_dir(),
        std::path::PathBuf::from("/tmp/roster-env-data")
    );
    assert_eq!(config.admin_token(), Some("letmein"));

    clear_env();
}
