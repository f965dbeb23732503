//! Configuration loading from files and environment overrides.

mod support;

use std::io::Write;
use std::path::PathBuf;

use farmstand::config::{AppConfig, ConfigError, ENV_CONFIG, ENV_MONTH, ENV_POLICY, ENV_SEED};
use farmstand::models::MissingBoundPolicy;
use support::with_scoped_env;

const ALL_VARS: [&str; 4] = [ENV_CONFIG, ENV_MONTH, ENV_POLICY, ENV_SEED];

fn config_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn cleared<'a>(extra: &[(&'a str, Option<&'a str>)]) -> Vec<(&'a str, Option<&'a str>)> {
    let mut changes: Vec<_> = ALL_VARS.iter().map(|k| (*k, None)).collect();
    changes.extend_from_slice(extra);
    changes
}

#[test]
fn test_explicit_config_path() {
    let file = config_file(
        r#"
[availability]
policy = "permissive"

[calendar]
default_month = "2023-07"
"#,
    );
    let path = file.path().to_str().unwrap();

    let config = with_scoped_env(&cleared(&[(ENV_CONFIG, Some(path))]), AppConfig::load).unwrap();
    assert_eq!(config.availability.policy, MissingBoundPolicy::Permissive);
    assert_eq!(config.calendar.default_month.unwrap().to_string(), "2023-07");
}

#[test]
fn test_env_overrides_file_values() {
    let file = config_file(
        r#"
[availability]
policy = "permissive"

[catalog]
seed_path = "from-file.json"
"#,
    );
    let path = file.path().to_str().unwrap();

    let config = with_scoped_env(
        &cleared(&[
            (ENV_CONFIG, Some(path)),
            (ENV_POLICY, Some("strict")),
            (ENV_SEED, Some("from-env.json")),
            (ENV_MONTH, Some("2024-02")),
        ]),
        AppConfig::load,
    )
    .unwrap();

    assert_eq!(config.availability.policy, MissingBoundPolicy::Strict);
    assert_eq!(config.catalog.seed_path, Some(PathBuf::from("from-env.json")));
    assert_eq!(config.calendar.default_month.unwrap().days_in_month(), 29);
}

#[test]
fn test_invalid_env_values() {
    let err = with_scoped_env(&[(ENV_POLICY, Some("sometimes"))], || {
        AppConfig::default().apply_env_overrides()
    })
    .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == ENV_POLICY));

    let err = with_scoped_env(&[(ENV_POLICY, None), (ENV_MONTH, Some("2024-2"))], || {
        AppConfig::default().apply_env_overrides()
    })
    .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == ENV_MONTH));
}

#[test]
fn test_blank_seed_clears_path() {
    let mut config = AppConfig::default();
    config.catalog.seed_path = Some(PathBuf::from("catalog.json"));
    with_scoped_env(&cleared(&[(ENV_SEED, Some(""))]), || {
        config.apply_env_overrides()
    })
    .unwrap();
    assert_eq!(config.catalog.seed_path, None);
}

#[test]
fn test_missing_explicit_config_is_an_error() {
    let result = with_scoped_env(
        &cleared(&[(ENV_CONFIG, Some("/no/such/dir/farmstand.toml"))]),
        AppConfig::load,
    );
    assert!(matches!(result, Err(ConfigError::Read { .. })));
}

#[test]
fn test_malformed_file() {
    let file = config_file("[availability\npolicy = ");
    let err = AppConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}
