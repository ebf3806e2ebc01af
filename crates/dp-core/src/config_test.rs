use super::*;
use std::fs;
use tempfile::tempdir;

const MINIMAL: &str = r#"
db:
  host: 127.0.0.1
  user: root
  password: secret
  name: app
"#;

#[test]
fn test_parse_minimal_config() {
    let config = Config::parse(MINIMAL, Path::new("config.yaml")).unwrap();
    assert_eq!(config.db.host, "127.0.0.1");
    assert_eq!(config.db.port, 3306);
    assert_eq!(config.db.user, "root");
    assert_eq!(config.db.password, "secret");
    assert_eq!(config.db.name, "app");
    assert_eq!(config.db.client_bin, "mysql");
    assert_eq!(config.ledger.path, ".dbpatch/ledger.duckdb");
    assert_eq!(config.changes.extension, "sql");
}

#[test]
fn test_parse_legacy_keys() {
    let yaml = r#"
db:
  host: db.internal
  port: 3307
  user: deploy
  pwd: hunter2
  name: shop
  mysql_bin: /usr/local/bin/mysql
"#;
    let config = Config::parse(yaml, Path::new("config.yaml")).unwrap();
    assert_eq!(config.db.port, 3307);
    assert_eq!(config.db.password, "hunter2");
    assert_eq!(config.db.client_bin, "/usr/local/bin/mysql");
}

#[test]
fn test_extension_leading_dot_is_stripped() {
    let yaml = format!("{MINIMAL}changes:\n  extension: .SQL\n");
    let config = Config::parse(&yaml, Path::new("config.yaml")).unwrap();
    assert_eq!(config.changes.extension, "SQL");
}

#[test]
fn test_empty_host_is_invalid() {
    let yaml = r#"
db:
  host: ""
  user: root
  name: app
"#;
    let err = Config::parse(yaml, Path::new("config.yaml")).unwrap_err();
    assert!(matches!(err, CoreError::ConfigInvalid { .. }));
    assert!(err.to_string().contains("db.host"));
}

#[test]
fn test_missing_required_field_is_parse_error() {
    let yaml = "db:\n  host: localhost\n";
    let err = Config::parse(yaml, Path::new("config.yaml")).unwrap_err();
    assert!(matches!(err, CoreError::ConfigParseError { .. }));
}

#[test]
fn test_unknown_field_is_rejected() {
    let yaml = format!("{MINIMAL}  charset: utf8\n");
    let err = Config::parse(&yaml, Path::new("config.yaml")).unwrap_err();
    assert!(matches!(err, CoreError::ConfigParseError { .. }));
}

#[test]
fn test_debug_redacts_password() {
    let config = Config::parse(MINIMAL, Path::new("config.yaml")).unwrap();
    let rendered = format!("{:?}", config);
    assert!(!rendered.contains("secret"));
    assert!(rendered.contains("****"));
}

#[test]
fn test_target_label_omits_password() {
    let config = Config::parse(MINIMAL, Path::new("config.yaml")).unwrap();
    assert_eq!(config.db.label(), "root@127.0.0.1:3306/app");
}

#[test]
fn test_load_missing_file() {
    let dir = tempdir().unwrap();
    let err = Config::load(&dir.path().join("nope.yaml")).unwrap_err();
    assert!(matches!(err, CoreError::ConfigNotFound { .. }));
}

#[test]
fn test_load_from_dir_prefers_yaml() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("config.yml"), "db: [").unwrap();
    fs::write(dir.path().join("config.yaml"), MINIMAL).unwrap();

    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.db.name, "app");
}

#[test]
fn test_load_from_dir_falls_back_to_yml() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("config.yml"), MINIMAL).unwrap();

    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.db.user, "root");
}

#[test]
fn test_load_from_dir_without_config() {
    let dir = tempdir().unwrap();
    let err = Config::load_from_dir(dir.path()).unwrap_err();
    match err {
        CoreError::ConfigNotFound { path } => assert!(path.ends_with("config.yaml")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_ledger_path_absolute() {
    let mut config = Config::parse(MINIMAL, Path::new("config.yaml")).unwrap();
    let root = Path::new("/srv/changes");
    assert_eq!(
        config.ledger_path_absolute(root),
        Some(root.join(".dbpatch/ledger.duckdb"))
    );

    config.ledger.path = ":memory:".to_string();
    assert_eq!(config.ledger_path_absolute(root), None);
}
