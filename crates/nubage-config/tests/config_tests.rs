use std::{fs, path::PathBuf};

use nubage_config::{Config, ConfigError, ConfigManager, CONFIG_FILE_NAME};
use tempfile::tempdir;

#[test]
fn default_config_enables_color_and_exit_prompt() {
    let cfg = Config::default();

    assert!(cfg.color_enabled);
    assert!(cfg.confirm_exit_with_pending_changes);
    assert!(cfg.default_ledger_dir.is_none());
    assert!(cfg.last_opened_ledger.is_none());
}

#[test]
fn missing_file_loads_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("absent.json"));

    assert_eq!(manager.load().expect("load config"), Config::default());
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().join("home")).expect("manager");
    assert_eq!(
        manager.config_path(),
        dir.path().join("home").join(CONFIG_FILE_NAME)
    );

    let cfg = Config {
        default_ledger_dir: Some(PathBuf::from("/tmp/ledgers")),
        last_opened_ledger: Some(PathBuf::from("budget.json")),
        color_enabled: false,
        confirm_exit_with_pending_changes: false,
    };
    manager.save(&cfg).expect("save config");
    let loaded = manager.load().expect("load config");

    assert_eq!(loaded, cfg);
    assert!(!dir.path().join("home").join("config.json.tmp").exists());
}

#[test]
fn partial_document_fills_in_defaults() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{ "color_enabled": false }"#).expect("write");

    let loaded = ConfigManager::new(&path).load().expect("load config");
    assert!(!loaded.color_enabled);
    assert!(loaded.confirm_exit_with_pending_changes);
}

#[test]
fn malformed_document_is_serde_error() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    fs::write(&path, "{ color_enabled").expect("write");

    let err = ConfigManager::new(&path).load().unwrap_err();
    assert!(matches!(err, ConfigError::Serde(_)));
}
