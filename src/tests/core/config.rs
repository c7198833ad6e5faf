// Configuration file tests

use crate::config::*;
use crate::models::ExecutionMode;
use crate::tests::helpers::unique_temp_dir;
use serial_test::serial;
use std::fs;

/// Runs `f` with VISUAL/EDITOR set as given, restoring the old values afterwards
fn with_editor_env<F: FnOnce()>(visual: Option<&str>, editor: Option<&str>, f: F) {
    let saved: Vec<(&str, Option<String>)> = ["VISUAL", "EDITOR"]
        .iter()
        .map(|var| (*var, std::env::var(var).ok()))
        .collect();

    for (var, value) in [("VISUAL", visual), ("EDITOR", editor)] {
        // SAFETY: env-touching tests are #[serial]
        unsafe {
            match value {
                Some(value) => std::env::set_var(var, value),
                None => std::env::remove_var(var),
            }
        }
    }

    f();

    for (var, value) in saved {
        unsafe {
            match value {
                Some(value) => std::env::set_var(var, value),
                None => std::env::remove_var(var),
            }
        }
    }
}

#[test]
fn test_first_load_writes_default_file() {
    let temp_dir = unique_temp_dir("config_default");
    let mut manager = ConfigManager::with_config_dir(temp_dir.path().join("fredo"));

    let config = manager.load().unwrap().clone();
    assert_eq!(config, FredoConfig::default());
    assert_eq!(config.default_search_limit, 10);
    assert_eq!(config.default_execution_mode, ExecutionMode::Current);
    assert!(manager.config_file().exists());

    let written = fs::read_to_string(manager.config_file()).unwrap();
    assert!(written.contains("database_path"));
    assert!(!written.contains("editor"), "unset editor is omitted: {}", written);
}

#[test]
fn test_partial_file_falls_back_to_defaults() {
    let temp_dir = unique_temp_dir("config_partial");
    fs::write(
        temp_dir.path().join(CONFIG_FILE_NAME),
        "editor = \"nano\"\ndefault_execution_mode = \"isolated\"\n",
    )
    .unwrap();

    let mut manager = ConfigManager::with_config_dir(temp_dir.path());
    let config = manager.load().unwrap();

    assert_eq!(config.editor.as_deref(), Some("nano"));
    assert_eq!(config.default_execution_mode, ExecutionMode::Isolated);
    assert_eq!(config.default_search_limit, 10);
    assert_eq!(config.database_path, FredoConfig::default().database_path);
}

#[test]
fn test_malformed_file_is_a_parse_error() {
    let temp_dir = unique_temp_dir("config_malformed");
    fs::write(temp_dir.path().join(CONFIG_FILE_NAME), "editor = [unclosed").unwrap();

    let mut manager = ConfigManager::with_config_dir(temp_dir.path());
    assert!(matches!(manager.load(), Err(ConfigError::Parse(_))));
}

#[test]
fn test_load_is_cached() {
    let temp_dir = unique_temp_dir("config_cache");
    let mut manager = ConfigManager::with_config_dir(temp_dir.path());
    manager.load().unwrap();

    fs::write(manager.config_file(), "default_search_limit = 3\n").unwrap();
    assert_eq!(manager.load().unwrap().default_search_limit, 10);

    let mut fresh = ConfigManager::with_config_dir(temp_dir.path());
    assert_eq!(fresh.load().unwrap().default_search_limit, 3);
}

#[test]
fn test_set_persists_and_get_reads_back() {
    let temp_dir = unique_temp_dir("config_set");
    let mut manager = ConfigManager::with_config_dir(temp_dir.path());

    manager.set("default_search_limit", "25").unwrap();
    manager.set("default_execution_mode", "isolated").unwrap();
    manager.set("editor", "code --wait").unwrap();

    assert_eq!(manager.get("default_search_limit").unwrap().as_deref(), Some("25"));

    let mut reloaded = ConfigManager::with_config_dir(temp_dir.path());
    let config = reloaded.load().unwrap();
    assert_eq!(config.default_search_limit, 25);
    assert_eq!(config.default_execution_mode, ExecutionMode::Isolated);
    assert_eq!(config.editor.as_deref(), Some("code --wait"));
}

#[test]
fn test_set_rejects_unknown_keys_and_bad_values() {
    let temp_dir = unique_temp_dir("config_invalid");
    let mut manager = ConfigManager::with_config_dir(temp_dir.path());

    assert!(matches!(
        manager.set("github_token", "abc"),
        Err(ConfigError::UnknownKey(key)) if key == "github_token"
    ));
    assert!(matches!(
        manager.set("default_search_limit", "-1"),
        Err(ConfigError::InvalidValue { .. })
    ));
    assert!(matches!(
        manager.set("default_execution_mode", "sandbox"),
        Err(ConfigError::InvalidValue { .. })
    ));
    assert!(matches!(manager.get("nope"), Err(ConfigError::UnknownKey(_))));

    // Nothing was persisted by the failed writes
    assert_eq!(manager.load().unwrap(), &FredoConfig::default());
}

#[test]
fn test_empty_editor_clears_it() {
    let mut config = FredoConfig::default();
    config.set("editor", "vim").unwrap();
    config.set("editor", "  ").unwrap();

    assert_eq!(config.editor, None);
    assert_eq!(config.get("editor").unwrap(), None);
}

#[test]
fn test_database_path_expands_tilde() {
    let config = FredoConfig::default();
    let path = config.database_path();

    assert!(!path.to_string_lossy().starts_with('~'));
    assert!(path.ends_with(".local/share/fredo/snippets.db"));
}

#[test]
#[serial]
fn test_configured_editor_wins_over_environment() {
    let temp_dir = unique_temp_dir("config_editor");
    let mut manager = ConfigManager::with_config_dir(temp_dir.path());
    manager.set("editor", "nano").unwrap();

    with_editor_env(Some("emacs"), Some("vi"), || {
        assert_eq!(manager.get_editor().unwrap(), "nano");
    });
}

#[test]
#[serial]
fn test_editor_falls_back_visual_then_editor_then_vim() {
    let temp_dir = unique_temp_dir("config_editor_env");
    let mut manager = ConfigManager::with_config_dir(temp_dir.path());

    with_editor_env(Some("emacs"), Some("vi"), || {
        assert_eq!(manager.get_editor().unwrap(), "emacs");
    });
    with_editor_env(None, Some("vi"), || {
        assert_eq!(manager.get_editor().unwrap(), "vi");
    });
    with_editor_env(None, None, || {
        assert_eq!(manager.get_editor().unwrap(), "vim");
    });
}
