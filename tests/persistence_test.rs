use audioloader::utils::config::{ConfigStore, Preferences};
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_default_location_survives_restart() {
    // 1. First session saves a default
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join(".cfg.toml");
    let target = temp_dir.path().join("Music");

    ConfigStore::new(&config_path)
        .save_download_location(&target)
        .expect("Failed to save default");

    // 2. Second session reads it back
    let prefs = ConfigStore::new(&config_path).load();
    assert_eq!(prefs.download_location, target);
}

#[test]
fn test_save_keeps_other_settings() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join(".cfg.toml");
    std::fs::write(
        &config_path,
        "theme = \"dark\"\ndownload_loc = \"/old\"\n\n[window]\nwidth = 80\n",
    )
    .expect("Failed to seed config");

    let store = ConfigStore::new(&config_path);
    store
        .save_download_location(&PathBuf::from("/new"))
        .expect("Failed to save default");

    let raw: toml::Table = std::fs::read_to_string(&config_path)
        .expect("Failed to read config")
        .parse()
        .expect("Config is no longer valid TOML");
    assert_eq!(raw["theme"].as_str(), Some("dark"));
    assert_eq!(raw["window"]["width"].as_integer(), Some(80));
    assert_eq!(store.load().download_location, PathBuf::from("/new"));
    assert!(!temp_dir.path().join(".cfg.toml.tmp").exists());
}

#[test]
fn test_unreadable_config_falls_back_to_home() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join(".cfg.toml");
    std::fs::write(&config_path, "download_loc = [1, 2").expect("Failed to seed config");

    assert_eq!(ConfigStore::new(&config_path).load(), Preferences::default());
}
