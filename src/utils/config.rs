//! Persisted user preferences

use crate::utils::error::AppError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Config file used when no other location is given, relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = ".cfg.toml";

const DOWNLOAD_LOC_KEY: &str = "download_loc";

/// User preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Default download location
    #[serde(rename = "download_loc")]
    pub download_location: PathBuf,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            download_location: dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}

/// Reads and writes the preferences document.
///
/// Loading never fails: a missing or malformed file yields [`Preferences::default`].
/// Saving is read-merge-write, so keys this version does not know about survive.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load preferences, falling back to defaults
    pub fn load(&self) -> Preferences {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No config at {:?}, using defaults", self.path);
                return Preferences::default();
            }
            Err(e) => {
                warn!("Failed to read config {:?}: {}", self.path, e);
                return Preferences::default();
            }
        };

        match toml::from_str::<Preferences>(&content) {
            Ok(prefs) => {
                info!("Loaded preferences from {:?}", self.path);
                prefs
            }
            Err(e) => {
                warn!("Malformed config {:?}, using defaults: {}", self.path, e);
                Preferences::default()
            }
        }
    }

    /// Persist a new default download location
    pub fn save_download_location(&self, location: &Path) -> Result<()> {
        let location_str = location.to_str().ok_or_else(|| {
            AppError::ConfigError(format!("{:?} is not valid UTF-8", location))
        })?;

        let mut table = self.read_table();
        table.insert(
            DOWNLOAD_LOC_KEY.to_string(),
            toml::Value::String(location_str.to_string()),
        );

        let content =
            toml::to_string(&table).map_err(|e| AppError::ConfigError(e.to_string()))?;

        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());
        let tmp_path = self.path.with_file_name(format!("{}.tmp", file_name));

        std::fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write {:?}", tmp_path))?;
        std::fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("Failed to replace {:?}", self.path))?;

        info!("Saved default download location {:?}", location);
        Ok(())
    }

    fn read_table(&self) -> toml::Table {
        std::fs::read_to_string(&self.path)
            .ok()
            .and_then(|content| content.parse::<toml::Table>().ok())
            .unwrap_or_default()
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_loads_home() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("absent.toml"));
        assert_eq!(store.load(), Preferences::default());
    }

    #[test]
    fn test_malformed_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cfg.toml");
        std::fs::write(&path, "download_loc = [this is not toml").unwrap();

        let store = ConfigStore::new(&path);
        assert_eq!(store.load(), Preferences::default());
    }

    #[test]
    fn test_missing_key_loads_home() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cfg.toml");
        std::fs::write(&path, "theme = \"dark\"\n").unwrap();

        let store = ConfigStore::new(&path);
        assert_eq!(store.load(), Preferences::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("cfg.toml"));
        let music = dir.path().join("music");

        store.save_download_location(&music).unwrap();

        assert_eq!(store.load().download_location, music);
        assert!(!dir.path().join("cfg.toml.tmp").exists());
    }

    #[test]
    fn test_save_preserves_unknown_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cfg.toml");
        std::fs::write(&path, "theme = \"dark\"\ndownload_loc = \"/old\"\n").unwrap();

        let store = ConfigStore::new(&path);
        store.save_download_location(Path::new("/new")).unwrap();

        let table: toml::Table = std::fs::read_to_string(&path).unwrap().parse().unwrap();
        assert_eq!(table["theme"].as_str(), Some("dark"));
        assert_eq!(table["download_loc"].as_str(), Some("/new"));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_location_is_rejected() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        let store = ConfigStore::new(&path);
        store.save_download_location(Path::new("/music")).unwrap();

        let bad = Path::new(OsStr::from_bytes(b"/music/\xff\xfe"));
        let err = store.save_download_location(bad).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AppError>(),
            Some(AppError::ConfigError(_))
        ));
        assert_eq!(store.load().download_location, PathBuf::from("/music"));
    }
}
