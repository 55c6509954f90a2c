use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::app_dirs::AppDirs;
use crate::model::Difficulty;
use crate::session::SessionDefaults;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    File,
    Sqlite,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub round_duration: u32,
    pub difficulty: Difficulty,
    pub free_skips: u32,
    pub backend: StorageBackend,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            round_duration: 60,
            difficulty: Difficulty::Medium,
            free_skips: 3,
            backend: StorageBackend::File,
        }
    }
}

impl From<&Config> for SessionDefaults {
    fn from(cfg: &Config) -> Self {
        Self {
            round_duration: cfg.round_duration,
            difficulty: cfg.difficulty,
            free_skips: cfg.free_skips,
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let Ok(bytes) = fs::read(&self.path) else {
            return Config::default();
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("ignoring unreadable config at {}: {}", self.path.display(), e);
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn save_and_load_custom_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config {
            round_duration: 90,
            difficulty: Difficulty::Hard,
            free_skips: 1,
            backend: StorageBackend::Sqlite,
        };
        store.save(&cfg).unwrap();
        assert_eq!(cfg, store.load());
    }

    #[test]
    fn missing_file_and_garbage_fall_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        assert_eq!(store.load(), Config::default());

        fs::write(&path, b"not json").unwrap();
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, br#"{"free_skips": 0}"#).unwrap();
        let cfg = FileConfigStore::with_path(&path).load();
        assert_eq!(cfg.free_skips, 0);
        assert_eq!(cfg.round_duration, 60);
        assert_eq!(cfg.backend, StorageBackend::File);
    }

    #[test]
    fn session_defaults_follow_config() {
        let cfg = Config {
            round_duration: 45,
            difficulty: Difficulty::Easy,
            free_skips: 5,
            backend: StorageBackend::File,
        };
        let defaults = SessionDefaults::from(&cfg);
        assert_eq!(defaults.round_duration, 45);
        assert_eq!(defaults.difficulty, Difficulty::Easy);
        assert_eq!(defaults.free_skips, 5);
    }
}
