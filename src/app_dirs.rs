use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Directory holding the persisted session. An explicit override wins,
    /// then `$HOME/.local/state/charades`, then the platform data dir.
    pub fn data_dir(override_dir: Option<&Path>) -> PathBuf {
        if let Some(dir) = override_dir {
            return dir.to_path_buf();
        }
        if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("charades")
        } else if let Some(proj_dirs) = ProjectDirs::from("", "", "charades") {
            proj_dirs.data_local_dir().to_path_buf()
        } else {
            PathBuf::from(".charades")
        }
    }

    pub fn db_path(override_dir: Option<&Path>) -> PathBuf {
        Self::data_dir(override_dir).join("session.db")
    }

    pub fn config_path() -> PathBuf {
        if let Some(pd) = ProjectDirs::from("", "", "charades") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("charades_config.json")
        }
    }
}
