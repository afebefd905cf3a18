use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(
                PathBuf::from(home)
                    .join(".local")
                    .join("state")
                    .join("levelup"),
            )
        } else {
            ProjectDirs::from("", "", "levelup")
                .map(|proj_dirs| proj_dirs.data_local_dir().to_path_buf())
        }
    }

    /// The persisted tracker counters.
    pub fn state_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join("state.json"))
    }

    /// The daily history database.
    pub fn history_db_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join("history.db"))
    }

    /// User configuration.
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "levelup").map(|pd| pd.config_dir().join("config.json"))
    }
}
