use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "spellbee";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Where the persisted word lists live
    pub fn data_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", APP_NAME).map(|pd| pd.data_local_dir().to_path_buf())
    }

    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", APP_NAME).map(|pd| pd.config_dir().join("config.json"))
    }

    pub fn log_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join(APP_NAME);
            Some(state_dir.join("spellbee.log"))
        } else {
            ProjectDirs::from("", "", APP_NAME)
                .map(|pd| pd.data_local_dir().join("spellbee.log"))
        }
    }
}
