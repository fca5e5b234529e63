use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::app_dirs::AppDirs;
use crate::speech::{SpeechRate, DEFAULT_LOCALE};

/// Which storage variant backs the word lists
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ListMode {
    #[default]
    Multi,
    Single,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub normal_rate: f32,
    pub slow_rate: f32,
    pub locale: String,
    pub list_mode: ListMode,
    pub speak_command: Option<String>,
    pub listen_command: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            normal_rate: 0.8,
            slow_rate: 0.5,
            locale: DEFAULT_LOCALE.to_string(),
            list_mode: ListMode::Multi,
            speak_command: Some("espeak-ng".to_string()),
            listen_command: None,
        }
    }
}

impl Config {
    pub fn rate(&self, rate: SpeechRate) -> f32 {
        match rate {
            SpeechRate::Normal => self.normal_rate,
            SpeechRate::Slow => self.slow_rate,
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
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("spellbee_config.json"));
        Self { path }
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
        if let Ok(bytes) = fs::read(&self.path) {
            match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => return cfg,
                Err(e) => warn!(path = %self.path.display(), error = %e, "ignoring bad config"),
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).map_err(std::io::Error::other)?;
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
        let path = dir.path().join("nested").join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config {
            normal_rate: 1.0,
            slow_rate: 0.25,
            locale: "en-GB".into(),
            list_mode: ListMode::Single,
            speak_command: None,
            listen_command: Some("my-recognizer --once".into()),
        };
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn missing_or_bad_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        assert_eq!(store.load(), Config::default());

        fs::write(&path, b"{ broken").unwrap();
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, br#"{ "list_mode": "single" }"#).unwrap();

        let cfg = FileConfigStore::with_path(&path).load();

        assert_eq!(cfg.list_mode, ListMode::Single);
        assert_eq!(cfg.normal_rate, 0.8);
        assert_eq!(cfg.locale, "en-US");
    }

    #[test]
    fn rates_follow_config() {
        let cfg = Config::default();
        assert_eq!(cfg.rate(SpeechRate::Normal), 0.8);
        assert_eq!(cfg.rate(SpeechRate::Slow), 0.5);
        assert_eq!(ListMode::Single.to_string(), "single");
    }
}
