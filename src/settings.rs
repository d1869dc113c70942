//! User settings stored as settings.json in the app data directory

use crate::constants::{BACKEND_URL_ENV, DEFAULT_BACKEND_URL};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Window geometry
    pub window_x: Option<f32>,
    pub window_y: Option<f32>,
    pub window_w: Option<f32>,
    pub window_h: Option<f32>,

    // Backend
    pub backend_url: String,

    // Paths
    pub last_csv_dir: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_x: None,
            window_y: None,
            window_w: None,
            window_h: None,
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            last_csv_dir: None,
        }
    }
}

impl Settings {
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join("settings.json");
        match std::fs::read_to_string(&path) {
            Ok(s) => match serde_json::from_str(&s) {
                Ok(settings) => {
                    debug!(path = %path.display(), "Settings loaded");
                    settings
                }
                Err(e) => {
                    warn!(error = %e, "Failed to parse settings, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                debug!("No settings file found, using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self, data_dir: &Path) {
        let path = data_dir.join("settings.json");
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    warn!(error = %e, "Failed to save settings");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize settings"),
        }
    }

    /// Backend for this session: the env override if set, else the saved URL.
    pub fn effective_backend_url(&self) -> String {
        resolve_backend_url(&self.backend_url, std::env::var(BACKEND_URL_ENV).ok())
    }

    pub fn last_csv_dir(&self) -> Option<PathBuf> {
        self.last_csv_dir.as_ref().map(PathBuf::from).filter(|p| p.is_dir())
    }
}

fn resolve_backend_url(saved: &str, env_override: Option<String>) -> String {
    match env_override.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        Some(url) => {
            info!(url = %url, "Using backend from {}", BACKEND_URL_ENV);
            url
        }
        None if saved.trim().is_empty() => DEFAULT_BACKEND_URL.to_string(),
        None => saved.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(dir.path());
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.backend_url, "http://127.0.0.1:8500");
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            window_w: Some(900.0),
            window_h: Some(700.0),
            backend_url: "http://10.0.0.5:9000".into(),
            last_csv_dir: Some("/tmp".into()),
            ..Settings::default()
        };
        settings.save(dir.path());
        assert_eq!(Settings::load(dir.path()), settings);
    }

    #[test]
    fn malformed_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("settings.json"), "{ not json").unwrap();
        assert_eq!(Settings::load(dir.path()), Settings::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("settings.json"), r#"{"window_w": 1000.0}"#).unwrap();
        let settings = Settings::load(dir.path());
        assert_eq!(settings.window_w, Some(1000.0));
        assert_eq!(settings.backend_url, DEFAULT_BACKEND_URL);
    }

    #[test]
    fn env_override_wins() {
        assert_eq!(
            resolve_backend_url("http://saved:1", Some(" http://env:2 ".into())),
            "http://env:2"
        );
        assert_eq!(resolve_backend_url("http://saved:1", Some("".into())), "http://saved:1");
        assert_eq!(resolve_backend_url("http://saved:1", None), "http://saved:1");
        assert_eq!(resolve_backend_url("  ", None), DEFAULT_BACKEND_URL);
    }

    #[test]
    fn stale_csv_dir_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            last_csv_dir: Some(dir.path().join("gone").to_string_lossy().into_owned()),
            ..Settings::default()
        };
        assert_eq!(settings.last_csv_dir(), None);

        let settings = Settings {
            last_csv_dir: Some(dir.path().to_string_lossy().into_owned()),
            ..Settings::default()
        };
        assert_eq!(settings.last_csv_dir(), Some(dir.path().to_path_buf()));
    }
}
