use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use facecam_core::recognition::domain::response_cache::CachePolicy;
use facecam_core::shared::constants::{
    APP_DIR_NAME, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SERVER_URL, DEFAULT_TICK_INTERVAL_MS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Appearance {
    System,
    Dark,
    Light,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server_url: String,
    pub camera_index: i32,
    pub tick_interval_ms: u64,
    pub request_timeout_secs: u64,
    /// Overrides the cascade search when set.
    pub cascade_path: Option<PathBuf>,
    pub cache_policy: CachePolicy,
    /// `None` keeps every response for the whole session.
    pub cache_capacity: Option<usize>,
    pub appearance: Appearance,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            camera_index: 0,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            cascade_path: None,
            cache_policy: CachePolicy::default(),
            cache_capacity: None,
            appearance: Appearance::System,
        }
    }
}

impl Settings {
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join("settings.json"))
    }

    /// Loads the saved settings, writing the defaults on first run so
    /// there is a file to edit.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_or_create(&path),
            None => Self::default(),
        }
    }

    pub fn load_or_create(path: &Path) -> Self {
        if path.exists() {
            return Self::load_from(path);
        }
        let settings = Self::default();
        settings.save_to(path);
        settings
    }

    /// Missing or unreadable files fall back to defaults.
    pub fn load_from(path: &Path) -> Self {
        let Ok(json) = fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&json).unwrap_or_else(|e| {
            log::warn!("Ignoring malformed settings at {}: {e}", path.display());
            Self::default()
        })
    }

    pub fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = fs::write(path, json) {
                    log::warn!("Could not save settings to {}: {e}", path.display());
                }
            }
            Err(e) => log::warn!("Could not serialize settings: {e}"),
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_local_service() {
        let s = Settings::default();
        assert_eq!(s.server_url, "http://127.0.0.1:5000");
        assert_eq!(s.camera_index, 0);
        assert_eq!(s.tick_interval(), Duration::from_millis(10));
        assert_eq!(s.request_timeout(), Duration::from_secs(10));
        assert_eq!(s.cache_policy, CachePolicy::ServerResponses);
        assert!(s.cache_capacity.is_none());
        assert!(s.cascade_path.is_none());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(
            Settings::load_from(&tmp.path().join("settings.json")),
            Settings::default()
        );
    }

    #[rstest]
    #[case::garbage("not json at all")]
    #[case::wrong_type(r#"{"camera_index": "front"}"#)]
    fn test_corrupt_file_gives_defaults(#[case] contents: &str) {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("settings.json");
        fs::write(&path, contents).unwrap();
        assert_eq!(Settings::load_from(&path), Settings::default());
    }

    #[test]
    fn test_partial_file_fills_missing_fields() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("settings.json");
        fs::write(
            &path,
            r#"{"server_url": "http://10.0.0.2:8080", "cache_policy": "include_failures"}"#,
        )
        .unwrap();

        let s = Settings::load_from(&path);

        assert_eq!(s.server_url, "http://10.0.0.2:8080");
        assert_eq!(s.cache_policy, CachePolicy::IncludeFailures);
        assert_eq!(s.tick_interval_ms, 10);
    }

    #[test]
    fn test_save_creates_parent_and_reloads() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("FaceCam").join("settings.json");
        let s = Settings {
            camera_index: 2,
            cache_capacity: Some(64),
            cascade_path: Some(PathBuf::from("/opt/models/face.xml")),
            ..Settings::default()
        };

        s.save_to(&path);

        assert_eq!(Settings::load_from(&path), s);
    }

    #[test]
    fn test_first_run_writes_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("FaceCam").join("settings.json");

        let s = Settings::load_or_create(&path);

        assert_eq!(s, Settings::default());
        assert!(path.is_file());
        assert_eq!(Settings::load_from(&path), Settings::default());
    }

    #[test]
    fn test_existing_file_is_not_overwritten() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("settings.json");
        fs::write(&path, r#"{"camera_index": 3}"#).unwrap();

        let s = Settings::load_or_create(&path);

        assert_eq!(s.camera_index, 3);
        assert_eq!(fs::read_to_string(&path).unwrap(), r#"{"camera_index": 3}"#);
    }

    #[test]
    fn test_zero_intervals_are_clamped() {
        let s = Settings {
            tick_interval_ms: 0,
            request_timeout_secs: 0,
            ..Settings::default()
        };
        assert_eq!(s.tick_interval(), Duration::from_millis(1));
        assert_eq!(s.request_timeout(), Duration::from_secs(1));
    }
}
