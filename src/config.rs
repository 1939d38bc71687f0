use std::{
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::status::DEFAULT_ONGOING_WINDOW_HOURS;
use crate::utils;

const DEFAULT_API_BASE: &str = "http://localhost:5000/api";
const DEFAULT_PAGE_URL: &str = "https://cryptoevents.com/";
const DEFAULT_DEBOUNCE_MS: u64 = 300;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("config mutex poisoned")]
    Poisoned,
}

/// Where the directory gets its events from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Api,
    Static,
    #[default]
    ApiWithFallback,
}

impl SourceKind {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "api" => Some(SourceKind::Api),
            "static" => Some(SourceKind::Static),
            "api_with_fallback" | "fallback" => Some(SourceKind::ApiWithFallback),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub api_base: String,
    pub source: SourceKind,
    pub static_events_path: Option<PathBuf>,
    pub page_url: String,
    pub ongoing_window_hours: i64,
    pub search_debounce_ms: u64,
    pub display_timezone: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            source: SourceKind::default(),
            static_events_path: None,
            page_url: DEFAULT_PAGE_URL.to_string(),
            ongoing_window_hours: DEFAULT_ONGOING_WINDOW_HOURS,
            search_debounce_ms: DEFAULT_DEBOUNCE_MS,
            display_timezone: "UTC".to_string(),
        }
    }
}

impl AppConfig {
    pub fn with_env(mut self) -> Self {
        if let Ok(base) = std::env::var("CRYPTO_EVENTS_API_BASE") {
            if !base.trim().is_empty() {
                self.api_base = base.trim().to_string();
            }
        }
        if let Ok(raw) = std::env::var("CRYPTO_EVENTS_SOURCE") {
            match SourceKind::parse(&raw) {
                Some(kind) => self.source = kind,
                None => tracing::warn!(value = %raw, "ignoring unknown CRYPTO_EVENTS_SOURCE"),
            }
        }
        if let Ok(tz) = std::env::var("CRYPTO_EVENTS_TIMEZONE") {
            self.display_timezone = tz;
        }
        self
    }

    pub fn timezone(&self) -> Tz {
        self.display_timezone.parse().unwrap_or_else(|_| {
            tracing::warn!(tz = %self.display_timezone, "unknown display timezone, using UTC");
            Tz::UTC
        })
    }

    pub fn ongoing_window(&self) -> chrono::Duration {
        chrono::Duration::hours(self.ongoing_window_hours.max(0))
    }

    pub fn search_debounce(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.search_debounce_ms)
    }

    pub fn events_endpoint(&self) -> String {
        format!("{}/internal/events", self.api_base.trim_end_matches('/'))
    }

    pub fn submit_endpoint(&self) -> String {
        format!("{}/user/list-event", self.api_base.trim_end_matches('/'))
    }
}

pub struct ConfigStore {
    path: PathBuf,
    data: Mutex<AppConfig>,
}

impl ConfigStore {
    pub fn load() -> Self {
        Self::load_from(utils::config_path())
    }

    pub fn load_from(path: PathBuf) -> Self {
        let data = read_config(&path)
            .unwrap_or_else(|err| {
                tracing::warn!(path = %path.display(), %err, "falling back to default config");
                AppConfig::default()
            })
            .with_env();
        Self {
            path,
            data: Mutex::new(data),
        }
    }

    pub fn read(&self) -> AppConfig {
        match self.data.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn update<F>(&self, transform: F) -> Result<AppConfig, ConfigError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut guard = self.data.lock().map_err(|_| ConfigError::Poisoned)?;
        transform(&mut guard);
        write_config(&self.path, &guard)?;
        Ok(guard.clone())
    }
}

fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

fn write_config(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
    utils::ensure_parent(path);
    let contents = serde_json::to_string_pretty(config)?;
    fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ConfigStore::load_from(dir.path().join("config.json"));
        let config = store.read();
        assert_eq!(config.ongoing_window_hours, 24);
        assert_eq!(config.search_debounce_ms, 300);
        assert_eq!(config.page_url, DEFAULT_PAGE_URL);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"ongoing_window_hours": 6, "source": "static"}"#).expect("write");
        let config = read_config(&path).expect("read");
        assert_eq!(config.ongoing_window_hours, 6);
        assert_eq!(config.source, SourceKind::Static);
        assert_eq!(config.search_debounce_ms, 300);
    }

    #[test]
    fn update_persists() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.json");
        let store = ConfigStore::load_from(path.clone());
        let updated = store
            .update(|config| config.display_timezone = "Asia/Singapore".into())
            .expect("update");
        assert_eq!(updated.timezone(), chrono_tz::Asia::Singapore);
        let reread = read_config(&path).expect("reread");
        assert_eq!(reread.display_timezone, "Asia/Singapore");
    }

    #[test]
    fn endpoints_join_cleanly() {
        let config = AppConfig {
            api_base: "https://api.example.com/api/".into(),
            ..Default::default()
        };
        assert_eq!(config.events_endpoint(), "https://api.example.com/api/internal/events");
        assert_eq!(config.submit_endpoint(), "https://api.example.com/api/user/list-event");
    }

    #[test]
    fn bad_timezone_reads_as_utc() {
        let config = AppConfig {
            display_timezone: "Mars/Olympus".into(),
            ..Default::default()
        };
        assert_eq!(config.timezone(), Tz::UTC);
    }

    #[test]
    fn parses_source_names() {
        assert_eq!(SourceKind::parse("API"), Some(SourceKind::Api));
        assert_eq!(SourceKind::parse("fallback"), Some(SourceKind::ApiWithFallback));
        assert_eq!(SourceKind::parse("mongo"), None);
    }
}
