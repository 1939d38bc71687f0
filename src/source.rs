use std::{fs, path::PathBuf, sync::Arc};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use reqwest::blocking::Client;
use thiserror::Error;

use crate::config::{AppConfig, SourceKind};
use crate::models::{Event, EventsResponse};

const BUNDLED_EVENTS: &str = include_str!("../data/static_events.json");

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to load events from database. Make sure the API server is running.")]
    Unavailable,
}

pub trait EventSource: Send + Sync {
    fn name(&self) -> &'static str;
    fn fetch_events(&self) -> Result<Vec<Event>>;
}

/// `GET {api_base}/internal/events`
pub struct ApiSource {
    endpoint: String,
}

impl ApiSource {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

fn client() -> &'static Client {
    static CLIENT: Lazy<Client> = Lazy::new(|| {
        Client::builder()
            .user_agent(concat!("crypto-events/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|err| {
                tracing::warn!(%err, "falling back to default http client");
                Client::new()
            })
    });
    &CLIENT
}

impl EventSource for ApiSource {
    fn name(&self) -> &'static str {
        "api"
    }

    fn fetch_events(&self) -> Result<Vec<Event>> {
        let response = client()
            .get(&self.endpoint)
            .send()
            .with_context(|| format!("request failed for {}", self.endpoint))?;
        let response = response
            .error_for_status()
            .with_context(|| format!("non-success status for {}", self.endpoint))?;
        let body: EventsResponse = response
            .json()
            .with_context(|| format!("unable to decode events from {}", self.endpoint))?;
        if !body.success {
            return Err(anyhow!(body
                .error
                .unwrap_or_else(|| "Failed to load events".to_string())));
        }
        Ok(body.events)
    }
}

/// Events shipped with the crate, or read from a JSON file when a path is
/// configured.
pub struct StaticSource {
    path: Option<PathBuf>,
}

impl StaticSource {
    pub fn bundled() -> Self {
        Self { path: None }
    }

    pub fn from_file(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }
}

impl EventSource for StaticSource {
    fn name(&self) -> &'static str {
        "static"
    }

    fn fetch_events(&self) -> Result<Vec<Event>> {
        let raw = match &self.path {
            Some(path) => fs::read_to_string(path)
                .with_context(|| format!("unable to read {}", path.display()))?,
            None => BUNDLED_EVENTS.to_string(),
        };
        serde_json::from_str(&raw).context("static events are not a JSON event array")
    }
}

#[derive(Clone)]
pub struct Sources {
    primary: Arc<dyn EventSource>,
    fallback: Option<Arc<dyn EventSource>>,
}

#[derive(Debug, Clone)]
pub struct Loaded {
    pub events: Vec<Event>,
    pub source: &'static str,
    pub used_fallback: bool,
}

impl Sources {
    pub fn new(primary: Arc<dyn EventSource>, fallback: Option<Arc<dyn EventSource>>) -> Self {
        Self { primary, fallback }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let static_source = || -> Arc<dyn EventSource> {
            match &config.static_events_path {
                Some(path) => Arc::new(StaticSource::from_file(path.clone())),
                None => Arc::new(StaticSource::bundled()),
            }
        };
        let api = Arc::new(ApiSource::new(config.events_endpoint()));
        match config.source {
            SourceKind::Api => Self::new(api, None),
            SourceKind::Static => Self::new(static_source(), None),
            SourceKind::ApiWithFallback => Self::new(api, Some(static_source())),
        }
    }

    /// Tries the primary source, then the fallback. An empty fallback counts
    /// as a failure.
    pub fn load(&self) -> Result<Loaded, SourceError> {
        match self.primary.fetch_events() {
            Ok(events) => {
                return Ok(Loaded {
                    events,
                    source: self.primary.name(),
                    used_fallback: false,
                })
            }
            Err(err) => {
                tracing::warn!(source = self.primary.name(), "event source unavailable: {err:#}");
            }
        }

        let fallback = self.fallback.as_ref().ok_or(SourceError::Unavailable)?;
        match fallback.fetch_events() {
            Ok(events) if !events.is_empty() => {
                tracing::info!(
                    source = fallback.name(),
                    count = events.len(),
                    "loaded fallback events for preview"
                );
                Ok(Loaded {
                    events,
                    source: fallback.name(),
                    used_fallback: true,
                })
            }
            Ok(_) => {
                tracing::warn!(source = fallback.name(), "fallback source is empty");
                Err(SourceError::Unavailable)
            }
            Err(err) => {
                tracing::warn!(source = fallback.name(), "fallback source failed: {err:#}");
                Err(SourceError::Unavailable)
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    pub struct FixedSource(pub Result<Vec<Event>, String>);

    impl EventSource for FixedSource {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn fetch_events(&self) -> Result<Vec<Event>> {
            self.0.clone().map_err(|err| anyhow!(err))
        }
    }
}
