//! Event directory state and the reducer that drives it.
//!
//! The host forwards user intents to [`Directory::dispatch`] and performs the
//! returned [`Effect`]; rendering reads [`Directory::state`] together with the
//! card, detail, and pagination helpers.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::calendar::{self, CalendarExport, CalendarProvider};
use crate::config::AppConfig;
use crate::display::{self, EventCard, EventDetail};
use crate::filter::{self, FilterState, StatusCounts, StatusTab};
use crate::models::{EventStatus, ListedEvent};
use crate::pagination::{self, PageControl};
use crate::share::{self, SharePlatform};
use crate::source::{Loaded, Sources};
use crate::status;

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "state", content = "message", rename_all = "snake_case")]
pub enum LoadState {
    Loading,
    Ready,
    Failed(String),
}

#[derive(Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

/// Which overlays are showing. Share and calendar sit on top of the detail
/// view and close independently of it.
#[derive(Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modals {
    pub detail: bool,
    pub share: bool,
    pub calendar: bool,
}

#[derive(Serialize, Clone, Debug)]
pub struct DirectoryState {
    pub load: LoadState,
    pub used_fallback: bool,
    pub events: Vec<ListedEvent>,
    pub filtered: Vec<ListedEvent>,
    pub filter: FilterState,
    pub page: usize,
    pub view: ViewMode,
    pub current_event: Option<ListedEvent>,
    pub modals: Modals,
    pub locations: Vec<String>,
    pub tags: Vec<String>,
    pub counts: StatusCounts,
}

impl Default for DirectoryState {
    fn default() -> Self {
        Self {
            load: LoadState::Loading,
            used_fallback: false,
            events: Vec::new(),
            filtered: Vec::new(),
            filter: FilterState::default(),
            page: 1,
            view: ViewMode::default(),
            current_event: None,
            modals: Modals::default(),
            locations: Vec::new(),
            tags: Vec::new(),
            counts: StatusCounts::default(),
        }
    }
}

/// Settings the reducer reads but never changes.
#[derive(Clone, Debug)]
pub struct DirectorySettings {
    pub timezone: Tz,
    pub page_url: String,
    pub ongoing_window: Duration,
}

impl DirectorySettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            timezone: config.timezone(),
            page_url: config.page_url.clone(),
            ongoing_window: config.ongoing_window(),
        }
    }
}

impl Default for DirectorySettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

#[derive(Debug, Clone)]
pub enum DirectoryIntent {
    Loaded(Result<Loaded, String>),
    SelectTab(StatusTab),
    SetLocation(Option<String>),
    SetDateFilter(Option<EventStatus>),
    SetTag(Option<String>),
    SetSearch(String),
    ResetFilters,
    ChangePage(usize),
    SetView(ViewMode),
    OpenEvent(String),
    CloseEvent,
    OpenShare,
    CloseShare,
    CopyShareLink,
    Share(SharePlatform),
    OpenCalendar,
    CloseCalendar,
    AddToCalendar(CalendarProvider),
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Effect {
    None,
    ScrollToTop,
    OpenUrl {
        url: String,
    },
    Download {
        filename: String,
        content_type: &'static str,
        body: String,
    },
    CopyToClipboard {
        text: String,
    },
    Notice {
        message: String,
    },
}

impl From<CalendarExport> for Effect {
    fn from(export: CalendarExport) -> Self {
        match export {
            CalendarExport::OpenUrl { url } => Effect::OpenUrl { url },
            CalendarExport::Download {
                filename,
                content_type,
                body,
            } => Effect::Download {
                filename,
                content_type,
                body,
            },
        }
    }
}

fn apply_filters(state: &mut DirectoryState) {
    state.filtered = filter::filter(&state.events, &state.filter);
    state.page = 1;
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

pub fn reduce(
    state: &mut DirectoryState,
    settings: &DirectorySettings,
    intent: DirectoryIntent,
    now: DateTime<Utc>,
) -> Effect {
    match intent {
        DirectoryIntent::Loaded(Ok(loaded)) => {
            state.events = status::classify_all(loaded.events, now, settings.ongoing_window);
            state.used_fallback = loaded.used_fallback;
            state.locations = filter::locations(&state.events);
            state.tags = filter::tags(&state.events);
            state.counts = filter::counts(&state.events);
            state.load = LoadState::Ready;
            apply_filters(state);
            Effect::None
        }
        DirectoryIntent::Loaded(Err(message)) => {
            *state = DirectoryState {
                load: LoadState::Failed(message),
                filter: std::mem::take(&mut state.filter),
                view: state.view,
                ..DirectoryState::default()
            };
            Effect::None
        }
        DirectoryIntent::SelectTab(tab) => {
            state.filter.status = tab;
            apply_filters(state);
            Effect::None
        }
        DirectoryIntent::SetLocation(location) => {
            state.filter.location = blank_to_none(location);
            apply_filters(state);
            Effect::None
        }
        DirectoryIntent::SetDateFilter(status) => {
            state.filter.date_filter = status;
            apply_filters(state);
            Effect::None
        }
        DirectoryIntent::SetTag(tag) => {
            state.filter.tag = blank_to_none(tag);
            apply_filters(state);
            Effect::None
        }
        DirectoryIntent::SetSearch(query) => {
            state.filter.search_query = query;
            apply_filters(state);
            Effect::None
        }
        DirectoryIntent::ResetFilters => {
            state.filter.reset();
            apply_filters(state);
            Effect::None
        }
        DirectoryIntent::ChangePage(number) => {
            let total = pagination::total_pages(state.filtered.len());
            state.page = pagination::clamp_page(number, total);
            Effect::ScrollToTop
        }
        DirectoryIntent::SetView(view) => {
            state.view = view;
            Effect::None
        }
        DirectoryIntent::OpenEvent(id) => {
            match state.events.iter().find(|e| e.event.external_id == id) {
                Some(found) => {
                    state.current_event = Some(found.clone());
                    state.modals.detail = true;
                }
                None => tracing::debug!(%id, "ignoring open for unknown event"),
            }
            Effect::None
        }
        DirectoryIntent::CloseEvent => {
            state.modals.detail = false;
            Effect::None
        }
        DirectoryIntent::OpenShare => {
            if state.current_event.is_some() {
                state.modals.share = true;
            }
            Effect::None
        }
        DirectoryIntent::CloseShare => {
            state.modals.share = false;
            Effect::None
        }
        DirectoryIntent::CopyShareLink => match &state.current_event {
            Some(current) => Effect::CopyToClipboard {
                text: share::share_link(&current.event, &settings.page_url),
            },
            None => Effect::None,
        },
        DirectoryIntent::Share(platform) => state
            .current_event
            .as_ref()
            .and_then(|current| share::share_url(&current.event, platform, &settings.page_url))
            .map(|url| Effect::OpenUrl { url })
            .unwrap_or(Effect::None),
        DirectoryIntent::OpenCalendar => {
            if state.current_event.is_some() {
                state.modals.calendar = true;
            }
            Effect::None
        }
        DirectoryIntent::CloseCalendar => {
            state.modals.calendar = false;
            Effect::None
        }
        DirectoryIntent::AddToCalendar(provider) => {
            let current = match &state.current_event {
                Some(current) => current,
                None => return Effect::None,
            };
            match calendar::export(&current.event, provider, now) {
                Ok(export) => {
                    state.modals.calendar = false;
                    export.into()
                }
                Err(err) => Effect::Notice {
                    message: err.to_string(),
                },
            }
        }
    }
}

pub struct Directory {
    state: DirectoryState,
    settings: DirectorySettings,
    sources: Sources,
}

impl Directory {
    pub fn new(sources: Sources, settings: DirectorySettings) -> Self {
        Self {
            state: DirectoryState::default(),
            settings,
            sources,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            Sources::from_config(config),
            DirectorySettings::from_config(config),
        )
    }

    pub fn state(&self) -> &DirectoryState {
        &self.state
    }

    pub fn settings(&self) -> &DirectorySettings {
        &self.settings
    }

    pub fn dispatch(&mut self, intent: DirectoryIntent, now: DateTime<Utc>) -> Effect {
        reduce(&mut self.state, &self.settings, intent, now)
    }

    /// Fetches events on a blocking worker and feeds the outcome through the
    /// reducer.
    pub async fn load(&mut self) -> Effect {
        self.state.load = LoadState::Loading;
        let sources = self.sources.clone();
        let outcome = match tokio::task::spawn_blocking(move || sources.load()).await {
            Ok(result) => result.map_err(|err| err.to_string()),
            Err(err) => Err(format!("event loader crashed: {err}")),
        };
        self.dispatch(DirectoryIntent::Loaded(outcome), Utc::now())
    }

    pub fn visible(&self) -> &[ListedEvent] {
        pagination::page(&self.state.filtered, self.state.page)
    }

    pub fn total_pages(&self) -> usize {
        pagination::total_pages(self.state.filtered.len())
    }

    pub fn cards(&self) -> Vec<EventCard> {
        self.visible()
            .iter()
            .map(|listed| display::card(listed, self.settings.timezone))
            .collect()
    }

    pub fn page_controls(&self) -> Vec<PageControl> {
        pagination::controls(self.state.page, self.total_pages())
    }

    pub fn detail(&self) -> Option<EventDetail> {
        self.state
            .current_event
            .as_ref()
            .map(|listed| display::detail(listed, self.settings.timezone))
    }

    pub fn share_link(&self) -> Option<String> {
        self.state
            .current_event
            .as_ref()
            .map(|listed| share::share_link(&listed.event, &self.settings.page_url))
    }

    /// Nothing on the current page and nothing loading.
    pub fn shows_no_results(&self) -> bool {
        self.state.load != LoadState::Loading && self.visible().is_empty()
    }
}
