use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::{Event, EventStatus, ListedEvent};

/// Top-level status tab.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StatusTab {
    #[default]
    All,
    Upcoming,
    Ongoing,
    Ended,
}

impl StatusTab {
    pub fn admits(&self, status: EventStatus) -> bool {
        match self {
            StatusTab::All => true,
            StatusTab::Upcoming => status == EventStatus::Upcoming,
            StatusTab::Ongoing => status == EventStatus::Ongoing,
            StatusTab::Ended => status == EventStatus::Ended,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterState {
    pub status: StatusTab,
    pub location: Option<String>,
    pub date_filter: Option<EventStatus>,
    pub tag: Option<String>,
    pub search_query: String,
}

impl FilterState {
    pub fn reset(&mut self) {
        *self = FilterState::default();
    }
}

#[derive(Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub all: usize,
    pub upcoming: usize,
    pub ongoing: usize,
    pub ended: usize,
}

/// Location token of a venue: the part after the last comma, or the whole
/// venue when there is no comma.
pub fn extract_location(venue: Option<&str>) -> Option<String> {
    let venue = venue?;
    let token = match venue.rsplit_once(',') {
        Some((_, tail)) => tail.trim(),
        None => venue.trim(),
    };
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

fn searchable_text(event: &Event) -> String {
    [
        event.title.as_deref(),
        event.description.as_deref(),
        event.venue.as_deref(),
        event.organizer.as_deref(),
        event.category_tags.as_deref(),
    ]
    .into_iter()
    .flatten()
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(" ")
    .to_lowercase()
}

fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

pub fn matches(listed: &ListedEvent, state: &FilterState) -> bool {
    let event = &listed.event;

    if !state.status.admits(listed.status) {
        return false;
    }

    if let Some(location) = active(&state.location) {
        match extract_location(event.venue.as_deref()) {
            Some(token) if token.contains(location) => {}
            _ => return false,
        }
    }

    if let Some(date_filter) = state.date_filter {
        if listed.status != date_filter {
            return false;
        }
    }

    // Raw substring match on the joined tag string: "ai" also hits "said".
    if let Some(tag) = active(&state.tag) {
        match event.category_tags.as_deref() {
            Some(tags) if tags.contains(tag) => {}
            _ => return false,
        }
    }

    let query = state.search_query.to_lowercase();
    if !query.is_empty() && !searchable_text(event).contains(&query) {
        return false;
    }

    true
}

pub fn filter(events: &[ListedEvent], state: &FilterState) -> Vec<ListedEvent> {
    events
        .iter()
        .filter(|listed| matches(listed, state))
        .cloned()
        .collect()
}

/// Sorted, distinct location tokens for the location dropdown.
pub fn locations(events: &[ListedEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|listed| extract_location(listed.event.venue.as_deref()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Sorted, distinct tags for the type dropdown.
pub fn tags(events: &[ListedEvent]) -> Vec<String> {
    events
        .iter()
        .flat_map(|listed| listed.event.tags())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn counts(events: &[ListedEvent]) -> StatusCounts {
    let mut counts = StatusCounts {
        all: events.len(),
        ..Default::default()
    };
    for listed in events {
        match listed.status {
            EventStatus::Upcoming => counts.upcoming += 1,
            EventStatus::Ongoing => counts.ongoing += 1,
            EventStatus::Ended => counts.ended += 1,
        }
    }
    counts
}
