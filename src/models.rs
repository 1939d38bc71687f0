use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Event {
    #[serde(default)]
    pub external_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub organizer: Option<String>,
    #[serde(default)]
    pub date_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub ticket_url: Option<String>,
    #[serde(default)]
    pub category_tags: Option<String>,
}

impl Event {
    pub fn title(&self) -> String {
        self.title
            .clone()
            .filter(|title| !title.trim().is_empty())
            .unwrap_or_else(|| "Untitled Event".to_string())
    }

    /// Trimmed, non-empty tags in their original order.
    pub fn tags(&self) -> Vec<String> {
        self.category_tags
            .as_deref()
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|tag| !tag.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Upcoming,
    Ongoing,
    Ended,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Upcoming => "upcoming",
            EventStatus::Ongoing => "ongoing",
            EventStatus::Ended => "ended",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EventStatus::Upcoming => "Upcoming",
            EventStatus::Ongoing => "Ongoing",
            EventStatus::Ended => "Ended",
        }
    }
}

/// An event paired with the status derived when the list was loaded.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ListedEvent {
    #[serde(flatten)]
    pub event: Event,
    pub status: EventStatus,
}

#[derive(Debug, Deserialize)]
pub struct EventsResponse {
    pub success: bool,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_sparse_api_event() {
        let raw = r#"{
            "external_id": "evt-1",
            "title": "ETH Denver",
            "venue": "Denver, USA",
            "date_time": "2025-02-23T09:00:00",
            "end_time": null,
            "guest_count": 300
        }"#;
        let event: Event = serde_json::from_str(raw).expect("parse event");
        assert_eq!(event.external_id, "evt-1");
        assert_eq!(event.title(), "ETH Denver");
        assert_eq!(event.end_time, None);
        assert_eq!(event.category_tags, None);
    }

    #[test]
    fn envelope_tolerates_an_event_without_id() {
        let raw = r#"{"success":true,"events":[{"title":"A"},{"external_id":"b"}]}"#;
        let body: EventsResponse = serde_json::from_str(raw).expect("parse envelope");
        assert_eq!(body.events.len(), 2);
        assert_eq!(body.events[0].external_id, "");
        assert_eq!(body.events[0].title(), "A");
        assert_eq!(body.events[1].external_id, "b");
    }

    #[test]
    fn blank_title_falls_back() {
        let event = Event {
            external_id: "x".into(),
            title: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(event.title(), "Untitled Event");
    }

    #[test]
    fn splits_tags() {
        let event = Event {
            external_id: "x".into(),
            category_tags: Some("defi, nft,, ai ".into()),
            ..Default::default()
        };
        assert_eq!(event.tags(), vec!["defi", "nft", "ai"]);
    }
}
