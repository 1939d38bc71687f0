use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::models::{Event, ListedEvent};
use crate::utils;

static WORD_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s\-_]").expect("valid word break regex"));

const PLACEHOLDER_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="400" height="220" viewBox="0 0 400 220"><defs><linearGradient id="grad" x1="0%" y1="0%" x2="100%" y2="100%"><stop offset="0%" style="stop-color:#1e00ff;stop-opacity:1" /><stop offset="100%" style="stop-color:#5c4dff;stop-opacity:1" /></linearGradient></defs><rect width="400" height="220" fill="url(#grad)"/><text x="50%" y="50%" font-family="Geist Sans, sans-serif" font-size="20" font-weight="bold" fill="white" text-anchor="middle" dominant-baseline="middle">Crypto Event</text></svg>"##;

static PLACEHOLDER_IMAGE: Lazy<String> = Lazy::new(|| {
    format!(
        "data:image/svg+xml;base64,{}",
        STANDARD.encode(PLACEHOLDER_SVG)
    )
});

const CARD_TAG_LIMIT: usize = 3;

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct EventCard {
    pub id: String,
    pub image_url: String,
    pub status: &'static str,
    pub status_label: &'static str,
    pub date_line: String,
    pub title: String,
    pub organizer: Option<String>,
    pub venue: String,
    pub tags: Vec<String>,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct EventDetail {
    pub id: String,
    pub image_url: String,
    pub status: &'static str,
    pub status_label: &'static str,
    pub title: String,
    pub venue: String,
    pub map_url: Option<String>,
    pub date: String,
    pub time: String,
    pub organizer: Option<String>,
    pub tags: Vec<String>,
    pub ticket_url: Option<String>,
}

/// Upper-cases the first letter of every word and lower-cases the rest.
/// Hyphens and underscores count as word breaks and become spaces.
pub fn capitalize_words(input: &str) -> String {
    WORD_BREAK
        .split(input)
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// The event's own image, or a generated placeholder when it has none.
pub fn image_url(event: &Event) -> String {
    match event.image_url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() && url != "null" && url != "None" => url.to_string(),
        _ => PLACEHOLDER_IMAGE.clone(),
    }
}

fn local(dt: DateTime<Utc>, tz: Tz) -> DateTime<Tz> {
    dt.with_timezone(&tz)
}

fn date_label(dt: DateTime<Utc>, tz: Tz) -> String {
    local(dt, tz).format("%b %-d, %Y").to_string()
}

fn time_label(dt: DateTime<Utc>, tz: Tz) -> String {
    local(dt, tz).format("%-I:%M %p").to_string()
}

pub fn format_date(start: Option<&str>, tz: Tz) -> String {
    match utils::parse_optional(start) {
        Some(dt) => date_label(dt, tz),
        None => "Date TBA".to_string(),
    }
}

pub fn format_time(start: Option<&str>, end: Option<&str>, tz: Tz) -> String {
    let start = match utils::parse_optional(start) {
        Some(dt) => dt,
        None => return "Time TBA".to_string(),
    };
    match utils::parse_optional(end) {
        Some(end) => format!("{} - {}", time_label(start, tz), time_label(end, tz)),
        None => time_label(start, tz),
    }
}

pub fn format_date_range(start: Option<&str>, end: Option<&str>, tz: Tz) -> String {
    let start = match utils::parse_optional(start) {
        Some(dt) => date_label(dt, tz),
        None => return "Date TBA".to_string(),
    };
    match utils::parse_optional(end).map(|dt| date_label(dt, tz)) {
        Some(end) if end != start => format!("{start} - {end}"),
        _ => start,
    }
}

pub fn map_url(venue: &str) -> Option<String> {
    let venue = venue.trim();
    if venue.is_empty() {
        return None;
    }
    utils::url_with_params(
        "https://www.google.com/maps/search/",
        &[("api", "1"), ("query", venue)],
    )
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.and_then(utils::non_empty)
}

pub fn card(listed: &ListedEvent, tz: Tz) -> EventCard {
    let event = &listed.event;
    let date = format_date(event.date_time.as_deref(), tz);
    let time = format_time(event.date_time.as_deref(), event.end_time.as_deref(), tz);
    EventCard {
        id: event.external_id.clone(),
        image_url: image_url(event),
        status: listed.status.as_str(),
        status_label: listed.status.label(),
        date_line: format!("{date} · {time}"),
        title: event.title(),
        organizer: non_blank(event.organizer.as_deref()),
        venue: non_blank(event.venue.as_deref()).unwrap_or_else(|| "Location TBA".to_string()),
        tags: event
            .tags()
            .iter()
            .take(CARD_TAG_LIMIT)
            .map(|tag| capitalize_words(tag))
            .collect(),
    }
}

pub fn detail(listed: &ListedEvent, tz: Tz) -> EventDetail {
    let event = &listed.event;
    let venue = non_blank(event.venue.as_deref());
    EventDetail {
        id: event.external_id.clone(),
        image_url: image_url(event),
        status: listed.status.as_str(),
        status_label: listed.status.label(),
        title: event.title(),
        map_url: venue.as_deref().and_then(map_url),
        venue: venue.unwrap_or_else(|| "Location TBA".to_string()),
        date: format_date_range(event.date_time.as_deref(), event.end_time.as_deref(), tz),
        time: format_time(event.date_time.as_deref(), event.end_time.as_deref(), tz),
        organizer: non_blank(event.organizer.as_deref()),
        tags: event
            .tags()
            .iter()
            .map(|tag| format!("#{}", capitalize_words(tag)))
            .collect(),
        ticket_url: non_blank(event.ticket_url.as_deref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventStatus;

    fn listed() -> ListedEvent {
        ListedEvent {
            event: Event {
                external_id: "evt-9".into(),
                title: Some("Solana Breakpoint".into()),
                venue: Some("Expo Hall, Amsterdam".into()),
                date_time: Some("2025-06-01T10:00:00".into()),
                end_time: Some("2025-06-03T18:30:00".into()),
                category_tags: Some("defi,layer-1,web3_infra,dao".into()),
                image_url: Some("None".into()),
                ..Default::default()
            },
            status: EventStatus::Upcoming,
        }
    }

    #[test]
    fn capitalizes_on_separators() {
        assert_eq!(capitalize_words("layer-1"), "Layer 1");
        assert_eq!(capitalize_words("web3_INFRA"), "Web3 Infra");
        assert_eq!(capitalize_words("defi"), "Defi");
    }

    #[test]
    fn sentinel_images_use_placeholder() {
        let event = listed().event;
        assert!(image_url(&event).starts_with("data:image/svg+xml;base64,"));
        let with_image = Event {
            image_url: Some("https://cdn.example.com/a.png".into()),
            ..event
        };
        assert_eq!(image_url(&with_image), "https://cdn.example.com/a.png");
    }

    #[test]
    fn card_shows_three_tags_and_date_line() {
        let card = card(&listed(), Tz::UTC);
        assert_eq!(card.tags, vec!["Defi", "Layer 1", "Web3 Infra"]);
        assert_eq!(card.date_line, "Jun 1, 2025 · 10:00 AM - 6:30 PM");
        assert_eq!(card.status_label, "Upcoming");
        assert_eq!(card.organizer, None);
    }

    #[test]
    fn detail_shows_range_and_map() {
        let detail = detail(&listed(), Tz::UTC);
        assert_eq!(detail.date, "Jun 1, 2025 - Jun 3, 2025");
        assert_eq!(detail.tags.len(), 4);
        assert_eq!(detail.tags[0], "#Defi");
        let map = detail.map_url.expect("map link");
        assert!(map.starts_with("https://www.google.com/maps/search/?api=1&query="));
    }

    #[test]
    fn missing_dates_are_tba() {
        assert_eq!(format_date(None, Tz::UTC), "Date TBA");
        assert_eq!(format_time(Some("garbage"), None, Tz::UTC), "Time TBA");
        assert_eq!(format_date_range(None, Some("2025-06-01"), Tz::UTC), "Date TBA");
    }

    #[test]
    fn same_day_range_collapses() {
        let range = format_date_range(
            Some("2025-06-01T10:00:00"),
            Some("2025-06-01T12:00:00"),
            Tz::UTC,
        );
        assert_eq!(range, "Jun 1, 2025");
    }

    #[test]
    fn respects_display_timezone() {
        let tz: Tz = "America/New_York".parse().expect("tz");
        assert_eq!(format_time(Some("2025-06-01T14:00:00Z"), None, tz), "10:00 AM");
    }

    #[test]
    fn missing_venue_reads_tba() {
        let mut item = listed();
        item.event.venue = None;
        let detail = detail(&item, Tz::UTC);
        assert_eq!(detail.venue, "Location TBA");
        assert_eq!(detail.map_url, None);
    }
}
