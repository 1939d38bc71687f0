use chrono::{DateTime, Duration, SecondsFormat, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Event;
use crate::utils;

static FILENAME_UNSAFE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)[^a-z0-9]").expect("valid filename regex"));

const UID_DOMAIN: &str = "cryptoevents.com";
const PRODUCT_ID: &str = "-//Crypto Events//EN";
const DESCRIPTION_LIMIT: usize = 500;
pub const ICS_CONTENT_TYPE: &str = "text/calendar;charset=utf-8";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalendarError {
    #[error("Event date is missing. Cannot add to calendar.")]
    MissingStart,
    #[error("could not build {0} calendar link")]
    Url(&'static str),
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CalendarProvider {
    Google,
    Outlook,
    Apple,
    Ics,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CalendarExport {
    OpenUrl {
        url: String,
    },
    Download {
        filename: String,
        content_type: &'static str,
        body: String,
    },
}

/// Start and end of an event as a calendar sees them. A missing end is one
/// hour after the start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Span {
    pub fn of(event: &Event) -> Result<Self, CalendarError> {
        let start = utils::parse_optional(event.date_time.as_deref())
            .ok_or(CalendarError::MissingStart)?;
        let end = utils::parse_optional(event.end_time.as_deref())
            .unwrap_or(start + Duration::hours(1));
        Ok(Self { start, end })
    }
}

/// `YYYYMMDDTHHMMSSZ`
pub fn format_basic(dt: DateTime<Utc>) -> String {
    dt.format("%Y%m%dT%H%M%SZ").to_string()
}

pub fn escape_text(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace(';', "\\;")
        .replace(',', "\\,")
        .replace('\n', "\\n")
}

/// Keeps at most `limit` characters of already-escaped text, never cutting
/// between a backslash and the character it escapes.
fn truncate_escaped(text: &str, limit: usize) -> &str {
    let mut kept = 0;
    let mut end = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((_, ch)) = chars.next() {
        let width = if ch == '\\' && chars.peek().is_some() { 2 } else { 1 };
        if kept + width > limit {
            break;
        }
        if width == 2 {
            chars.next();
        }
        kept += width;
        end = chars.peek().map_or(text.len(), |&(idx, _)| idx);
    }
    &text[..end]
}

fn non_blank(value: Option<&str>) -> &str {
    value.map(str::trim).unwrap_or_default()
}

fn title_of(event: &Event) -> String {
    event
        .title
        .as_deref()
        .and_then(utils::non_empty)
        .unwrap_or_else(|| "Crypto Event".to_string())
}

pub fn google_url(event: &Event) -> Result<String, CalendarError> {
    let span = Span::of(event)?;
    let dates = format!("{}/{}", format_basic(span.start), format_basic(span.end));
    utils::url_with_params(
        "https://calendar.google.com/calendar/render",
        &[
            ("action", "TEMPLATE"),
            ("text", title_of(event).as_str()),
            ("dates", dates.as_str()),
            ("details", non_blank(event.description.as_deref())),
            ("location", non_blank(event.venue.as_deref())),
        ],
    )
    .ok_or(CalendarError::Url("google"))
}

pub fn outlook_url(event: &Event) -> Result<String, CalendarError> {
    let span = Span::of(event)?;
    let start = span.start.to_rfc3339_opts(SecondsFormat::Millis, true);
    let end = span.end.to_rfc3339_opts(SecondsFormat::Millis, true);
    utils::url_with_params(
        "https://outlook.live.com/calendar/0/deeplink/compose",
        &[
            ("subject", title_of(event).as_str()),
            ("startdt", start.as_str()),
            ("enddt", end.as_str()),
            ("body", non_blank(event.description.as_deref())),
            ("location", non_blank(event.venue.as_deref())),
        ],
    )
    .ok_or(CalendarError::Url("outlook"))
}

/// Renders a single-event VCALENDAR with a one-hour reminder. Properties
/// whose value is empty are left out.
pub fn ics_document(event: &Event, now: DateTime<Utc>) -> Result<String, CalendarError> {
    let span = Span::of(event)?;
    let title = escape_text(&title_of(event));
    let description = escape_text(non_blank(event.description.as_deref()));
    let location = escape_text(non_blank(event.venue.as_deref()));
    let organizer = escape_text(non_blank(event.organizer.as_deref()));
    let url = non_blank(event.ticket_url.as_deref());
    let uid = match event.external_id.trim() {
        "" => now.timestamp_millis().to_string(),
        id => id.to_string(),
    };

    let optional = |prefix: &str, value: &str| -> Option<String> {
        (!value.is_empty()).then(|| format!("{prefix}{value}"))
    };

    let lines: Vec<Option<String>> = vec![
        Some("BEGIN:VCALENDAR".into()),
        Some("VERSION:2.0".into()),
        Some(format!("PRODID:{PRODUCT_ID}")),
        Some("CALSCALE:GREGORIAN".into()),
        Some("METHOD:PUBLISH".into()),
        Some("BEGIN:VEVENT".into()),
        Some(format!("UID:{uid}@{UID_DOMAIN}")),
        Some(format!("DTSTART:{}", format_basic(span.start))),
        Some(format!("DTEND:{}", format_basic(span.end))),
        Some(format!("DTSTAMP:{}", format_basic(now))),
        Some(format!("SUMMARY:{title}")),
        optional("DESCRIPTION:", truncate_escaped(&description, DESCRIPTION_LIMIT)),
        optional("LOCATION:", &location),
        optional("ORGANIZER:CN=", &organizer),
        optional("URL:", url),
        Some("STATUS:CONFIRMED".into()),
        Some("SEQUENCE:0".into()),
        Some("BEGIN:VALARM".into()),
        Some("TRIGGER:-PT1H".into()),
        Some("ACTION:DISPLAY".into()),
        Some(format!("DESCRIPTION:Reminder: {title}")),
        Some("END:VALARM".into()),
        Some("END:VEVENT".into()),
        Some("END:VCALENDAR".into()),
    ];

    Ok(lines.into_iter().flatten().collect::<Vec<_>>().join("\r\n"))
}

pub fn ics_filename(event: &Event) -> String {
    format!("{}.ics", FILENAME_UNSAFE.replace_all(&title_of(event), "_"))
}

pub fn export(
    event: &Event,
    provider: CalendarProvider,
    now: DateTime<Utc>,
) -> Result<CalendarExport, CalendarError> {
    match provider {
        CalendarProvider::Google => google_url(event).map(|url| CalendarExport::OpenUrl { url }),
        CalendarProvider::Outlook => outlook_url(event).map(|url| CalendarExport::OpenUrl { url }),
        CalendarProvider::Apple | CalendarProvider::Ics => {
            ics_document(event, now).map(|body| CalendarExport::Download {
                filename: ics_filename(event),
                content_type: ICS_CONTENT_TYPE,
                body,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 20, 8, 30, 0).unwrap()
    }

    fn event() -> Event {
        Event {
            external_id: "evt-42".into(),
            title: Some("Devcon; Day 1".into()),
            description: Some("Talks, workshops\nand more".into()),
            venue: Some("QSNCC, Bangkok".into()),
            organizer: Some("Ethereum Foundation".into()),
            date_time: Some("2025-06-01T10:00:00".into()),
            ticket_url: Some("https://tickets.devcon.org".into()),
            ..Default::default()
        }
    }

    fn lines(doc: &str) -> Vec<&str> {
        doc.split("\r\n").collect()
    }

    #[test]
    fn missing_end_is_one_hour_after_start() {
        let doc = ics_document(&event(), now()).expect("ics");
        let lines = lines(&doc);
        assert!(lines.contains(&"DTSTART:20250601T100000Z"));
        assert!(lines.contains(&"DTEND:20250601T110000Z"));
        assert!(lines.contains(&"DTSTAMP:20250520T083000Z"));
    }

    #[test]
    fn escapes_text_properties() {
        let doc = ics_document(&event(), now()).expect("ics");
        let lines = lines(&doc);
        assert!(lines.contains(&"SUMMARY:Devcon\\; Day 1"));
        assert!(lines.contains(&"DESCRIPTION:Talks\\, workshops\\nand more"));
        assert!(lines.contains(&"LOCATION:QSNCC\\, Bangkok"));
        assert!(lines.contains(&"ORGANIZER:CN=Ethereum Foundation"));
        assert!(lines.contains(&"URL:https://tickets.devcon.org"));
        assert!(lines.contains(&"UID:evt-42@cryptoevents.com"));
        assert!(lines.contains(&"DESCRIPTION:Reminder: Devcon\\; Day 1"));
        assert_eq!(escape_text("a\\b"), "a\\\\b");
    }

    #[test]
    fn empty_properties_are_omitted() {
        let sparse = Event {
            external_id: "evt-1".into(),
            date_time: Some("2025-06-01T10:00:00Z".into()),
            end_time: Some("2025-06-01T15:00:00Z".into()),
            ..Default::default()
        };
        let doc = ics_document(&sparse, now()).expect("ics");
        assert!(!doc.contains("LOCATION"));
        assert!(!doc.contains("ORGANIZER"));
        assert!(!doc.contains("URL:"));
        assert!(!doc.contains("\r\n\r\n"));
        assert!(doc.contains("SUMMARY:Crypto Event"));
        assert!(doc.contains("DTEND:20250601T150000Z"));
        assert_eq!(
            lines(&doc).iter().filter(|l| l.starts_with("DESCRIPTION")).count(),
            1
        );
    }

    #[test]
    fn description_is_capped() {
        let long = Event {
            description: Some("x".repeat(900)),
            ..event()
        };
        let doc = ics_document(&long, now()).expect("ics");
        let line = lines(&doc)
            .into_iter()
            .find(|l| l.starts_with("DESCRIPTION:x"))
            .expect("description line");
        assert_eq!(line.len(), "DESCRIPTION:".len() + 500);
    }

    #[test]
    fn description_cap_keeps_escape_pairs_whole() {
        let long = Event {
            description: Some(format!("{},tail", "x".repeat(499))),
            ..event()
        };
        let doc = ics_document(&long, now()).expect("ics");
        let line = lines(&doc)
            .into_iter()
            .find(|l| l.starts_with("DESCRIPTION:x"))
            .expect("description line");
        assert_eq!(line, format!("DESCRIPTION:{}", "x".repeat(499)));

        assert_eq!(truncate_escaped("ab\\,cd", 3), "ab");
        assert_eq!(truncate_escaped("ab\\,cd", 4), "ab\\,");
        assert_eq!(truncate_escaped("short", 500), "short");
    }

    #[test]
    fn uid_falls_back_to_timestamp() {
        let anonymous = Event {
            external_id: String::new(),
            ..event()
        };
        let doc = ics_document(&anonymous, now()).expect("ics");
        let expected = format!("UID:{}@cryptoevents.com", now().timestamp_millis());
        assert!(lines(&doc).contains(&expected.as_str()));
    }

    #[test]
    fn missing_start_is_an_error() {
        let undated = Event {
            date_time: None,
            ..event()
        };
        assert_eq!(
            export(&undated, CalendarProvider::Google, now()),
            Err(CalendarError::MissingStart)
        );
        assert_eq!(
            CalendarError::MissingStart.to_string(),
            "Event date is missing. Cannot add to calendar."
        );
    }

    #[test]
    fn google_url_uses_compact_dates() {
        let url = google_url(&event()).expect("google");
        assert!(url.starts_with("https://calendar.google.com/calendar/render?action=TEMPLATE&text=Devcon"));
        assert!(url.contains("dates=20250601T100000Z%2F20250601T110000Z"));
        assert!(url.contains("location=QSNCC%2C%20Bangkok"));
    }

    #[test]
    fn outlook_url_uses_iso_dates() {
        let url = outlook_url(&event()).expect("outlook");
        assert!(url.contains("startdt=2025-06-01T10%3A00%3A00.000Z"));
        assert!(url.contains("enddt=2025-06-01T11%3A00%3A00.000Z"));
    }

    #[test]
    fn apple_and_ics_download_a_named_file() {
        for provider in [CalendarProvider::Apple, CalendarProvider::Ics] {
            match export(&event(), provider, now()).expect("export") {
                CalendarExport::Download {
                    filename,
                    content_type,
                    body,
                } => {
                    assert_eq!(filename, "Devcon__Day_1.ics");
                    assert_eq!(content_type, ICS_CONTENT_TYPE);
                    assert!(body.starts_with("BEGIN:VCALENDAR\r\n"));
                    assert!(body.ends_with("END:VCALENDAR"));
                }
                other => panic!("unexpected export {other:?}"),
            }
        }
    }
}
