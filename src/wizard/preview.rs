use chrono::NaiveDate;
use serde::Serialize;

use super::draft::WizardDraft;

const TITLE_PLACEHOLDER: &str = "Event Title";
const TYPE_PLACEHOLDER: &str = "CONFERENCE";
const DATE_PLACEHOLDER: &str = "Date will appear here";
const VENUE_PLACEHOLDER: &str = "Venue will appear here";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Preview {
    pub title: String,
    pub event_type: String,
    pub date_line: String,
    pub venue_line: String,
    pub banner: Option<String>,
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        placeholder.to_string()
    } else {
        trimmed.to_string()
    }
}

fn short_date(raw: &str) -> Option<String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .ok()
        .map(|date| date.format("%b %-d, %Y").to_string())
}

fn date_line(draft: &WizardDraft) -> String {
    let Some(start) = short_date(&draft.start_date) else {
        return DATE_PLACEHOLDER.to_string();
    };
    match short_date(&draft.end_date) {
        Some(end) => format!("{start} - {end}"),
        None => start,
    }
}

fn venue_line(draft: &WizardDraft) -> String {
    let parts: Vec<&str> = [&draft.venue, &draft.city, &draft.country]
        .into_iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect();
    if parts.is_empty() {
        VENUE_PLACEHOLDER.to_string()
    } else {
        parts.join(", ")
    }
}

pub fn render(draft: &WizardDraft) -> Preview {
    Preview {
        title: or_placeholder(&draft.title, TITLE_PLACEHOLDER),
        event_type: or_placeholder(&draft.event_type, TYPE_PLACEHOLDER).to_uppercase(),
        date_line: date_line(draft),
        venue_line: venue_line(draft),
        banner: draft.banner.url().map(str::to_string),
    }
}
