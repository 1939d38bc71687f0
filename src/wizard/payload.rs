use std::collections::BTreeMap;

use serde::Serialize;

use super::draft::{Collection, ContentBlock, Faq, Partner, Sponsor, Ticket, WizardDraft};
use crate::utils::non_empty;

#[derive(Debug, Clone, Serialize)]
pub struct OrganizerDetails {
    pub name: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub website: Option<String>,
    pub social: BTreeMap<&'static str, Option<String>>,
}

/// Body of `POST /user/list-event`.
#[derive(Debug, Clone, Serialize)]
pub struct EventSubmission {
    pub title: String,
    pub description: Option<String>,
    pub event_type: Option<String>,
    pub venue: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub date_time: Option<String>,
    pub end_time: Option<String>,
    pub image_url: Option<String>,
    pub organizer: Option<String>,
    pub ticket_url: Option<String>,
    pub category_tags: Option<String>,
    pub organizer_details: OrganizerDetails,
    pub tickets: Collection<Ticket>,
    pub sponsors: Collection<Sponsor>,
    pub partners: Collection<Partner>,
    pub faqs: Collection<Faq>,
    pub contents: Collection<ContentBlock>,
}

/// `2025-06-01` + `09:30` -> `2025-06-01T09:30:00`; midnight when the time is
/// missing or the event is date-only.
pub fn build_date_time(date: &str, time: &str, date_only: bool) -> Option<String> {
    let date = date.trim();
    if date.is_empty() {
        return None;
    }
    let time = time.trim();
    if date_only || time.is_empty() {
        Some(format!("{date}T00:00:00"))
    } else {
        Some(format!("{date}T{time}:00"))
    }
}

fn first_filled(preferred: &str, fallback: &str) -> Option<String> {
    non_empty(preferred).or_else(|| non_empty(fallback))
}

impl EventSubmission {
    pub fn from_draft(draft: &WizardDraft) -> Self {
        let end_date = if draft.end_date.trim().is_empty() {
            &draft.start_date
        } else {
            &draft.end_date
        };
        let end_clock = if draft.end_time.trim().is_empty() {
            &draft.start_time
        } else {
            &draft.end_time
        };
        let organizer = &draft.organizer;
        let social = BTreeMap::from([
            ("twitter", non_empty(&organizer.social.twitter)),
            ("facebook", non_empty(&organizer.social.facebook)),
            ("telegram", non_empty(&organizer.social.telegram)),
            ("linkedin", non_empty(&organizer.social.linkedin)),
        ]);

        Self {
            title: draft.title.trim().to_string(),
            description: non_empty(&draft.description),
            event_type: non_empty(&draft.event_type),
            venue: non_empty(&draft.venue),
            city: non_empty(&draft.city),
            country: non_empty(&draft.country),
            date_time: build_date_time(&draft.start_date, &draft.start_time, draft.date_only),
            end_time: build_date_time(end_date, end_clock, draft.date_only),
            image_url: draft
                .banner
                .url()
                .and_then(non_empty)
                .or_else(|| non_empty(&draft.image_url_input)),
            organizer: first_filled(&organizer.company, &organizer.name),
            ticket_url: first_filled(&draft.ticket_url, &draft.ticket_form.url),
            category_tags: non_empty(&draft.category_tags),
            organizer_details: OrganizerDetails {
                name: non_empty(&organizer.name),
                email: non_empty(&organizer.email),
                company: non_empty(&organizer.company),
                website: non_empty(&organizer.website),
                social,
            },
            tickets: draft.tickets.clone(),
            sponsors: draft.sponsors.clone(),
            partners: draft.partners.clone(),
            faqs: draft.faqs.clone(),
            contents: draft.contents.clone(),
        }
    }
}
