use chrono::{DateTime, Duration, Utc};

use crate::models::{Event, EventStatus, ListedEvent};
use crate::utils;

/// How long an event without an end time is considered ongoing.
pub const DEFAULT_ONGOING_WINDOW_HOURS: i64 = 24;

pub fn default_window() -> Duration {
    Duration::hours(DEFAULT_ONGOING_WINDOW_HOURS)
}

pub fn classify(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    ongoing_window: Duration,
) -> EventStatus {
    let start = match start {
        Some(start) => start,
        None => return EventStatus::Upcoming,
    };
    if now < start {
        return EventStatus::Upcoming;
    }
    let end = end.unwrap_or(start + ongoing_window);
    if now > end {
        EventStatus::Ended
    } else {
        EventStatus::Ongoing
    }
}

pub fn status_of(event: &Event, now: DateTime<Utc>, ongoing_window: Duration) -> EventStatus {
    classify(
        utils::parse_optional(event.date_time.as_deref()),
        utils::parse_optional(event.end_time.as_deref()),
        now,
        ongoing_window,
    )
}

pub fn classify_all(
    events: Vec<Event>,
    now: DateTime<Utc>,
    ongoing_window: Duration,
) -> Vec<ListedEvent> {
    events
        .into_iter()
        .map(|event| {
            let status = status_of(&event, now, ongoing_window);
            ListedEvent { event, status }
        })
        .collect()
}
