use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use dirs::data_dir;
use once_cell::sync::Lazy;
use std::{fs, path::Path, path::PathBuf};

static DATA_ROOT: Lazy<PathBuf> = Lazy::new(|| {
    let base = data_dir()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
    base.join("crypto-events")
});

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

pub fn data_root() -> PathBuf {
    DATA_ROOT.clone()
}

pub fn config_path() -> PathBuf {
    data_root().join("config.json")
}

pub fn ensure_parent(path: &Path) {
    if let Some(parent) = path.parent() {
        if let Err(err) = fs::create_dir_all(parent) {
            tracing::warn!(parent = %parent.display(), %err, "failed to create parent directory");
        }
    }
}

/// Parses an API timestamp into UTC.
///
/// Offsets are honoured when present; naive timestamps and bare dates are
/// read as UTC. Blank or malformed input yields `None`, which callers render
/// as "TBA".
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in NAIVE_FORMATS.iter() {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Same as [`parse_timestamp`] but accepts the optional fields straight off
/// an [`Event`](crate::models::Event).
pub fn parse_optional(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(parse_timestamp)
}

/// Builds `base?k=v&...` with every value percent-encoded the way
/// browsers encode URI components (spaces as `%20`, not `+`).
pub fn url_with_params(base: &str, params: &[(&str, &str)]) -> Option<String> {
    let url = reqwest::Url::parse_with_params(base, params).ok()?;
    // form encoding writes a literal '+' as %2B, so any '+' left is a space
    Some(String::from(url).replace('+', "%20"))
}

/// Trims the input and maps blank strings to `None`.
pub fn non_empty(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
