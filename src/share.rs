use serde::{Deserialize, Serialize};

use crate::models::Event;
use crate::utils;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SharePlatform {
    Twitter,
    LinkedIn,
    WhatsApp,
    Facebook,
    Email,
}

/// Link shared for an event: its ticket page, else the directory page.
pub fn share_link(event: &Event, page_url: &str) -> String {
    event
        .ticket_url
        .as_deref()
        .and_then(utils::non_empty)
        .unwrap_or_else(|| page_url.to_string())
}

pub fn share_url(event: &Event, platform: SharePlatform, page_url: &str) -> Option<String> {
    let link = share_link(event, page_url);
    let title = event
        .title
        .as_deref()
        .and_then(utils::non_empty)
        .unwrap_or_else(|| "Crypto Event".to_string());
    let text = format!("Check out this event: {}", event.title.as_deref().unwrap_or_default());
    let text_with_link = format!("{text} {link}");

    match platform {
        SharePlatform::Twitter => utils::url_with_params(
            "https://twitter.com/intent/tweet",
            &[("text", text.as_str()), ("url", link.as_str())],
        ),
        SharePlatform::LinkedIn => utils::url_with_params(
            "https://www.linkedin.com/sharing/share-offsite/",
            &[("url", link.as_str())],
        ),
        SharePlatform::WhatsApp => {
            utils::url_with_params("https://wa.me/", &[("text", text_with_link.as_str())])
        }
        SharePlatform::Facebook => utils::url_with_params(
            "https://www.facebook.com/sharer/sharer.php",
            &[("u", link.as_str())],
        ),
        SharePlatform::Email => utils::url_with_params(
            "mailto:",
            &[("subject", title.as_str()), ("body", text_with_link.as_str())],
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(ticket_url: Option<&str>) -> Event {
        Event {
            external_id: "evt".into(),
            title: Some("Devcon".into()),
            ticket_url: ticket_url.map(str::to_string),
            ..Default::default()
        }
    }

    const PAGE: &str = "https://cryptoevents.com/events";

    #[test]
    fn link_prefers_ticket_url() {
        assert_eq!(
            share_link(&event(Some("https://tix.example.com/devcon")), PAGE),
            "https://tix.example.com/devcon"
        );
        assert_eq!(share_link(&event(None), PAGE), PAGE);
        assert_eq!(share_link(&event(Some("  ")), PAGE), PAGE);
    }

    #[test]
    fn twitter_carries_text_and_url() {
        let url = share_url(&event(None), SharePlatform::Twitter, PAGE).expect("url");
        assert_eq!(
            url,
            "https://twitter.com/intent/tweet?text=Check%20out%20this%20event%3A%20Devcon&url=https%3A%2F%2Fcryptoevents.com%2Fevents"
        );
    }

    #[test]
    fn whatsapp_joins_text_and_link() {
        let url = share_url(&event(None), SharePlatform::WhatsApp, PAGE).expect("url");
        assert!(url.starts_with("https://wa.me/?text=Check%20out"));
        assert!(url.ends_with("Devcon%20https%3A%2F%2Fcryptoevents.com%2Fevents"));
    }

    #[test]
    fn email_uses_subject_and_body() {
        let url = share_url(&event(None), SharePlatform::Email, PAGE).expect("url");
        assert!(url.starts_with("mailto:?subject=Devcon&body="));
    }

    #[test]
    fn linkedin_and_facebook_only_need_the_link() {
        let linkedin = share_url(&event(None), SharePlatform::LinkedIn, PAGE).expect("url");
        assert!(linkedin.starts_with("https://www.linkedin.com/sharing/share-offsite/?url="));
        let facebook = share_url(&event(None), SharePlatform::Facebook, PAGE).expect("url");
        assert!(facebook.starts_with("https://www.facebook.com/sharer/sharer.php?u="));
    }
}
