//! Seven-step "list your event" wizard.
//!
//! Steps are linear; only the basics step (title, start date, event type)
//! carries validation. Submission is split into [`Wizard::begin_submit`] and
//! [`Wizard::finish_submit`] so a host can release its lock around the POST.

pub mod banner;
pub mod draft;
pub mod payload;
pub mod preview;
pub mod submit;

use serde::Serialize;

use banner::{Banner, BannerError};
use draft::{EntryId, Field, Pill, ValidationError, WizardDraft};
use payload::EventSubmission;
use preview::Preview;
use submit::{SubmitClient, SubmitError};

pub const FIRST_STEP: u8 = 1;
pub const LAST_STEP: u8 = 7;

const SUBMIT_LABEL: &str = "Submit Event";
const SUBMITTING_LABEL: &str = "Submitting...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionKind {
    Tickets,
    Sponsors,
    Partners,
    Faqs,
    Contents,
}

#[derive(Debug, Clone)]
pub enum WizardIntent {
    Set(Field, String),
    SetDateOnly(bool),
    UploadBanner { mime: String, bytes: Vec<u8> },
    Next,
    Prev,
    Jump(u8),
    Add(CollectionKind),
    Remove(CollectionKind, EntryId),
    DismissError,
    DismissNotice,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepControls {
    pub show_prev: bool,
    pub show_next: bool,
    pub show_submit: bool,
    pub submit_enabled: bool,
    pub submit_label: &'static str,
}

#[derive(Debug)]
pub struct Wizard {
    step: u8,
    draft: WizardDraft,
    focus: Option<Field>,
    error: Option<String>,
    notice: Option<String>,
    submitting: bool,
    completed: bool,
}

impl Default for Wizard {
    fn default() -> Self {
        Self {
            step: FIRST_STEP,
            draft: WizardDraft::default(),
            focus: None,
            error: None,
            notice: None,
            submitting: false,
            completed: false,
        }
    }
}

impl Wizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> u8 {
        self.step
    }

    pub fn draft(&self) -> &WizardDraft {
        &self.draft
    }

    pub fn focus(&self) -> Option<Field> {
        self.focus
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn dispatch(&mut self, intent: WizardIntent) {
        match intent {
            WizardIntent::Set(field, value) => self.draft.set(field, value),
            WizardIntent::SetDateOnly(flag) => self.draft.date_only = flag,
            WizardIntent::UploadBanner { mime, bytes } => {
                if let Err(err) = self.upload_banner(&mime, &bytes) {
                    tracing::info!(%mime, size = bytes.len(), "banner rejected: {err}");
                    self.notice = Some(err.to_string());
                }
            }
            WizardIntent::Next => {
                self.next().ok();
            }
            WizardIntent::Prev => self.prev(),
            WizardIntent::Jump(target) => {
                self.jump(target).ok();
            }
            WizardIntent::Add(collection) => {
                let added = match collection {
                    CollectionKind::Tickets => self.draft.add_ticket(),
                    CollectionKind::Sponsors => self.draft.add_sponsor(),
                    CollectionKind::Partners => self.draft.add_partner(),
                    CollectionKind::Faqs => self.draft.add_faq(),
                    CollectionKind::Contents => self.draft.add_content(),
                };
                self.focus = added.err().map(|err| err.field);
            }
            WizardIntent::Remove(collection, id) => match collection {
                CollectionKind::Tickets => self.draft.tickets.remove(id),
                CollectionKind::Sponsors => self.draft.sponsors.remove(id),
                CollectionKind::Partners => self.draft.partners.remove(id),
                CollectionKind::Faqs => self.draft.faqs.remove(id),
                CollectionKind::Contents => self.draft.contents.remove(id),
            },
            WizardIntent::DismissError => self.error = None,
            WizardIntent::DismissNotice => self.notice = None,
        }
    }

    fn validate(&mut self, step: u8) -> Result<(), ValidationError> {
        let result = if step == FIRST_STEP {
            self.draft.validate_basics()
        } else {
            Ok(())
        };
        self.focus = result.err().map(|err| err.field);
        result
    }

    pub fn next(&mut self) -> Result<u8, ValidationError> {
        self.validate(self.step)?;
        self.step = (self.step + 1).min(LAST_STEP);
        Ok(self.step)
    }

    pub fn prev(&mut self) {
        if self.step > FIRST_STEP {
            self.step -= 1;
        }
    }

    pub fn jump(&mut self, target: u8) -> Result<u8, ValidationError> {
        let target = target.clamp(FIRST_STEP, LAST_STEP);
        if target > self.step {
            self.validate(self.step)?;
        }
        self.step = target;
        Ok(self.step)
    }

    /// Accepts an image upload; on rejection the draft is left as it was.
    pub fn upload_banner(&mut self, mime: &str, bytes: &[u8]) -> Result<(), BannerError> {
        self.draft.banner = Banner::from_upload(mime, bytes)?;
        self.draft.image_url_input.clear();
        Ok(())
    }

    pub fn controls(&self) -> StepControls {
        StepControls {
            show_prev: self.step > FIRST_STEP,
            show_next: self.step < LAST_STEP,
            show_submit: self.step == LAST_STEP,
            submit_enabled: !self.submitting,
            submit_label: if self.submitting {
                SUBMITTING_LABEL
            } else {
                SUBMIT_LABEL
            },
        }
    }

    pub fn pills(&self, collection: CollectionKind) -> Vec<Pill> {
        match collection {
            CollectionKind::Tickets => self.draft.tickets.pills(),
            CollectionKind::Sponsors => self.draft.sponsors.pills(),
            CollectionKind::Partners => self.draft.partners.pills(),
            CollectionKind::Faqs => self.draft.faqs.pills(),
            CollectionKind::Contents => self.draft.contents.pills(),
        }
    }

    pub fn preview(&self) -> Preview {
        preview::render(&self.draft)
    }

    pub fn payload(&self) -> EventSubmission {
        EventSubmission::from_draft(&self.draft)
    }

    /// Marks the submit control busy and returns the payload to send, or
    /// `None` when submission is not possible right now. A draft whose basics
    /// are incomplete sends the wizard back to step one.
    pub fn begin_submit(&mut self) -> Option<EventSubmission> {
        if self.step != LAST_STEP || self.submitting || self.completed {
            return None;
        }
        if self.validate(FIRST_STEP).is_err() {
            self.step = FIRST_STEP;
            return None;
        }
        self.submitting = true;
        self.error = None;
        Some(self.payload())
    }

    pub fn finish_submit(&mut self, outcome: Result<(), SubmitError>) {
        self.submitting = false;
        match outcome {
            Ok(()) => {
                tracing::info!(title = %self.draft.title.trim(), "event listed");
                self.completed = true;
            }
            Err(err) => {
                tracing::warn!("event submission failed: {err}");
                let message = err.to_string();
                self.error = Some(if message.trim().is_empty() {
                    submit::NETWORK_FALLBACK.to_string()
                } else {
                    message
                });
            }
        }
    }

    pub async fn submit(&mut self, client: &SubmitClient) -> bool {
        let Some(payload) = self.begin_submit() else {
            return false;
        };
        let outcome = client.submit(&payload).await;
        self.finish_submit(outcome);
        self.completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> Wizard {
        let mut wizard = Wizard::new();
        wizard.dispatch(WizardIntent::Set(Field::Title, "DevCon".into()));
        wizard.dispatch(WizardIntent::Set(Field::StartDate, "2025-06-01".into()));
        wizard.dispatch(WizardIntent::Set(Field::EventType, "Conference".into()));
        wizard
    }

    #[test]
    fn next_is_blocked_by_missing_title() {
        let mut wizard = Wizard::new();
        wizard.dispatch(WizardIntent::Next);
        assert_eq!(wizard.step(), 1);
        assert_eq!(wizard.focus(), Some(Field::Title));
    }

    #[test]
    fn next_advances_once_basics_are_filled() {
        let mut wizard = filled();
        wizard.dispatch(WizardIntent::Next);
        assert_eq!(wizard.step(), 2);
        assert_eq!(wizard.focus(), None);
    }

    #[test]
    fn later_steps_always_validate() {
        let mut wizard = filled();
        for _ in 0..10 {
            wizard.dispatch(WizardIntent::Next);
        }
        assert_eq!(wizard.step(), LAST_STEP);
        wizard.dispatch(WizardIntent::Prev);
        assert_eq!(wizard.step(), 6);
    }

    #[test]
    fn prev_stops_at_first_step() {
        let mut wizard = Wizard::new();
        wizard.dispatch(WizardIntent::Prev);
        assert_eq!(wizard.step(), 1);
    }

    #[test]
    fn jump_forward_validates_and_clamps() {
        let mut wizard = Wizard::new();
        assert!(wizard.jump(4).is_err());
        assert_eq!(wizard.step(), 1);

        let mut wizard = filled();
        assert_eq!(wizard.jump(42), Ok(LAST_STEP));
        assert_eq!(wizard.jump(0), Ok(FIRST_STEP));
    }

    #[test]
    fn jump_backward_skips_validation() {
        let mut wizard = filled();
        wizard.jump(5).expect("forward");
        wizard.dispatch(WizardIntent::Set(Field::Title, String::new()));
        assert_eq!(wizard.jump(2), Ok(2));
    }

    #[test]
    fn controls_follow_the_step() {
        let mut wizard = filled();
        let first = wizard.controls();
        assert!(!first.show_prev && first.show_next && !first.show_submit);
        wizard.jump(LAST_STEP).expect("jump");
        let last = wizard.controls();
        assert!(last.show_prev && !last.show_next && last.show_submit);
        assert_eq!(last.submit_label, "Submit Event");
    }

    #[test]
    fn adding_a_ticket_clears_the_name() {
        let mut wizard = Wizard::new();
        wizard.dispatch(WizardIntent::Set(Field::TicketName, "VIP".into()));
        wizard.dispatch(WizardIntent::Set(Field::TicketType, "Paid".into()));
        wizard.dispatch(WizardIntent::Add(CollectionKind::Tickets));
        assert_eq!(wizard.draft().tickets.len(), 1);
        assert_eq!(wizard.draft().ticket_form.name, "");
        assert_eq!(wizard.pills(CollectionKind::Tickets)[0].label, "VIP (Paid)");

        let id = wizard.pills(CollectionKind::Tickets)[0].id;
        wizard.dispatch(WizardIntent::Remove(CollectionKind::Tickets, id));
        assert!(wizard.draft().tickets.is_empty());
    }

    #[test]
    fn failed_add_focuses_the_missing_input() {
        let mut wizard = Wizard::new();
        wizard.dispatch(WizardIntent::Set(Field::ContentHeading, "Agenda".into()));
        wizard.dispatch(WizardIntent::Add(CollectionKind::Contents));
        assert_eq!(wizard.focus(), Some(Field::ContentBody));
        assert!(wizard.draft().contents.is_empty());
    }

    #[test]
    fn upload_and_paste_replace_each_other() {
        let mut wizard = Wizard::new();
        wizard.dispatch(WizardIntent::Set(Field::ImageUrl, "https://img.example/a.png".into()));
        wizard.dispatch(WizardIntent::UploadBanner {
            mime: "image/webp".into(),
            bytes: b"RIFF".to_vec(),
        });
        assert_eq!(wizard.draft().image_url_input, "");
        assert!(wizard
            .preview()
            .banner
            .is_some_and(|url| url.starts_with("data:image/webp;base64,")));

        wizard.dispatch(WizardIntent::Set(Field::ImageUrl, "https://img.example/b.png".into()));
        assert_eq!(wizard.draft().banner, Banner::Linked("https://img.example/b.png".into()));

        wizard.dispatch(WizardIntent::Set(Field::ImageUrl, "  ".into()));
        assert_eq!(wizard.draft().banner, Banner::None);
    }

    #[test]
    fn oversize_upload_changes_nothing() {
        let mut wizard = Wizard::new();
        wizard.dispatch(WizardIntent::Set(Field::ImageUrl, "https://img.example/a.png".into()));
        wizard.dispatch(WizardIntent::UploadBanner {
            mime: "image/png".into(),
            bytes: vec![0; banner::MAX_BANNER_BYTES + 1],
        });
        assert_eq!(wizard.notice(), Some("Image must be under 5MB."));
        assert_eq!(wizard.draft().image_url_input, "https://img.example/a.png");
        assert_eq!(wizard.draft().banner, Banner::Linked("https://img.example/a.png".into()));
        wizard.dispatch(WizardIntent::DismissNotice);
        assert_eq!(wizard.notice(), None);
    }

    #[test]
    fn submit_only_from_the_last_step() {
        let mut wizard = filled();
        assert!(wizard.begin_submit().is_none());
        assert!(wizard.controls().submit_enabled);
    }

    #[test]
    fn submit_with_broken_basics_returns_to_step_one() {
        let mut wizard = filled();
        wizard.jump(LAST_STEP).expect("jump");
        wizard.dispatch(WizardIntent::Set(Field::EventType, " ".into()));
        assert!(wizard.begin_submit().is_none());
        assert_eq!(wizard.step(), 1);
        assert_eq!(wizard.focus(), Some(Field::EventType));
    }

    #[test]
    fn rejected_submission_keeps_the_draft() {
        let mut wizard = filled();
        wizard.jump(LAST_STEP).expect("jump");
        let payload = wizard.begin_submit().expect("payload");
        assert_eq!(payload.title, "DevCon");
        let busy = wizard.controls();
        assert!(!busy.submit_enabled);
        assert_eq!(busy.submit_label, "Submitting...");
        assert!(wizard.begin_submit().is_none());

        wizard.finish_submit(Err(SubmitError::Rejected("Duplicate".into())));
        assert_eq!(wizard.error(), Some("Duplicate"));
        assert!(wizard.controls().submit_enabled);
        assert!(!wizard.is_completed());
        assert_eq!(wizard.draft().title, "DevCon");

        wizard.dispatch(WizardIntent::DismissError);
        assert_eq!(wizard.error(), None);
    }

    #[test]
    fn retry_clears_the_previous_error() {
        let mut wizard = filled();
        wizard.jump(LAST_STEP).expect("jump");
        wizard.begin_submit().expect("payload");
        wizard.finish_submit(Err(SubmitError::Network(String::new())));
        assert_eq!(wizard.error(), Some(submit::NETWORK_FALLBACK));

        wizard.begin_submit().expect("retry");
        assert_eq!(wizard.error(), None);
        wizard.finish_submit(Ok(()));
        assert!(wizard.is_completed());
    }
}
