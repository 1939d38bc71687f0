use serde::{ser::SerializeSeq, Serialize, Serializer};
use thiserror::Error;

use super::banner::Banner;
use crate::utils::non_empty;

/// Every text input the wizard knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Title,
    Description,
    EventType,
    Venue,
    City,
    Country,
    StartDate,
    StartTime,
    EndDate,
    EndTime,
    ImageUrl,
    TicketUrl,
    CategoryTags,
    OrganizerName,
    OrganizerEmail,
    OrganizerCompany,
    OrganizerWebsite,
    OrganizerTwitter,
    OrganizerFacebook,
    OrganizerTelegram,
    OrganizerLinkedin,
    TicketName,
    TicketType,
    TicketDescription,
    TicketQuantity,
    TicketPrice,
    TicketSalesStart,
    TicketSalesEnd,
    TicketStepUrl,
    SponsorName,
    SponsorTier,
    SponsorLogo,
    SponsorWebsite,
    PartnerName,
    PartnerType,
    PartnerLogo,
    PartnerWebsite,
    FaqQuestion,
    FaqAnswer,
    ContentHeading,
    ContentBody,
    ContentAlignment,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("{field:?} is required")]
pub struct ValidationError {
    pub field: Field,
}

fn require(value: &str, field: Field) -> Result<String, ValidationError> {
    non_empty(value).ok_or(ValidationError { field })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct EntryId(u64);

#[derive(Debug, Clone)]
struct Entry<T> {
    id: EntryId,
    item: T,
}

/// Ordered list whose entries are addressed by id, so removing one never
/// shifts another's handle.
#[derive(Debug, Clone)]
pub struct Collection<T> {
    entries: Vec<Entry<T>>,
    next_id: u64,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
        }
    }
}

impl<T> Collection<T> {
    pub fn push(&mut self, item: T) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry { id, item });
        id
    }

    pub fn remove(&mut self, id: EntryId) {
        self.entries.retain(|entry| entry.id != id);
    }

    pub fn get(&self, id: EntryId) -> Option<&T> {
        self.entries.iter().find(|e| e.id == id).map(|e| &e.item)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntryId, &T)> {
        self.entries.iter().map(|e| (e.id, &e.item))
    }

    pub fn items(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|e| &e.item)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Serialize> Serialize for Collection<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.entries.len()))?;
        for item in self.items() {
            seq.serialize_element(item)?;
        }
        seq.end()
    }
}

/// Removable chip shown for one collection entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pill {
    pub id: EntryId,
    pub label: String,
}

pub trait PillLabel {
    fn pill_label(&self) -> String;
}

impl<T: PillLabel> Collection<T> {
    pub fn pills(&self) -> Vec<Pill> {
        self.iter()
            .map(|(id, item)| Pill {
                id,
                label: item.pill_label(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ticket {
    pub name: String,
    #[serde(rename = "type")]
    pub ticket_type: String,
    pub description: Option<String>,
    pub quantity: Option<String>,
    pub price: Option<String>,
    pub sales_start: Option<String>,
    pub sales_end: Option<String>,
    pub url: Option<String>,
}

impl PillLabel for Ticket {
    fn pill_label(&self) -> String {
        format!("{} ({})", self.name, self.ticket_type)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sponsor {
    pub name: String,
    pub tier: Option<String>,
    pub logo_url: Option<String>,
    pub website: Option<String>,
}

impl PillLabel for Sponsor {
    fn pill_label(&self) -> String {
        match &self.tier {
            Some(tier) => format!("{} – {}", self.name, tier),
            None => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Partner {
    pub name: String,
    #[serde(rename = "type")]
    pub partner_type: Option<String>,
    pub logo_url: Option<String>,
    pub website: Option<String>,
}

impl PillLabel for Partner {
    fn pill_label(&self) -> String {
        match &self.partner_type {
            Some(kind) => format!("{} – {}", self.name, kind),
            None => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Faq {
    pub question: String,
    pub answer: String,
}

impl PillLabel for Faq {
    fn pill_label(&self) -> String {
        self.question.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentBlock {
    pub heading: String,
    pub body: String,
    pub alignment: String,
}

impl PillLabel for ContentBlock {
    fn pill_label(&self) -> String {
        self.heading.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketForm {
    pub name: String,
    pub ticket_type: String,
    pub description: String,
    pub quantity: String,
    pub price: String,
    pub sales_start: String,
    pub sales_end: String,
    pub url: String,
}

impl Default for TicketForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            ticket_type: "Free".to_string(),
            description: String::new(),
            quantity: String::new(),
            price: String::new(),
            sales_start: String::new(),
            sales_end: String::new(),
            url: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SponsorForm {
    pub name: String,
    pub tier: String,
    pub logo_url: String,
    pub website: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartnerForm {
    pub name: String,
    pub partner_type: String,
    pub logo_url: String,
    pub website: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FaqForm {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentForm {
    pub heading: String,
    pub body: String,
    pub alignment: String,
}

impl Default for ContentForm {
    fn default() -> Self {
        Self {
            heading: String::new(),
            body: String::new(),
            alignment: "left".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SocialInput {
    pub twitter: String,
    pub facebook: String,
    pub telegram: String,
    pub linkedin: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganizerInput {
    pub name: String,
    pub email: String,
    pub company: String,
    pub website: String,
    pub social: SocialInput,
}

#[derive(Debug, Clone, Default)]
pub struct WizardDraft {
    pub title: String,
    pub description: String,
    pub event_type: String,
    pub venue: String,
    pub city: String,
    pub country: String,
    pub start_date: String,
    pub start_time: String,
    pub end_date: String,
    pub end_time: String,
    pub date_only: bool,
    pub image_url_input: String,
    pub banner: Banner,
    pub ticket_url: String,
    pub category_tags: String,
    pub organizer: OrganizerInput,

    pub ticket_form: TicketForm,
    pub sponsor_form: SponsorForm,
    pub partner_form: PartnerForm,
    pub faq_form: FaqForm,
    pub content_form: ContentForm,

    pub tickets: Collection<Ticket>,
    pub sponsors: Collection<Sponsor>,
    pub partners: Collection<Partner>,
    pub faqs: Collection<Faq>,
    pub contents: Collection<ContentBlock>,
}

impl WizardDraft {
    /// Stores a raw input value. The image URL goes through the banner so the
    /// pasted link replaces any upload.
    pub fn set(&mut self, field: Field, value: String) {
        if field == Field::ImageUrl {
            self.banner = Banner::from_pasted(&value);
            self.image_url_input = value;
            return;
        }
        *self.slot(field) = value;
    }

    fn slot(&mut self, field: Field) -> &mut String {
        match field {
            Field::Title => &mut self.title,
            Field::Description => &mut self.description,
            Field::EventType => &mut self.event_type,
            Field::Venue => &mut self.venue,
            Field::City => &mut self.city,
            Field::Country => &mut self.country,
            Field::StartDate => &mut self.start_date,
            Field::StartTime => &mut self.start_time,
            Field::EndDate => &mut self.end_date,
            Field::EndTime => &mut self.end_time,
            Field::ImageUrl => &mut self.image_url_input,
            Field::TicketUrl => &mut self.ticket_url,
            Field::CategoryTags => &mut self.category_tags,
            Field::OrganizerName => &mut self.organizer.name,
            Field::OrganizerEmail => &mut self.organizer.email,
            Field::OrganizerCompany => &mut self.organizer.company,
            Field::OrganizerWebsite => &mut self.organizer.website,
            Field::OrganizerTwitter => &mut self.organizer.social.twitter,
            Field::OrganizerFacebook => &mut self.organizer.social.facebook,
            Field::OrganizerTelegram => &mut self.organizer.social.telegram,
            Field::OrganizerLinkedin => &mut self.organizer.social.linkedin,
            Field::TicketName => &mut self.ticket_form.name,
            Field::TicketType => &mut self.ticket_form.ticket_type,
            Field::TicketDescription => &mut self.ticket_form.description,
            Field::TicketQuantity => &mut self.ticket_form.quantity,
            Field::TicketPrice => &mut self.ticket_form.price,
            Field::TicketSalesStart => &mut self.ticket_form.sales_start,
            Field::TicketSalesEnd => &mut self.ticket_form.sales_end,
            Field::TicketStepUrl => &mut self.ticket_form.url,
            Field::SponsorName => &mut self.sponsor_form.name,
            Field::SponsorTier => &mut self.sponsor_form.tier,
            Field::SponsorLogo => &mut self.sponsor_form.logo_url,
            Field::SponsorWebsite => &mut self.sponsor_form.website,
            Field::PartnerName => &mut self.partner_form.name,
            Field::PartnerType => &mut self.partner_form.partner_type,
            Field::PartnerLogo => &mut self.partner_form.logo_url,
            Field::PartnerWebsite => &mut self.partner_form.website,
            Field::FaqQuestion => &mut self.faq_form.question,
            Field::FaqAnswer => &mut self.faq_form.answer,
            Field::ContentHeading => &mut self.content_form.heading,
            Field::ContentBody => &mut self.content_form.body,
            Field::ContentAlignment => &mut self.content_form.alignment,
        }
    }

    pub fn validate_basics(&self) -> Result<(), ValidationError> {
        require(&self.title, Field::Title)?;
        require(&self.start_date, Field::StartDate)?;
        require(&self.event_type, Field::EventType)?;
        Ok(())
    }

    /// Appends the ticket form as a new ticket and clears its name.
    pub fn add_ticket(&mut self) -> Result<EntryId, ValidationError> {
        let form = &self.ticket_form;
        let ticket = Ticket {
            name: require(&form.name, Field::TicketName)?,
            ticket_type: form.ticket_type.clone(),
            description: non_empty(&form.description),
            quantity: non_empty(&form.quantity),
            price: non_empty(&form.price),
            sales_start: non_empty(&form.sales_start),
            sales_end: non_empty(&form.sales_end),
            url: non_empty(&form.url),
        };
        self.ticket_form.name.clear();
        Ok(self.tickets.push(ticket))
    }

    pub fn add_sponsor(&mut self) -> Result<EntryId, ValidationError> {
        let form = &self.sponsor_form;
        let sponsor = Sponsor {
            name: require(&form.name, Field::SponsorName)?,
            tier: non_empty(&form.tier),
            logo_url: non_empty(&form.logo_url),
            website: non_empty(&form.website),
        };
        self.sponsor_form.name.clear();
        Ok(self.sponsors.push(sponsor))
    }

    pub fn add_partner(&mut self) -> Result<EntryId, ValidationError> {
        let form = &self.partner_form;
        let partner = Partner {
            name: require(&form.name, Field::PartnerName)?,
            partner_type: non_empty(&form.partner_type),
            logo_url: non_empty(&form.logo_url),
            website: non_empty(&form.website),
        };
        self.partner_form.name.clear();
        Ok(self.partners.push(partner))
    }

    pub fn add_faq(&mut self) -> Result<EntryId, ValidationError> {
        let form = &self.faq_form;
        let faq = Faq {
            question: require(&form.question, Field::FaqQuestion)?,
            answer: require(&form.answer, Field::FaqAnswer)?,
        };
        self.faq_form.question.clear();
        self.faq_form.answer.clear();
        Ok(self.faqs.push(faq))
    }

    pub fn add_content(&mut self) -> Result<EntryId, ValidationError> {
        let form = &self.content_form;
        let block = ContentBlock {
            heading: require(&form.heading, Field::ContentHeading)?,
            body: require(&form.body, Field::ContentBody)?,
            alignment: form.alignment.clone(),
        };
        self.content_form.heading.clear();
        self.content_form.body.clear();
        Ok(self.contents.push(block))
    }
}
