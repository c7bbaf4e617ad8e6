use serde::Deserialize;

use super::event::{EventFormat, TicketType};

/// Raw event fields as a client collects them from the multi-section create
/// form. Every text input is kept as entered; blank means "not supplied".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventForm {
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub tags: Vec<String>,
    pub event_format: EventFormat,

    pub venue: String,
    pub address: String,
    pub map_link: String,

    pub platform: String,
    pub meeting_link: String,
    pub notes: String,

    pub start_date: String,
    pub start_time: String,
    pub end_date: String,
    pub end_time: String,

    pub organizer_email: String,
    pub social_link: String,

    pub ticket_type: TicketType,
    pub price: String,
    pub registration_deadline: String,
}

impl EventForm {
    /// Tags trimmed, blanks dropped and duplicates removed, first occurrence wins.
    pub fn normalized_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = Vec::with_capacity(self.tags.len());
        for tag in &self.tags {
            let tag = tag.trim();
            if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
                tags.push(tag.to_string());
            }
        }
        tags
    }
}
