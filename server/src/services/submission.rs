use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};

use super::validation::{check, ValidationError};
use crate::models::{
    EventDetails, EventForm, EventFormat, Location, Online, Organizer, Ticket, TicketType, Venue,
};

/// What the assembler needs besides the form itself.
#[derive(Debug, Clone)]
pub struct SubmissionContext {
    /// Email of the authenticated user creating the event.
    pub created_by: String,
    pub now: DateTime<Utc>,
    /// Offset the form's local dates and times are written in.
    pub offset: FixedOffset,
    pub currency: String,
}

impl SubmissionContext {
    pub fn local_now(&self) -> NaiveDateTime {
        self.now.with_timezone(&self.offset).naive_local()
    }

    fn to_utc(&self, local: NaiveDateTime) -> DateTime<Utc> {
        // A fixed offset maps every local time to exactly one instant.
        match self.offset.from_local_datetime(&local).single() {
            Some(instant) => instant.with_timezone(&Utc),
            None => local.and_utc(),
        }
    }
}

/// Validates `form` and builds the record to persist.
pub fn assemble(
    form: &EventForm,
    context: &SubmissionContext,
) -> Result<EventDetails, ValidationError> {
    let checked = check(form, context.local_now())?;

    let location = || Location {
        venue: form.venue.trim().to_string(),
        address: form.address.trim().to_string(),
        map_link: optional(&form.map_link),
    };
    let online = || Online {
        platform: form.platform.trim().to_string(),
        meeting_link: optional(&form.meeting_link),
        notes: optional(&form.notes),
    };
    let venue = match form.event_format {
        EventFormat::InPerson => Venue::InPerson(location()),
        EventFormat::Virtual => Venue::Virtual(online()),
        EventFormat::Hybrid => Venue::Hybrid {
            location: location(),
            online: online(),
        },
    };

    let ticket = match (form.ticket_type, checked.price) {
        (TicketType::Paid, Some(price)) => Ticket::Paid {
            price,
            currency: context.currency.clone(),
        },
        (TicketType::Paid, None) => return Err(ValidationError::InvalidPrice),
        (TicketType::Free, _) => Ticket::Free,
    };

    Ok(EventDetails {
        title: form.title.trim().to_string(),
        description: form.description.trim().to_string(),
        event_type: checked.event_type,
        tags: form.normalized_tags(),
        venue,
        start_date_time: context.to_utc(checked.schedule.start),
        end_date_time: context.to_utc(checked.schedule.end),
        organizer: Organizer {
            email: form.organizer_email.trim().to_string(),
            social: optional(&form.social_link),
        },
        ticket,
        registration_deadline: checked.schedule.deadline.map(|d| context.to_utc(d)),
        created_by: context.created_by.clone(),
        created_at: context.now,
    })
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
