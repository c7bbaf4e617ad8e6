//! Business rules an event form must satisfy before it is stored.
//!
//! Rules run in a fixed order and the first failure is reported, so the
//! message a user sees for a form with several problems is deterministic.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{EventForm, EventType, TicketType};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title is required")]
    TitleRequired,
    #[error("Description is required")]
    DescriptionRequired,
    #[error("Event type is required")]
    TypeRequired,
    #[error("Unknown event type: {0}")]
    UnknownType(String),
    #[error("At least one tag is required")]
    TagRequired,
    #[error("Start date and time are required")]
    StartRequired,
    #[error("Start date or time is not valid")]
    InvalidStart,
    #[error("End time is required")]
    EndTimeRequired,
    #[error("End date or time is not valid")]
    InvalidEnd,
    #[error("Event start date/time cannot be in the past")]
    StartInPast,
    #[error("End time must be after start time")]
    EndNotAfterStart,
    #[error("Registration deadline is not valid")]
    InvalidDeadline,
    #[error("Registration deadline cannot be in the past")]
    DeadlineInPast,
    #[error("Registration deadline must be before event start date")]
    DeadlineNotBeforeStart,
    #[error("Venue is required for in-person/hybrid events")]
    VenueRequired,
    #[error("Address is required for in-person/hybrid events")]
    AddressRequired,
    #[error("Platform is required for virtual/hybrid events")]
    PlatformRequired,
    #[error("Organizer email is required")]
    OrganizerEmailRequired,
    #[error("Valid price is required for paid events")]
    InvalidPrice,
}

/// Local wall-clock instants computed from the form's date and time inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub deadline: Option<NaiveDateTime>,
}

/// The parsed values a passing form yields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckedForm {
    pub event_type: EventType,
    pub schedule: Schedule,
    /// Set only for paid tickets.
    pub price: Option<Decimal>,
}

/// Checks `form` against every rule, with `now` as the local wall-clock time.
pub fn validate(form: &EventForm, now: NaiveDateTime) -> Result<(), ValidationError> {
    check(form, now).map(|_| ())
}

pub fn check(form: &EventForm, now: NaiveDateTime) -> Result<CheckedForm, ValidationError> {
    if is_blank(&form.title) {
        return Err(ValidationError::TitleRequired);
    }
    if is_blank(&form.description) {
        return Err(ValidationError::DescriptionRequired);
    }

    let event_type = match form.event_type.trim() {
        "" => return Err(ValidationError::TypeRequired),
        name => name
            .parse::<EventType>()
            .map_err(|_| ValidationError::UnknownType(name.to_string()))?,
    };

    if form.tags.iter().all(|tag| is_blank(tag)) {
        return Err(ValidationError::TagRequired);
    }

    if is_blank(&form.start_date) || is_blank(&form.start_time) {
        return Err(ValidationError::StartRequired);
    }
    let start_date = parse_date(&form.start_date).ok_or(ValidationError::InvalidStart)?;
    let start = parse_time(&form.start_time)
        .map(|time| start_date.and_time(time))
        .ok_or(ValidationError::InvalidStart)?;

    if is_blank(&form.end_time) {
        return Err(ValidationError::EndTimeRequired);
    }

    if start < now {
        return Err(ValidationError::StartInPast);
    }

    let end_date = if is_blank(&form.end_date) {
        start_date
    } else {
        parse_date(&form.end_date).ok_or(ValidationError::InvalidEnd)?
    };
    let end = parse_time(&form.end_time)
        .map(|time| end_date.and_time(time))
        .ok_or(ValidationError::InvalidEnd)?;
    if end <= start {
        return Err(ValidationError::EndNotAfterStart);
    }

    let deadline = if is_blank(&form.registration_deadline) {
        None
    } else {
        let deadline =
            parse_deadline(&form.registration_deadline).ok_or(ValidationError::InvalidDeadline)?;
        if deadline < now {
            return Err(ValidationError::DeadlineInPast);
        }
        if deadline >= start {
            return Err(ValidationError::DeadlineNotBeforeStart);
        }
        Some(deadline)
    };

    if form.event_format.has_location() {
        if is_blank(&form.venue) {
            return Err(ValidationError::VenueRequired);
        }
        if is_blank(&form.address) {
            return Err(ValidationError::AddressRequired);
        }
    }

    if form.event_format.is_online() && is_blank(&form.platform) {
        return Err(ValidationError::PlatformRequired);
    }

    if is_blank(&form.organizer_email) {
        return Err(ValidationError::OrganizerEmailRequired);
    }

    let price = match form.ticket_type {
        TicketType::Free => None,
        TicketType::Paid => match form.price.trim().parse::<Decimal>() {
            Ok(price) if is_storable_price(price) => Some(price),
            _ => return Err(ValidationError::InvalidPrice),
        },
    };

    Ok(CheckedForm {
        event_type,
        schedule: Schedule {
            start,
            end,
            deadline,
        },
        price,
    })
}

/// Exclusive bound of the `NUMERIC(12, 2)` price column.
const MAX_PRICE: i64 = 10_000_000_000;

/// Positive, with at most two decimal places and ten integer digits.
fn is_storable_price(price: Decimal) -> bool {
    price > Decimal::ZERO
        && price.normalize().scale() <= 2
        && price < Decimal::from(MAX_PRICE)
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

fn parse_time(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

/// Accepts a `datetime-local` value or a bare date, which means midnight.
fn parse_deadline(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| parse_date(value).map(|date| date.and_time(NaiveTime::MIN)))
}
