use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category an organizer picks for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    Meetup,
    Workshop,
    Conference,
    Networking,
    #[serde(rename = "Panel Discussion")]
    PanelDiscussion,
    #[serde(rename = "Pitch Event")]
    PitchEvent,
    Hackathon,
    Other,
}

impl EventType {
    pub const ALL: [EventType; 8] = [
        EventType::Meetup,
        EventType::Workshop,
        EventType::Conference,
        EventType::Networking,
        EventType::PanelDiscussion,
        EventType::PitchEvent,
        EventType::Hackathon,
        EventType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Meetup => "Meetup",
            EventType::Workshop => "Workshop",
            EventType::Conference => "Conference",
            EventType::Networking => "Networking",
            EventType::PanelDiscussion => "Panel Discussion",
            EventType::PitchEvent => "Pitch Event",
            EventType::Hackathon => "Hackathon",
            EventType::Other => "Other",
        }
    }
}

impl FromStr for EventType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventFormat {
    #[default]
    InPerson,
    Virtual,
    Hybrid,
}

impl EventFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventFormat::InPerson => "in-person",
            EventFormat::Virtual => "virtual",
            EventFormat::Hybrid => "hybrid",
        }
    }

    /// Whether events of this format happen at a physical venue.
    pub fn has_location(&self) -> bool {
        matches!(self, EventFormat::InPerson | EventFormat::Hybrid)
    }

    /// Whether events of this format are streamed on an online platform.
    pub fn is_online(&self) -> bool {
        matches!(self, EventFormat::Virtual | EventFormat::Hybrid)
    }
}

impl FromStr for EventFormat {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in-person" => Ok(EventFormat::InPerson),
            "virtual" => Ok(EventFormat::Virtual),
            "hybrid" => Ok(EventFormat::Hybrid),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketType {
    #[default]
    Free,
    Paid,
}

impl TicketType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketType::Free => "free",
            TicketType::Paid => "paid",
        }
    }
}

impl FromStr for TicketType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(TicketType::Free),
            "paid" => Ok(TicketType::Paid),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// A string that names none of an enum's variants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown value '{0}'")]
pub struct UnknownVariant(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub venue: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Online {
    pub platform: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Where an event takes place. The variant carries exactly the fields its
/// format needs, so a virtual event has no venue at all rather than an empty one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "eventFormat", rename_all = "kebab-case")]
pub enum Venue {
    InPerson(Location),
    Virtual(Online),
    Hybrid {
        #[serde(flatten)]
        location: Location,
        #[serde(flatten)]
        online: Online,
    },
}

impl Venue {
    pub fn format(&self) -> EventFormat {
        match self {
            Venue::InPerson(_) => EventFormat::InPerson,
            Venue::Virtual(_) => EventFormat::Virtual,
            Venue::Hybrid { .. } => EventFormat::Hybrid,
        }
    }

    pub fn location(&self) -> Option<&Location> {
        match self {
            Venue::InPerson(location) | Venue::Hybrid { location, .. } => Some(location),
            Venue::Virtual(_) => None,
        }
    }

    pub fn online(&self) -> Option<&Online> {
        match self {
            Venue::Virtual(online) | Venue::Hybrid { online, .. } => Some(online),
            Venue::InPerson(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Organizer {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Ticket {
    Free,
    Paid { price: Decimal, currency: String },
}

impl Ticket {
    pub fn ticket_type(&self) -> TicketType {
        match self {
            Ticket::Free => TicketType::Free,
            Ticket::Paid { .. } => TicketType::Paid,
        }
    }
}

/// Everything about an event except its storage id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetails {
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub venue: Venue,
    pub start_date_time: DateTime<Utc>,
    pub end_date_time: DateTime<Utc>,
    pub organizer: Organizer,
    pub ticket: Ticket,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_deadline: Option<DateTime<Utc>>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub id: Uuid,
    #[serde(flatten)]
    pub details: EventDetails,
}

impl Event {
    pub fn format(&self) -> EventFormat {
        self.details.venue.format()
    }

    /// Whether the registration deadline, if any, has passed at `now`.
    pub fn registration_closed(&self, now: DateTime<Utc>) -> bool {
        self.details
            .registration_deadline
            .is_some_and(|deadline| deadline < now)
    }
}
