use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{Store, StoreError};
use crate::models::{
    Event, EventDetails, EventFormat, EventType, Location, NewRegistration, NewUser, Online,
    Organizer, Registration, Ticket, TicketType, User, Venue,
};

const EVENT_COLUMNS: &str = "id, title, description, event_type, tags, event_format, \
     venue, address, map_link, platform, meeting_link, notes, \
     start_date_time, end_date_time, organizer_email, organizer_social, \
     ticket_type, price, currency, registration_deadline, created_by, created_at";

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Flat `events` row; the venue and ticket variants are rebuilt on read.
#[derive(Debug, FromRow)]
struct EventRow {
    id: Uuid,
    title: String,
    description: String,
    event_type: String,
    tags: Vec<String>,
    event_format: String,
    venue: Option<String>,
    address: Option<String>,
    map_link: Option<String>,
    platform: Option<String>,
    meeting_link: Option<String>,
    notes: Option<String>,
    start_date_time: DateTime<Utc>,
    end_date_time: DateTime<Utc>,
    organizer_email: String,
    organizer_social: Option<String>,
    ticket_type: String,
    price: Option<Decimal>,
    currency: Option<String>,
    registration_deadline: Option<DateTime<Utc>>,
    created_by: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<EventRow> for Event {
    type Error = StoreError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        let invalid = |what: &str, value: &str| {
            StoreError::InvalidRecord(format!("event {} has {what} '{value}'", row.id))
        };

        let event_type: EventType = row
            .event_type
            .parse()
            .map_err(|_| invalid("type", &row.event_type))?;
        let format: EventFormat = row
            .event_format
            .parse()
            .map_err(|_| invalid("format", &row.event_format))?;

        let location = || Location {
            venue: row.venue.clone().unwrap_or_default(),
            address: row.address.clone().unwrap_or_default(),
            map_link: row.map_link.clone(),
        };
        let online = || Online {
            platform: row.platform.clone().unwrap_or_default(),
            meeting_link: row.meeting_link.clone(),
            notes: row.notes.clone(),
        };
        let venue = match format {
            EventFormat::InPerson => Venue::InPerson(location()),
            EventFormat::Virtual => Venue::Virtual(online()),
            EventFormat::Hybrid => Venue::Hybrid {
                location: location(),
                online: online(),
            },
        };

        let ticket_type: TicketType = row
            .ticket_type
            .parse()
            .map_err(|_| invalid("ticket type", &row.ticket_type))?;
        let ticket = match (ticket_type, row.price) {
            (TicketType::Free, _) => Ticket::Free,
            (TicketType::Paid, Some(price)) => Ticket::Paid {
                price,
                currency: row.currency.clone().unwrap_or_default(),
            },
            (TicketType::Paid, None) => return Err(invalid("ticket price", "none")),
        };

        Ok(Event {
            id: row.id,
            details: EventDetails {
                title: row.title,
                description: row.description,
                event_type,
                tags: row.tags,
                venue,
                start_date_time: row.start_date_time,
                end_date_time: row.end_date_time,
                organizer: Organizer {
                    email: row.organizer_email,
                    social: row.organizer_social,
                },
                ticket,
                registration_deadline: row.registration_deadline,
                created_by: row.created_by,
                created_at: row.created_at,
            },
        })
    }
}

fn unique_violation(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Duplicate,
        _ => StoreError::Database(err),
    }
}

fn into_events(rows: Vec<EventRow>) -> Result<Vec<Event>, StoreError> {
    rows.into_iter().map(Event::try_from).collect()
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, name, email, password_hash, created_at) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, name, email, password_hash, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(unique_violation)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn insert_event(&self, details: EventDetails) -> Result<Event, StoreError> {
        let id = Uuid::new_v4();
        let location = details.venue.location();
        let online = details.venue.online();
        let (price, currency) = match &details.ticket {
            Ticket::Free => (None, None),
            Ticket::Paid { price, currency } => (Some(*price), Some(currency.as_str())),
        };

        sqlx::query(&format!(
            "INSERT INTO events ({EVENT_COLUMNS}) VALUES \
             ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, \
              $13, $14, $15, $16, $17, $18, $19, $20, $21, $22)"
        ))
        .bind(id)
        .bind(&details.title)
        .bind(&details.description)
        .bind(details.event_type.as_str())
        .bind(&details.tags)
        .bind(details.venue.format().as_str())
        .bind(location.map(|l| l.venue.as_str()))
        .bind(location.map(|l| l.address.as_str()))
        .bind(location.and_then(|l| l.map_link.as_deref()))
        .bind(online.map(|o| o.platform.as_str()))
        .bind(online.and_then(|o| o.meeting_link.as_deref()))
        .bind(online.and_then(|o| o.notes.as_deref()))
        .bind(details.start_date_time)
        .bind(details.end_date_time)
        .bind(&details.organizer.email)
        .bind(details.organizer.social.as_deref())
        .bind(details.ticket.ticket_type().as_str())
        .bind(price)
        .bind(currency)
        .bind(details.registration_deadline)
        .bind(&details.created_by)
        .bind(details.created_at)
        .execute(&self.pool)
        .await?;

        Ok(Event { id, details })
    }

    async fn list_events(&self) -> Result<Vec<Event>, StoreError> {
        let rows = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        into_events(rows)
    }

    async fn find_event(&self, id: Uuid) -> Result<Option<Event>, StoreError> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Event::try_from).transpose()
    }

    async fn insert_registration(
        &self,
        registration: NewRegistration,
    ) -> Result<Registration, StoreError> {
        sqlx::query_as::<_, Registration>(
            "INSERT INTO registrations (id, event_id, user_email, registered_at) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, event_id, user_email, registered_at",
        )
        .bind(Uuid::new_v4())
        .bind(registration.event_id)
        .bind(&registration.user_email)
        .bind(registration.registered_at)
        .fetch_one(&self.pool)
        .await
        .map_err(unique_violation)
    }

    async fn registered_events(&self, user_email: &str) -> Result<Vec<Event>, StoreError> {
        let columns = EVENT_COLUMNS
            .split(", ")
            .map(|column| format!("e.{}", column.trim()))
            .collect::<Vec<_>>()
            .join(", ");
        let rows = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {columns} FROM events e \
             JOIN registrations r ON r.event_id = e.id \
             WHERE r.user_email = $1 \
             ORDER BY e.start_date_time ASC"
        ))
        .bind(user_email)
        .fetch_all(&self.pool)
        .await?;

        into_events(rows)
    }
}
