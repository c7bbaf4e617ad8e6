use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Event, EventDetails, NewRegistration, NewUser, Registration, User};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("Record already exists")]
    Duplicate,

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error("Stored record is malformed: {0}")]
    InvalidRecord(String),
}

/// Persistence for users, events and registrations.
#[async_trait]
pub trait Store: Send + Sync {
    /// Fails with [`StoreError::Duplicate`] when the email is taken.
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn insert_event(&self, details: EventDetails) -> Result<Event, StoreError>;

    /// All events, most recently created first.
    async fn list_events(&self) -> Result<Vec<Event>, StoreError>;

    async fn find_event(&self, id: Uuid) -> Result<Option<Event>, StoreError>;

    /// Fails with [`StoreError::Duplicate`] when the user already holds a
    /// registration for the event.
    async fn insert_registration(
        &self,
        registration: NewRegistration,
    ) -> Result<Registration, StoreError>;

    /// Events `user_email` registered for, earliest start first.
    async fn registered_events(&self, user_email: &str) -> Result<Vec<Event>, StoreError>;
}
