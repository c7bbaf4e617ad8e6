use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Store, StoreError};
use crate::models::{Event, EventDetails, NewRegistration, NewUser, Registration, User};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    events: Vec<Event>,
    registrations: Vec<Registration>,
}

/// A process-local store holding the same constraints as the database schema:
/// unique user emails and one registration per user and event.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate);
        }

        let user = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            created_at: user.created_at,
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn insert_event(&self, details: EventDetails) -> Result<Event, StoreError> {
        let event = Event {
            id: Uuid::new_v4(),
            details,
        };
        self.tables.write().await.events.push(event.clone());
        Ok(event)
    }

    async fn list_events(&self) -> Result<Vec<Event>, StoreError> {
        let tables = self.tables.read().await;
        let mut events = tables.events.clone();
        // Ties on created_at list the latest insert first.
        events.reverse();
        events.sort_by(|a, b| b.details.created_at.cmp(&a.details.created_at));
        Ok(events)
    }

    async fn find_event(&self, id: Uuid) -> Result<Option<Event>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.events.iter().find(|e| e.id == id).cloned())
    }

    async fn insert_registration(
        &self,
        registration: NewRegistration,
    ) -> Result<Registration, StoreError> {
        let mut tables = self.tables.write().await;
        let taken = tables.registrations.iter().any(|r| {
            r.event_id == registration.event_id && r.user_email == registration.user_email
        });
        if taken {
            return Err(StoreError::Duplicate);
        }

        let registration = Registration {
            id: Uuid::new_v4(),
            event_id: registration.event_id,
            user_email: registration.user_email,
            registered_at: registration.registered_at,
        };
        tables.registrations.push(registration.clone());
        Ok(registration)
    }

    async fn registered_events(&self, user_email: &str) -> Result<Vec<Event>, StoreError> {
        let tables = self.tables.read().await;
        let mut events: Vec<Event> = tables
            .registrations
            .iter()
            .filter(|r| r.user_email == user_email)
            .filter_map(|r| tables.events.iter().find(|e| e.id == r.event_id))
            .cloned()
            .collect();
        events.sort_by_key(|e| e.details.start_date_time);
        Ok(events)
    }
}
