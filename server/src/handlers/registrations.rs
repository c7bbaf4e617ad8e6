use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Response;
use axum::Json;
use chrono::Utc;
use tracing::info;

use super::events::EventList;
use crate::models::{NewRegistration, RegisterRequest};
use crate::services::Session;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};

pub async fn register_event(
    State(state): State<AppState>,
    session: Session,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(RegisterRequest { event_id }) = payload?;
    let now = Utc::now();

    let event = state
        .store
        .find_event(event_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Event '{event_id}' was not found")))?;

    if event.registration_closed(now) {
        return Err(AppError::ValidationError(
            "Registration for this event has closed".to_string(),
        ));
    }

    // The store's uniqueness constraint decides duplicates, so two concurrent
    // requests cannot both succeed.
    let registration = state
        .store
        .insert_registration(NewRegistration {
            event_id,
            user_email: session.email,
            registered_at: now,
        })
        .await
        .map_err(|e| AppError::from_store(e, "Already registered"))?;

    info!(event_id = %event_id, user = %registration.user_email, "Registered for event");

    Ok(created(registration, "Registered successfully"))
}

/// Events the caller has registered for, soonest first.
pub async fn dashboard(
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, AppError> {
    let events = state.store.registered_events(&session.email).await?;

    Ok(success(EventList { events }, "Registered events retrieved"))
}
