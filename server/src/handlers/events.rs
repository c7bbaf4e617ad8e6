use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::models::{Event, EventForm};
use crate::services::filter::{collect_tags, filter_events, FilterCriteria, FilterQuery};
use crate::services::submission::{assemble, SubmissionContext};
use crate::services::Session;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};

#[derive(Serialize)]
pub struct EventList {
    pub events: Vec<Event>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreatedEvent {
    event_id: Uuid,
}

#[derive(Serialize)]
struct TagList {
    tags: Vec<String>,
}

/// Lists events, newest first, narrowed by any filters in the query string.
pub async fn list_events(
    State(state): State<AppState>,
    query: Result<Query<FilterQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    let Query(query) = query?;
    let criteria = FilterCriteria::try_from(query)?;

    let events = filter_events(state.store.list_events().await?, &criteria);

    Ok(success(EventList { events }, "Events retrieved"))
}

pub async fn create_event(
    State(state): State<AppState>,
    session: Session,
    payload: Result<Json<EventForm>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(mut form) = payload?;
    if form.organizer_email.trim().is_empty() {
        form.organizer_email = session.email.clone();
    }

    let context = SubmissionContext {
        created_by: session.email,
        now: Utc::now(),
        offset: state.config.offset(),
        currency: state.config.currency.clone(),
    };
    let details = assemble(&form, &context)?;

    info!(title = %details.title, created_by = %details.created_by, "Creating event");

    let event = state.store.insert_event(details).await?;

    info!(event_id = %event.id, "Event created");

    Ok(created(
        CreatedEvent { event_id: event.id },
        "Event created successfully",
    ))
}

/// Every tag in use, for building a browse sidebar.
pub async fn event_tags(State(state): State<AppState>) -> Result<Response, AppError> {
    let events = state.store.list_events().await?;

    Ok(success(
        TagList {
            tags: collect_tags(&events),
        },
        "Tags retrieved",
    ))
}

pub async fn get_event(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Response, AppError> {
    let Path(id) = id?;

    let event = state
        .store
        .find_event(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Event '{id}' was not found")))?;

    Ok(success(event, "Event retrieved"))
}
