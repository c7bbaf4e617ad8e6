use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, create_security_headers_layer};
use crate::handlers::{auth, events, health_check, registrations};
use crate::state::AppState;

pub fn create_routes(state: AppState) -> Router {
    let security = create_security_headers_layer(&state.config);
    let cors = create_cors_layer(&state.config.allowed_origins);

    Router::new()
        .route("/health", get(health_check))
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/events", get(events::list_events).post(events::create_event))
        .route("/events/tags", get(events::event_tags))
        .route("/events/:id", get(events::get_event))
        .route("/register-event", post(registrations::register_event))
        .route("/dashboard", get(registrations::dashboard))
        .layer(security)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
