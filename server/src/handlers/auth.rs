use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Response;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::models::{LoginRequest, NewUser, SignupRequest};
use crate::services::auth::{hash_password, verify_password};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignupPayload {
    user_id: Uuid,
}

#[derive(Serialize)]
struct LoginPayload {
    token: String,
    user: SessionUser,
}

#[derive(Serialize)]
struct SessionUser {
    name: String,
    email: String,
}

pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(input) = payload?;
    let name = input.name.trim();
    let email = input.email.trim();

    if name.is_empty() || email.is_empty() || input.password.is_empty() {
        return Err(AppError::ValidationError("All fields are required".to_string()));
    }
    if input.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::ValidationError(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    info!(email = %email, "Signup attempt");

    if state.store.find_user_by_email(email).await?.is_some() {
        return Err(AppError::Conflict("User already exists".to_string()));
    }

    let password_hash = hash_password(input.password, state.config.bcrypt_cost).await?;
    let user = state
        .store
        .create_user(NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password_hash,
            created_at: Utc::now(),
        })
        .await
        .map_err(|e| AppError::from_store(e, "User already exists"))?;

    info!(user_id = %user.id, "User created");

    Ok(created(
        SignupPayload { user_id: user.id },
        "User created successfully",
    ))
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(input) = payload?;
    let email = input.email.trim();

    if email.is_empty() || input.password.is_empty() {
        return Err(AppError::ValidationError(
            "Please enter email and password".to_string(),
        ));
    }

    let user = state.store.find_user_by_email(email).await?.ok_or_else(|| {
        AppError::AuthError("No account found with this email. Please sign up first.".to_string())
    })?;

    if !verify_password(input.password, user.password_hash.clone()).await? {
        return Err(AppError::AuthError("Invalid password".to_string()));
    }

    let token = state.sessions.issue(&user.email, &user.name, Utc::now())?;

    info!(email = %user.email, "Login successful");

    Ok(success(
        LoginPayload {
            token,
            user: SessionUser {
                name: user.name,
                email: user.email,
            },
        },
        "Login successful",
    ))
}
