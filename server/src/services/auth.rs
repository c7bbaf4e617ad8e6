use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::state::AppState;
use crate::utils::error::AppError;

const UNAUTHORIZED: &str = "Unauthorized";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The user's email.
    pub sub: String,
    pub name: String,
    pub iat: i64,
    pub exp: i64,
}

/// Signs and checks session tokens with a shared HMAC secret.
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl SessionKeys {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    pub fn issue(&self, email: &str, name: &str, now: DateTime<Utc>) -> Result<String, AppError> {
        let claims = Claims {
            sub: email.to_string(),
            name: name.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::InternalServerError(format!("Failed to sign session: {e}")))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        decode::<Claims>(token, &self.decoding, &Validation::default()).map(|data| data.claims)
    }
}

/// The authenticated caller, taken from a `Bearer` session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub email: String,
    pub name: String,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| AppError::AuthError(UNAUTHORIZED.to_string()))?;

        let claims = state.sessions.verify(token.trim()).map_err(|e| {
            tracing::debug!(error = %e, "Rejected session token");
            AppError::AuthError(UNAUTHORIZED.to_string())
        })?;

        Ok(Session {
            email: claims.sub,
            name: claims.name,
        })
    }
}

/// Salts and hashes `password` on the blocking pool.
pub async fn hash_password(password: String, cost: u32) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AppError::InternalServerError(format!("Hashing task failed: {e}")))?
        .map_err(|e| AppError::InternalServerError(format!("Password hashing failed: {e}")))
}

pub async fn verify_password(password: String, hash: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AppError::InternalServerError(format!("Hashing task failed: {e}")))?
        .map_err(|e| AppError::InternalServerError(format!("Password check failed: {e}")))
}
