use std::env;
use std::ops::RangeInclusive;
use std::str::FromStr;

use chrono::{Duration, FixedOffset, Offset, Utc};
use thiserror::Error;

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::create_security_headers_layer;

const DEV_JWT_SECRET: &str = "colloq-development-secret";
const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";
/// Work factors bcrypt accepts.
const BCRYPT_COSTS: RangeInclusive<u32> = 4..=31;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set in production")]
    MissingSecret,

    #[error("Invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Unset means events live in memory for the life of the process.
    pub database_url: Option<String>,
    pub port: u16,
    pub jwt_secret: String,
    pub session_ttl_hours: i64,
    pub bcrypt_cost: u32,
    /// Offset east of UTC in which organizers enter dates and times.
    pub utc_offset_minutes: i32,
    pub currency: String,
    pub allowed_origins: String,
    pub production: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            port: 3001,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            session_ttl_hours: 24,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            utc_offset_minutes: 330,
            currency: "INR".to_string(),
            allowed_origins: DEFAULT_ALLOWED_ORIGINS.to_string(),
            production: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let production = env::var("RUST_ENV")
            .map(|v| v.to_lowercase() == "production")
            .unwrap_or(false);

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ if production => return Err(ConfigError::MissingSecret),
            _ => {
                tracing::warn!("JWT_SECRET not set, using the development secret");
                defaults.jwt_secret
            }
        };

        let config = Self {
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
            port: parse_var("PORT", defaults.port)?,
            jwt_secret,
            session_ttl_hours: parse_var("SESSION_TTL_HOURS", defaults.session_ttl_hours)?,
            bcrypt_cost: parse_var("BCRYPT_COST", defaults.bcrypt_cost)?,
            utc_offset_minutes: parse_var("EVENT_UTC_OFFSET_MINUTES", defaults.utc_offset_minutes)?,
            currency: env::var("TICKET_CURRENCY").unwrap_or(defaults.currency),
            allowed_origins: env::var("CORS_ALLOWED_ORIGINS").unwrap_or(defaults.allowed_origins),
            production,
        };

        config.validate()?;
        Ok(config)
    }

    /// Rejects values that parse but would only fail once a request uses them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !BCRYPT_COSTS.contains(&self.bcrypt_cost) {
            return Err(ConfigError::Invalid {
                key: "BCRYPT_COST",
                value: self.bcrypt_cost.to_string(),
            });
        }
        if FixedOffset::east_opt(self.utc_offset_minutes * 60).is_none() {
            return Err(ConfigError::Invalid {
                key: "EVENT_UTC_OFFSET_MINUTES",
                value: self.utc_offset_minutes.to_string(),
            });
        }

        Ok(())
    }

    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60)
            .unwrap_or_else(|| Utc.fix())
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::hours(self.session_ttl_hours)
    }
}

fn parse_var<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => {
            let parsed = value.trim().parse();
            parsed.map_err(|_| ConfigError::Invalid { key, value })
        }
        Err(_) => Ok(default),
    }
}
