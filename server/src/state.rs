use std::sync::Arc;

use crate::config::Config;
use crate::services::SessionKeys;
use crate::store::Store;

/// Shared, read-only context every handler receives.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn Store>,
    pub sessions: SessionKeys,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn Store>) -> Self {
        let sessions = SessionKeys::new(config.jwt_secret.as_bytes(), config.session_ttl());

        Self {
            config: Arc::new(config),
            store,
            sessions,
        }
    }
}
