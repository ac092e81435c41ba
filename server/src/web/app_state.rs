use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::config::AuthConfig;
use crate::engine::chat_engine::ChatEngine;

/// Shared state injected into every handler.
pub struct AppState {
    pub engine: Arc<ChatEngine>,
    pub db: SqlitePool,
    pub auth_config: AuthConfig,
}
