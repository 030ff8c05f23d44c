//! Postback relay composition root
//!
//! Builds the shared dependencies once at startup and composes the domain
//! routers into a single application.

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use postback_common::{Config, StoreProvider};
use postback_notify::{NotificationServiceFactory, NotifierConfig};
use postback_players::{InMemoryUserStore, PgUserStore, PlayersState, UserStore};
use sqlx::PgPool;
use tracing::info;

/// Postbacks are small JSON objects; anything larger is rejected.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Connect the player store and build the notification channels.
///
/// A store that cannot be reached at startup is fatal.
pub async fn build_state(
    config: &Config,
    notifier_config: NotifierConfig,
) -> Result<PlayersState, anyhow::Error> {
    let store: Arc<dyn UserStore> = match config.store_provider {
        StoreProvider::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL is required"))?;

            let pool = PgPool::connect(database_url)
                .await
                .map_err(|e| anyhow::anyhow!("Database connection failed: {}", e))?;
            info!("Database connection established");

            postback_players::run_migrations(&pool)
                .await
                .map_err(|e| anyhow::anyhow!("Database migration failed: {}", e))?;
            info!("Database migrations applied");

            Arc::new(PgUserStore::new(pool))
        }
        StoreProvider::Memory => {
            info!("Using in-memory player store");
            Arc::new(InMemoryUserStore::new())
        }
    };

    let notifiers = NotificationServiceFactory::create(notifier_config)
        .map_err(|e| anyhow::anyhow!("Notification setup failed: {}", e))?;

    Ok(PlayersState { store, notifiers })
}

/// Create the main application router with all routes
pub fn create_app(state: PlayersState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(postback_players::routes().with_state(state))
        .layer(body_limit_layer())
}

/// Request body size limit applied to every route
pub fn body_limit_layer() -> DefaultBodyLimit {
    DefaultBodyLimit::max(MAX_BODY_BYTES)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
