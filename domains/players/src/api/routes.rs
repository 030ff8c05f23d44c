//! Route definitions for the players domain API

use axum::{routing::post, Router};

use super::handlers::webhook;
use super::middleware::PlayersState;

/// Create all players domain API routes
pub fn routes() -> Router<PlayersState> {
    Router::new().route("/webhook", post(webhook::receive_postback))
}
