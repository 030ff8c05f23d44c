//! Players domain state

use crate::repository::UserStore;
use postback_notify::Notifiers;
use std::sync::Arc;

/// Application state for the players domain, built once at startup
#[derive(Clone)]
pub struct PlayersState {
    pub store: Arc<dyn UserStore>,
    pub notifiers: Notifiers,
}
