//! Players domain: affiliate postbacks, player records, operator notifications

pub mod api;
pub mod domain;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::entities::*;
pub use domain::postback::{EventType, Postback};
// Re-export repository types
pub use repository::{run_migrations, InMemoryUserStore, PgUserStore, StoreResult, UserStore};

// Re-export API types
pub use api::routes;
pub use api::PlayersState;
