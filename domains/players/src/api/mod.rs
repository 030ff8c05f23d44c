//! API layer for the players domain
//!
//! Contains the postback handler, routes, and domain state definition.

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use middleware::PlayersState;
pub use routes::routes;
