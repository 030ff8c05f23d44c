//! Players domain layer: entities and postback events

pub mod entities;
pub mod postback;
