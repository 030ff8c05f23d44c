//! Domain entities for the players domain

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Referrer recorded when a registration postback names none
pub const DEFAULT_REFERRER: &str = "Unknown";

/// Player record, keyed by the affiliate platform's player id
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct UserRecord {
    pub game_id: String,
    pub deposit_amount: Decimal,
    pub referred_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when a player record is first created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserRecord {
    pub game_id: String,
    pub referred_by: String,
}

impl NewUserRecord {
    /// An absent or empty referrer falls back to [`DEFAULT_REFERRER`].
    pub fn new(game_id: impl Into<String>, referred_by: Option<&str>) -> Self {
        let referred_by = referred_by
            .filter(|referrer| !referrer.is_empty())
            .unwrap_or(DEFAULT_REFERRER);

        Self {
            game_id: game_id.into(),
            referred_by: referred_by.to_string(),
        }
    }

    /// Materialize the record with a zero deposit
    pub fn into_record(self, now: DateTime<Utc>) -> UserRecord {
        UserRecord {
            game_id: self.game_id,
            deposit_amount: Decimal::ZERO,
            referred_by: self.referred_by,
            created_at: now,
            updated_at: now,
        }
    }
}
