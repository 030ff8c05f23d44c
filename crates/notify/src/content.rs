//! Shared notification content templates
//!
//! Canonical message text for each postback category, used by the
//! dispatcher regardless of the delivery provider.

/// Rendered in place of a deposit amount the postback did not carry
pub const UNKNOWN_AMOUNT: &str = "unknown";

/// Message for a newly registered player.
pub fn registration_text(game_id: &str, referred_by: &str) -> String {
    format!(
        "🎉 New User Registered: {} (Referred by: {})",
        game_id, referred_by
    )
}

/// Message for a player's first deposit.
pub fn first_deposit_text(game_id: &str, amount: Option<&str>) -> String {
    format!(
        "💰 First Deposit: {} - ${}",
        game_id,
        amount.unwrap_or(UNKNOWN_AMOUNT)
    )
}

/// Message for any later deposit.
pub fn deposit_text(game_id: &str, amount: Option<&str>) -> String {
    format!(
        "💵 New Deposit: {} - ${}",
        game_id,
        amount.unwrap_or(UNKNOWN_AMOUNT)
    )
}
