//! Affiliate postback events

use std::str::FromStr;

use postback_common::RepositoryError;
use postback_notify::Channel;
use rust_decimal::Decimal;
use serde_json::Value;

/// Recognized postback event types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    Registration,
    FirstDeposit,
    Deposit,
}

impl EventType {
    /// Event types are matched exactly; anything else is not recognized.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "registration" => Some(EventType::Registration),
            "first_deposit" => Some(EventType::FirstDeposit),
            "deposit" => Some(EventType::Deposit),
            _ => None,
        }
    }

    /// Notification channel dedicated to this event category
    pub fn channel(&self) -> Channel {
        match self {
            EventType::Registration => Channel::Registration,
            EventType::FirstDeposit => Channel::FirstDeposit,
            EventType::Deposit => Channel::Deposit,
        }
    }
}

/// A postback whose required fields are present
#[derive(Debug, Clone, PartialEq)]
pub struct Postback {
    pub game_id: String,
    pub event_type: String,
    pub deposit_amount: Option<Value>,
    pub referred_by: Option<String>,
}

impl Postback {
    pub fn event(&self) -> Option<EventType> {
        EventType::parse(&self.event_type)
    }

    /// Deposit amount as a decimal, for persisting.
    ///
    /// JSON numbers and numeric strings cast; `null` or absence yields
    /// `None`. Anything else cannot be stored in the amount column.
    pub fn deposit_amount(&self) -> Result<Option<Decimal>, RepositoryError> {
        let parsed = match &self.deposit_amount {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::Number(number)) => parse_decimal(&number.to_string()),
            Some(Value::String(text)) => parse_decimal(text.trim()),
            Some(_) => None,
        };

        parsed.map(Some).ok_or_else(|| RepositoryError::InvalidValue {
            field: "deposit_amount",
            value: self
                .deposit_amount
                .as_ref()
                .map(Value::to_string)
                .unwrap_or_default(),
        })
    }

    /// Deposit amount as shown to operators, without numeric validation.
    pub fn deposit_amount_text(&self) -> Option<String> {
        match &self.deposit_amount {
            None | Some(Value::Null) => None,
            Some(Value::String(text)) => Some(text.clone()),
            Some(other) => Some(other.to_string()),
        }
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}
