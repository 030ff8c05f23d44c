//! Affiliate postback handler
//!
//! Implements `POST /webhook`: validates the payload, dispatches on
//! `eventType`, applies the store mutation, then attempts the channel's
//! notification. Notification failures never change the response.

use axum::{extract::State, http::StatusCode};
use postback_common::{Error, Result, ValidatedJson};
use postback_notify::{content, Channel};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use validator::Validate;

use crate::api::middleware::PlayersState;
use crate::domain::entities::NewUserRecord;
use crate::domain::postback::{EventType, Postback};

/// Postback body as sent by the affiliate platform
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PostbackPayload {
    #[serde(default, deserialize_with = "lenient_string")]
    #[validate(required)]
    pub game_id: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    #[validate(required)]
    pub event_type: Option<String>,

    #[serde(default)]
    pub deposit_amount: Option<Value>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub referred_by: Option<String>,
}

impl PostbackPayload {
    /// `None` only when validation was skipped.
    fn into_postback(self) -> Option<Postback> {
        Some(Postback {
            game_id: self.game_id?,
            event_type: self.event_type?,
            deposit_amount: self.deposit_amount,
            referred_by: self.referred_by,
        })
    }
}

/// Platforms differ on whether ids are JSON strings or numbers; take both.
///
/// Falsy values (`null`, `""`, `0`, `false`) read as absent. `true` and
/// structured values are rejected.
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Ok(None),
        Some(Value::String(text)) if text.is_empty() => Ok(None),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(Value::Number(number)) if number.as_f64() == Some(0.0) => Ok(None),
        Some(Value::Number(number)) => Ok(Some(number.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a string or number, got {}",
            other
        ))),
    }
}

/// Handle an affiliate postback (public, no auth)
pub async fn receive_postback(
    State(state): State<PlayersState>,
    ValidatedJson(payload): ValidatedJson<PostbackPayload>,
) -> Result<StatusCode> {
    tracing::info!(payload = ?payload, "Incoming webhook");

    let postback = payload
        .into_postback()
        .ok_or_else(|| Error::Validation("gameId and eventType are required".to_string()))?;

    let Some(event) = postback.event() else {
        tracing::info!(
            game_id = %postback.game_id,
            event_type = %postback.event_type,
            "Ignoring unrecognized event type"
        );
        return Ok(StatusCode::OK);
    };

    match event {
        EventType::Registration => register(&state, &postback).await?,
        EventType::FirstDeposit => record_first_deposit(&state, &postback).await?,
        EventType::Deposit => {
            let text = content::deposit_text(
                &postback.game_id,
                postback.deposit_amount_text().as_deref(),
            );
            deliver(&state, event.channel(), &postback.game_id, &text).await;
        }
    }

    Ok(StatusCode::OK)
}

async fn register(state: &PlayersState, postback: &Postback) -> Result<()> {
    let record = NewUserRecord::new(postback.game_id.as_str(), postback.referred_by.as_deref());

    let Some(created) = state.store.insert_if_absent(record).await? else {
        tracing::info!(game_id = %postback.game_id, "User already registered");
        return Ok(());
    };

    tracing::info!(
        game_id = %created.game_id,
        referred_by = %created.referred_by,
        "New user saved"
    );

    let text = content::registration_text(&created.game_id, &created.referred_by);
    deliver(state, Channel::Registration, &created.game_id, &text).await;
    Ok(())
}

async fn record_first_deposit(state: &PlayersState, postback: &Postback) -> Result<()> {
    match postback.deposit_amount()? {
        Some(amount) => {
            let updated = state
                .store
                .set_deposit_amount(&postback.game_id, amount)
                .await?;
            if updated.is_none() {
                tracing::warn!(
                    game_id = %postback.game_id,
                    "First deposit for unknown user, nothing stored"
                );
            }
        }
        None => {
            tracing::warn!(
                game_id = %postback.game_id,
                "First deposit without depositAmount, nothing stored"
            );
        }
    }

    let text = content::first_deposit_text(
        &postback.game_id,
        postback.deposit_amount_text().as_deref(),
    );
    deliver(state, Channel::FirstDeposit, &postback.game_id, &text).await;
    Ok(())
}

/// Best-effort, time-bounded send. Failures are logged and swallowed.
async fn deliver(state: &PlayersState, channel: Channel, game_id: &str, text: &str) {
    let notifiers = &state.notifiers;
    let service = notifiers.channel(channel);

    let outcome = tokio::time::timeout(
        notifiers.send_timeout,
        service.send(&notifiers.destination, text),
    )
    .await;

    match outcome {
        Ok(Ok(receipt)) => tracing::info!(
            %channel,
            %game_id,
            provider = service.provider_name(),
            message_id = %receipt.message_id,
            "Notification sent"
        ),
        Ok(Err(e)) => tracing::error!(
            %channel,
            %game_id,
            provider = service.provider_name(),
            error = %e,
            "Notification failed"
        ),
        Err(_) => tracing::error!(
            %channel,
            %game_id,
            provider = service.provider_name(),
            timeout_ms = notifiers.send_timeout.as_millis() as u64,
            "Notification timed out"
        ),
    }
}
