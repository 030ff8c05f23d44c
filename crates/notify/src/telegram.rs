//! Telegram Bot API Notification Service
//!
//! Delivers messages through the Bot API `sendMessage` method at
//! `{base_url}/bot{token}/sendMessage`. Each channel owns its own bot token.

use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{MessageReceipt, NotificationService, NotifyError};

/// Build the HTTP client shared by every bot, with a per-request time bound.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, NotifyError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| NotifyError::Configuration(format!("Failed to build HTTP client: {}", e)))
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct BotApiResponse {
    ok: bool,
    result: Option<SentMessage>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SentMessage {
    message_id: i64,
}

/// Telegram bot bound to a single token
pub struct TelegramNotifier {
    http: reqwest::Client,
    send_url: String,
}

impl TelegramNotifier {
    /// Create a notifier for one bot token.
    pub fn new(http: reqwest::Client, base_url: &str, token: &str) -> Self {
        let send_url = format!(
            "{}/bot{}/sendMessage",
            base_url.trim_end_matches('/'),
            token
        );
        Self { http, send_url }
    }
}

#[async_trait::async_trait]
impl NotificationService for TelegramNotifier {
    async fn send(&self, destination: &str, text: &str) -> Result<MessageReceipt, NotifyError> {
        let response = self
            .http
            .post(&self.send_url)
            .json(&SendMessageRequest {
                chat_id: destination,
                text,
            })
            .send()
            .await
            // The URL carries the bot token and must not reach the logs.
            .map_err(|e| NotifyError::Request(e.without_url().to_string()))?;

        let status = response.status();
        let body: BotApiResponse = response.json().await.map_err(|e| {
            NotifyError::Response(format!(
                "Bot API returned {} with unreadable body: {}",
                status,
                e.without_url()
            ))
        })?;

        if !status.is_success() || !body.ok {
            return Err(NotifyError::Response(format!(
                "Bot API returned {}: {}",
                status,
                body.description
                    .unwrap_or_else(|| "no description".to_string())
            )));
        }

        let message_id = body
            .result
            .map(|message| message.message_id.to_string())
            .ok_or_else(|| NotifyError::Response("Bot API response missing result".to_string()))?;

        tracing::debug!(message_id = %message_id, "Telegram message delivered");

        Ok(MessageReceipt {
            message_id,
            sent_at: Utc::now(),
            provider: "telegram".to_string(),
        })
    }

    fn provider_name(&self) -> &'static str {
        "telegram"
    }
}
