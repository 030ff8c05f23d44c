//! Postback Relay Notification Service
//!
//! Delivers operator notifications over three independent channels, one per
//! postback category:
//! - Telegram Bot API integration for production delivery
//! - Mock notification service for testing and development
//! - Shared message templates

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;

pub mod content;
pub mod mock;
pub mod telegram;

/// Upper bound for a single send when `NOTIFY_TIMEOUT_SECS` is unset
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(10);

const DEFAULT_TELEGRAM_API_BASE_URL: &str = "https://api.telegram.org";

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Notification configuration error: {0}")]
    Configuration(String),

    #[error("Notification request error: {0}")]
    Request(String),

    #[error("Notification response error: {0}")]
    Response(String),
}

/// Logical notification channel, one per postback category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Registration,
    FirstDeposit,
    Deposit,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Registration => "registration",
            Channel::FirstDeposit => "first_deposit",
            Channel::Deposit => "deposit",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivery receipt
#[derive(Debug, Clone)]
pub struct MessageReceipt {
    pub message_id: String,
    pub sent_at: DateTime<Utc>,
    pub provider: String,
}

/// Notification service configuration
#[derive(Clone)]
pub struct NotifierConfig {
    /// Notification provider (telegram, mock)
    pub provider: String,
    /// Bot API base URL
    pub api_base_url: String,
    /// Bot credential for the registration channel
    pub registration_token: String,
    /// Bot credential for the first-deposit channel
    pub first_deposit_token: String,
    /// Bot credential for the deposit channel
    pub deposit_token: String,
    /// Chat that receives every notification
    pub destination: String,
    /// Upper bound for a single send
    pub send_timeout: Duration,
}

impl std::fmt::Debug for NotifierConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |token: &str| if token.is_empty() { "" } else { "[REDACTED]" };
        f.debug_struct("NotifierConfig")
            .field("provider", &self.provider)
            .field("api_base_url", &self.api_base_url)
            .field("registration_token", &redact(&self.registration_token))
            .field("first_deposit_token", &redact(&self.first_deposit_token))
            .field("deposit_token", &redact(&self.deposit_token))
            .field("destination", &self.destination)
            .field("send_timeout", &self.send_timeout)
            .finish()
    }
}

impl NotifierConfig {
    /// Create notifier config from environment variables
    pub fn from_env() -> Result<Self, NotifyError> {
        dotenvy::dotenv().ok();

        let provider = std::env::var("NOTIFY_PROVIDER").unwrap_or_else(|_| "telegram".to_string());

        let api_base_url = std::env::var("TELEGRAM_API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_TELEGRAM_API_BASE_URL.to_string());

        let registration_token = std::env::var("BOT1_TOKEN").unwrap_or_default();
        let first_deposit_token = std::env::var("BOT2_TOKEN").unwrap_or_default();
        let deposit_token = std::env::var("BOT3_TOKEN").unwrap_or_default();
        let destination = std::env::var("ADMIN_CHAT_ID").unwrap_or_default();

        let send_timeout = std::env::var("NOTIFY_TIMEOUT_SECS")
            .ok()
            .and_then(|secs| secs.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_SEND_TIMEOUT);

        let config = Self {
            provider,
            api_base_url,
            registration_token,
            first_deposit_token,
            deposit_token,
            destination,
            send_timeout,
        };

        if config.provider == "telegram" {
            config.require_telegram_settings()?;
        }

        Ok(config)
    }

    /// Mock configuration with every setting filled in
    pub fn mock() -> Self {
        Self {
            provider: "mock".to_string(),
            api_base_url: DEFAULT_TELEGRAM_API_BASE_URL.to_string(),
            registration_token: String::new(),
            first_deposit_token: String::new(),
            deposit_token: String::new(),
            destination: "mock-chat".to_string(),
            send_timeout: DEFAULT_SEND_TIMEOUT,
        }
    }

    fn require_telegram_settings(&self) -> Result<(), NotifyError> {
        let missing: Vec<&str> = [
            ("BOT1_TOKEN", &self.registration_token),
            ("BOT2_TOKEN", &self.first_deposit_token),
            ("BOT3_TOKEN", &self.deposit_token),
            ("ADMIN_CHAT_ID", &self.destination),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(NotifyError::Configuration(format!(
                "{} required for telegram provider",
                missing.join(", ")
            )))
        }
    }
}

/// Notification service trait for different implementations
#[async_trait::async_trait]
pub trait NotificationService: Send + Sync {
    /// Send a text message to a destination chat
    async fn send(&self, destination: &str, text: &str) -> Result<MessageReceipt, NotifyError>;

    /// Provider name used in log records
    fn provider_name(&self) -> &'static str;
}

/// The three notification channels plus their shared destination and send bound
#[derive(Clone)]
pub struct Notifiers {
    pub registration: Arc<dyn NotificationService>,
    pub first_deposit: Arc<dyn NotificationService>,
    pub deposit: Arc<dyn NotificationService>,
    pub destination: String,
    pub send_timeout: Duration,
}

impl Notifiers {
    /// Service backing a channel
    pub fn channel(&self, channel: Channel) -> &Arc<dyn NotificationService> {
        match channel {
            Channel::Registration => &self.registration,
            Channel::FirstDeposit => &self.first_deposit,
            Channel::Deposit => &self.deposit,
        }
    }
}

/// Notification service factory
pub struct NotificationServiceFactory;

impl NotificationServiceFactory {
    /// Create the three channel services based on configuration
    pub fn create(config: NotifierConfig) -> Result<Notifiers, NotifyError> {
        let (registration, first_deposit, deposit) = match config.provider.as_str() {
            "telegram" => {
                tracing::info!("Creating Telegram notification services");
                config.require_telegram_settings()?;

                let http = telegram::build_http_client(config.send_timeout)?;
                let bot = |token: &str| -> Arc<dyn NotificationService> {
                    Arc::new(telegram::TelegramNotifier::new(
                        http.clone(),
                        &config.api_base_url,
                        token,
                    ))
                };
                (
                    bot(&config.registration_token),
                    bot(&config.first_deposit_token),
                    bot(&config.deposit_token),
                )
            }
            "mock" => {
                tracing::info!("Creating mock notification services");
                let mock = || -> Arc<dyn NotificationService> {
                    Arc::new(mock::MockNotificationService::new())
                };
                (mock(), mock(), mock())
            }
            provider => {
                return Err(NotifyError::Configuration(format!(
                    "Unknown notification provider: {}. Supported providers: telegram, mock",
                    provider
                )))
            }
        };

        Ok(Notifiers {
            registration,
            first_deposit,
            deposit,
            destination: config.destination,
            send_timeout: config.send_timeout,
        })
    }
}
