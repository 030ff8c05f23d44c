//! Mock Notification Service Implementation
//!
//! Captures messages in memory for test assertions and can be switched to
//! fail or hang so callers' best-effort handling can be exercised.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;

use crate::{MessageReceipt, NotificationService, NotifyError};

/// Message captured by the mock service
#[derive(Debug, Clone)]
pub struct CapturedMessage {
    pub destination: String,
    pub text: String,
}

/// How the mock answers a send
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockBehavior {
    Deliver,
    Fail,
    /// Sleep far longer than any reasonable send bound before delivering
    Hang,
}

/// Mock notification service for testing
#[derive(Debug, Clone)]
pub struct MockNotificationService {
    messages: Arc<Mutex<Vec<CapturedMessage>>>,
    attempts: Arc<Mutex<usize>>,
    behavior: Arc<Mutex<MockBehavior>>,
}

impl MockNotificationService {
    /// Create a new mock service that delivers every message
    pub fn new() -> Self {
        Self::with_behavior(MockBehavior::Deliver)
    }

    /// Create a mock service that fails every send
    pub fn failing() -> Self {
        Self::with_behavior(MockBehavior::Fail)
    }

    pub fn with_behavior(behavior: MockBehavior) -> Self {
        Self {
            messages: Arc::new(Mutex::new(Vec::new())),
            attempts: Arc::new(Mutex::new(0)),
            behavior: Arc::new(Mutex::new(behavior)),
        }
    }

    /// Change how subsequent sends are answered
    pub fn set_behavior(&self, behavior: MockBehavior) {
        *self.behavior.lock().unwrap() = behavior;
    }

    /// Get all delivered messages
    pub fn sent_messages(&self) -> Vec<CapturedMessage> {
        self.messages.lock().unwrap().clone()
    }

    /// Get count of delivered messages
    pub fn message_count(&self) -> usize {
        self.messages.lock().unwrap().len()
    }

    /// Get count of send attempts, including failed ones
    pub fn attempt_count(&self) -> usize {
        *self.attempts.lock().unwrap()
    }

    /// Clear captured messages and attempt counter
    pub fn clear(&self) {
        self.messages.lock().unwrap().clear();
        *self.attempts.lock().unwrap() = 0;
    }
}

impl Default for MockNotificationService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl NotificationService for MockNotificationService {
    async fn send(&self, destination: &str, text: &str) -> Result<MessageReceipt, NotifyError> {
        let behavior = {
            let mut attempts = self
                .attempts
                .lock()
                .map_err(|e| NotifyError::Request(format!("attempts lock poisoned: {e}")))?;
            *attempts += 1;
            *self
                .behavior
                .lock()
                .map_err(|e| NotifyError::Request(format!("behavior lock poisoned: {e}")))?
        };

        match behavior {
            MockBehavior::Deliver => {}
            MockBehavior::Fail => {
                tracing::warn!("Mock notification service failing send to: {}", destination);
                return Err(NotifyError::Request("simulated delivery failure".to_string()));
            }
            MockBehavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
        }

        tracing::info!("Mock notification service capturing message to: {}", destination);

        let mut messages = self
            .messages
            .lock()
            .map_err(|e| NotifyError::Request(format!("messages lock poisoned: {e}")))?;

        let receipt = MessageReceipt {
            message_id: format!("mock-{}", messages.len() + 1),
            sent_at: Utc::now(),
            provider: "mock".to_string(),
        };

        messages.push(CapturedMessage {
            destination: destination.to_string(),
            text: text.to_string(),
        });

        Ok(receipt)
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}
