//! Log-only SMS gateway for development environments

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::info;

use av_core::domain::value_objects::PhoneKey;
use av_core::errors::SmsError;
use av_core::services::otp::{SmsGateway, SmsReceipt};

/// Gateway that logs messages instead of sending them
///
/// Useful for local development without provider credentials; the last
/// message per phone is retained so a dev endpoint or test can read the
/// code back.
#[derive(Default)]
pub struct MockSmsGateway {
    messages: Mutex<HashMap<String, String>>,
    counter: Mutex<u64>,
}

impl MockSmsGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last message sent to `phone`, if any
    pub fn last_message(&self, phone: &PhoneKey) -> Option<String> {
        self.messages
            .lock()
            .ok()
            .and_then(|messages| messages.get(phone.as_str()).cloned())
    }
}

#[async_trait]
impl SmsGateway for MockSmsGateway {
    async fn send_sms(
        &self,
        destination: &PhoneKey,
        message: &str,
    ) -> Result<SmsReceipt, SmsError> {
        info!(
            phone = %destination.masked(),
            message,
            "Mock SMS gateway: message not actually sent"
        );

        if let Ok(mut messages) = self.messages.lock() {
            messages.insert(destination.as_str().to_owned(), message.to_owned());
        }

        let id = {
            let mut counter = self
                .counter
                .lock()
                .map_err(|_| SmsError::Transport("mock counter poisoned".to_string()))?;
            *counter += 1;
            *counter
        };

        Ok(SmsReceipt {
            message_id: format!("mock{}", id),
        })
    }
}
