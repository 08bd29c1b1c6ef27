//! msg.ge SMS gateway
//!
//! The provider speaks a plain HTTP GET protocol: credentials and message go
//! in the query string, the response is either a JSON object with `code` and
//! `message_id` fields or a bare `code-message_id` text line. Any `code`
//! starting with `0000` is success; the handful of known error codes map to
//! the closed error set, everything else is an unexpected response.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, warn};

use av_core::domain::value_objects::PhoneKey;
use av_core::errors::SmsError;
use av_core::services::otp::{SmsGateway, SmsReceipt};
use av_shared::config::{OtpConfig, SmsConfig};

const SUCCESS_CODE_PREFIX: &str = "0000";
const CODE_BAD_CREDENTIALS: &str = "0001";
const CODE_INVALID_DESTINATION: &str = "0007";
const CODE_INSUFFICIENT_BALANCE: &str = "0008";

#[derive(Debug, Deserialize)]
struct ProviderResponse {
    code: Option<String>,
    message_id: Option<serde_json::Value>,
}

/// HTTP client for the msg.ge SMS API
pub struct MsgGeGateway {
    http: Client,
    config: SmsConfig,
    country_prefix: String,
}

impl MsgGeGateway {
    pub fn new(config: SmsConfig, otp_config: &OtpConfig) -> Result<Self, SmsError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| SmsError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            config,
            country_prefix: otp_config.country_prefix.clone(),
        })
    }

    /// Map a raw provider response body to a receipt or failure
    fn parse_response(body: &str) -> Result<SmsReceipt, SmsError> {
        if let Ok(response) = serde_json::from_str::<ProviderResponse>(body) {
            if let Some(code) = response.code {
                let code = sanitize(&code);
                if code.starts_with(SUCCESS_CODE_PREFIX) {
                    let message_id = response
                        .message_id
                        .map(|id| sanitize(&value_to_string(&id)))
                        .unwrap_or_default();
                    return Ok(SmsReceipt { message_id });
                }
                return Err(match code.as_str() {
                    CODE_BAD_CREDENTIALS => SmsError::BadCredentials,
                    CODE_INVALID_DESTINATION => SmsError::InvalidDestination,
                    CODE_INSUFFICIENT_BALANCE => SmsError::InsufficientBalance,
                    _ => SmsError::UnexpectedResponse,
                });
            }
            return Err(SmsError::UnexpectedResponse);
        }

        // Legacy plain-text shape: a bare success code, optionally followed
        // by "-message_id". A lone "0000" is a valid acceptance.
        let trimmed = body.trim();
        if let Some(rest) = trimmed.strip_prefix(SUCCESS_CODE_PREFIX) {
            return Ok(SmsReceipt {
                message_id: sanitize(rest),
            });
        }
        Err(SmsError::UnexpectedResponse)
    }
}

fn value_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Keep only alphanumerics; provider ids pass through untrusted text
fn sanitize(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

#[async_trait]
impl SmsGateway for MsgGeGateway {
    async fn send_sms(
        &self,
        destination: &PhoneKey,
        message: &str,
    ) -> Result<SmsReceipt, SmsError> {
        if !self.is_configured() {
            return Err(SmsError::NotConfigured);
        }

        let to = destination.international(&self.country_prefix);
        let response = self
            .http
            .get(&self.config.api_url)
            .query(&[
                ("username", self.config.username.as_str()),
                ("password", self.config.password.as_str()),
                ("client_id", self.config.client_id.as_str()),
                ("service_id", self.config.service_id.as_str()),
                ("to", to.as_str()),
                ("text", message),
                ("result", "json"),
            ])
            .send()
            .await
            .map_err(|e| SmsError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SmsError::Transport(e.to_string()))?;

        if !status.is_success() {
            warn!(status = %status, "SMS provider returned HTTP error");
            return Err(SmsError::Transport(format!("HTTP {}", status)));
        }

        match Self::parse_response(&body) {
            Ok(receipt) => {
                info!(
                    phone = %destination.masked(),
                    message_id = %receipt.message_id,
                    "SMS accepted by provider"
                );
                Ok(receipt)
            }
            Err(e) => {
                warn!(phone = %destination.masked(), error = %e, "SMS provider rejected message");
                Err(e)
            }
        }
    }

    fn is_configured(&self) -> bool {
        self.config.is_configured()
    }
}
