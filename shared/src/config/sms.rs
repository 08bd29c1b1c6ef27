//! SMS provider configuration

use serde::{Deserialize, Serialize};

/// Credentials and endpoint settings for the msg.ge SMS API
///
/// All four credential fields come from the operator's provider account; the
/// gateway refuses to send while any of them is empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmsConfig {
    /// Provider endpoint URL
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// API account username
    #[serde(default)]
    pub username: String,

    /// API account password
    #[serde(default)]
    pub password: String,

    /// Provider-assigned client identifier
    #[serde(default)]
    pub client_id: String,

    /// Provider-assigned service identifier
    #[serde(default)]
    pub service_id: String,

    /// Timeout for the outbound API request, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            username: String::new(),
            password: String::new(),
            client_id: String::new(),
            service_id: String::new(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl SmsConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            api_url: std::env::var("SMS_API_URL").unwrap_or_else(|_| default_api_url()),
            username: std::env::var("SMS_API_USERNAME").unwrap_or_default(),
            password: std::env::var("SMS_API_PASSWORD").unwrap_or_default(),
            client_id: std::env::var("SMS_CLIENT_ID").unwrap_or_default(),
            service_id: std::env::var("SMS_SERVICE_ID").unwrap_or_default(),
            request_timeout_secs: std::env::var("SMS_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_request_timeout_secs),
        }
    }

    /// Whether every credential field is present
    pub fn is_configured(&self) -> bool {
        !self.username.is_empty()
            && !self.password.is_empty()
            && !self.client_id.is_empty()
            && !self.service_id.is_empty()
    }
}

fn default_api_url() -> String {
    "http://bi.msg.ge/sendsms.php".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}
