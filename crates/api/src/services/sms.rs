//! OTP delivery over the SMS gateway.
//!
//! Delivery is fire-and-forget: a gateway failure is logged and never fails
//! the request that triggered it. Without a configured key the code is
//! logged instead, which is how local development reads OTPs.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;

use filigree_core::{OtpCode, Phone};

const GATEWAY_URL: &str = "https://www.fast2sms.com/dev/bulkV2";

/// Client for the transactional SMS gateway.
pub struct SmsClient {
    http: reqwest::Client,
    api_key: Option<SecretString>,
}

impl SmsClient {
    /// Create a client; `api_key` of `None` switches to log-only delivery.
    #[must_use]
    pub fn new(api_key: Option<SecretString>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
        }
    }

    /// Deliver an OTP to a phone number.
    ///
    /// Never fails the caller: gateway errors are logged and swallowed.
    pub async fn send_otp(&self, phone: &Phone, code: &OtpCode) {
        let Some(key) = &self.api_key else {
            tracing::info!(phone = %phone, code = %code, "SMS gateway not configured, OTP logged");
            return;
        };

        let body = json!({
            "variables_values": code.as_str(),
            "route": "otp",
            "numbers": phone.as_str(),
        });

        let result = self
            .http
            .post(GATEWAY_URL)
            .header("authorization", key.expose_secret())
            .json(&body)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status);

        match result {
            Ok(_) => tracing::debug!(phone = %phone, "OTP dispatched"),
            Err(err) => tracing::warn!(phone = %phone, error = %err, "Failed to send OTP"),
        }
    }
}
