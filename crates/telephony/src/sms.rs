//! Outbound SMS services
//!
//! The booking flow sends one confirmation SMS per completed call. The
//! Twilio implementation reads its three credentials from the environment
//! at construction; a deployment without credentials gets no service
//! instance and the tools fail closed with a failure string.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Deserialize;

use crate::TelephonyError;

/// Result of a successful (or simulated) send.
#[derive(Debug, Clone)]
pub struct SmsReceipt {
    /// Provider message id
    pub sid: String,
    /// Destination number, normalized form
    pub to: String,
    /// Whether the send was simulated rather than delivered
    pub simulated: bool,
}

/// Outbound SMS service.
#[async_trait]
pub trait SmsService: Send + Sync {
    async fn send_sms(&self, to: &str, body: &str) -> Result<SmsReceipt, TelephonyError>;
}

/// Environment variable names for the Twilio credentials.
pub const ENV_ACCOUNT_SID: &str = "TWILIO_ACCOUNT_SID";
pub const ENV_AUTH_TOKEN: &str = "TWILIO_AUTH_TOKEN";
pub const ENV_PHONE_NUMBER: &str = "TWILIO_PHONE_NUMBER";

/// Twilio-backed SMS service.
pub struct TwilioSmsService {
    account_sid: String,
    auth_token: String,
    from_number: String,
    api_base: String,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct TwilioMessageResponse {
    sid: String,
}

impl TwilioSmsService {
    pub fn new(
        account_sid: impl Into<String>,
        auth_token: impl Into<String>,
        from_number: impl Into<String>,
    ) -> Self {
        Self {
            account_sid: account_sid.into(),
            auth_token: auth_token.into(),
            from_number: from_number.into(),
            api_base: "https://api.twilio.com".to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Build from environment credentials. Errors name the first missing
    /// variable so the failure is actionable in logs.
    pub fn from_env() -> Result<Self, TelephonyError> {
        let account_sid = std::env::var(ENV_ACCOUNT_SID)
            .map_err(|_| TelephonyError::MissingCredentials(ENV_ACCOUNT_SID))?;
        let auth_token = std::env::var(ENV_AUTH_TOKEN)
            .map_err(|_| TelephonyError::MissingCredentials(ENV_AUTH_TOKEN))?;
        let from_number = std::env::var(ENV_PHONE_NUMBER)
            .map_err(|_| TelephonyError::MissingCredentials(ENV_PHONE_NUMBER))?;
        Ok(Self::new(account_sid, auth_token, from_number))
    }

    /// Override the API base URL (tests).
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }
}

#[async_trait]
impl SmsService for TwilioSmsService {
    async fn send_sms(&self, to: &str, body: &str) -> Result<SmsReceipt, TelephonyError> {
        if to.trim().is_empty() {
            return Err(TelephonyError::MissingDestination);
        }

        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.api_base, self.account_sid
        );
        let params = [("To", to), ("From", self.from_number.as_str()), ("Body", body)];

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "sms provider rejected send");
            return Err(TelephonyError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let message: TwilioMessageResponse = response.json().await?;
        tracing::info!(sid = %message.sid, to = %to, "confirmation sms sent");

        Ok(SmsReceipt {
            sid: message.sid,
            to: to.to_string(),
            simulated: false,
        })
    }
}

/// In-memory SMS service for tests and credential-less environments.
/// Records every send so tests can assert exactly-once behavior.
#[derive(Default)]
pub struct SimulatedSmsService {
    sent: Mutex<Vec<(String, String)>>,
}

impl SimulatedSmsService {
    pub fn new() -> Self {
        Self::default()
    }

    /// (to, body) pairs in send order.
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().len()
    }
}

#[async_trait]
impl SmsService for SimulatedSmsService {
    async fn send_sms(&self, to: &str, body: &str) -> Result<SmsReceipt, TelephonyError> {
        if to.trim().is_empty() {
            return Err(TelephonyError::MissingDestination);
        }

        self.sent.lock().push((to.to_string(), body.to_string()));
        let sid = format!("SM{}", &uuid::Uuid::new_v4().simple().to_string()[..8]);
        tracing::info!(sid = %sid, to = %to, "simulated sms send");

        Ok(SmsReceipt {
            sid,
            to: to.to_string(),
            simulated: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_simulated_send_records_message() {
        let service = SimulatedSmsService::new();
        let receipt = service
            .send_sms("+15145859691", "Appointment confirmed")
            .await
            .unwrap();

        assert!(receipt.simulated);
        assert!(receipt.sid.starts_with("SM"));
        assert_eq!(service.sent_count(), 1);
        assert_eq!(service.sent()[0].0, "+15145859691");
    }

    #[tokio::test]
    async fn test_simulated_send_requires_destination() {
        let service = SimulatedSmsService::new();
        let err = service.send_sms("", "hello").await.unwrap_err();
        assert!(matches!(err, TelephonyError::MissingDestination));
        assert_eq!(service.sent_count(), 0);
    }
}
