// Minimal Twilio Programmable Messaging client used for one-time passcode delivery.

use std::collections::HashMap;

pub mod models;
use reqwest::Client;
use thiserror::Error;

use crate::models::{ErrorResponse, MessageResponse};

const DEFAULT_BASE_URL: &str = "https://api.twilio.com";

#[derive(Debug, Error)]
pub enum TwilioError {
    #[error("request to Twilio failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Twilio returned {status}: {message}")]
    Api { status: u16, message: String },
}

#[derive(Clone)]
pub struct TwilioOptions {
    pub account_sid: String,
    pub auth_token: String,
    /// Sender number in E.164 form, or a messaging service SID
    pub from_number: String,
}

impl std::fmt::Debug for TwilioOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwilioOptions")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"[redacted]")
            .field("from_number", &self.from_number)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct TwilioService {
    options: TwilioOptions,
    base_url: String,
    client: Client,
}

impl TwilioService {
    pub fn new(options: TwilioOptions) -> Self {
        Self::with_base_url(options, DEFAULT_BASE_URL)
    }

    /// Point the client at a different API host (used against local fakes).
    pub fn with_base_url(options: TwilioOptions, base_url: impl Into<String>) -> Self {
        Self {
            options,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    pub fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url, self.options.account_sid
        )
    }

    /// Send a plain SMS to `recipient`.
    pub async fn send_sms(&self, recipient: &str, body: &str) -> Result<MessageResponse, TwilioError> {
        let mut form_body: HashMap<&str, &str> = HashMap::new();
        form_body.insert("To", recipient);
        form_body.insert("From", &self.options.from_number);
        form_body.insert("Body", body);

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.options.account_sid, Some(&self.options.auth_token))
            .form(&form_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorResponse>().await {
                Ok(err) => match err.code {
                    Some(code) => format!("{} (code {})", err.message, code),
                    None => err.message,
                },
                Err(_) => "unreadable error body".to_string(),
            };
            return Err(TwilioError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<MessageResponse>().await?)
    }

    /// Deliver a one-time passcode.
    pub async fn send_otp(&self, recipient: &str, code: &str) -> Result<MessageResponse, TwilioError> {
        let body = format!("Your verification code is {}", code);
        self.send_sms(recipient, &body).await
    }
}
