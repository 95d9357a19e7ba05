//! Twilio-backed WhatsApp confirmation sender.
//!
//! This adapter owns transport details only: form encoding, basic auth,
//! timeout, HTTP error mapping, and decoding the provider receipt.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::domain::ports::{
    ConfirmationMessage, ConfirmationSendError, ConfirmationSender, SendReceipt,
};

const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(15);
const TWILIO_API_BASE: &str = "https://api.twilio.com/2010-04-01";

/// Twilio credentials and the sending WhatsApp number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    /// Sending number in E.164 form, without the `whatsapp:` prefix.
    pub whatsapp_from: String,
}

/// Sender that posts messages to the Twilio Messages API.
pub struct TwilioWhatsAppSender {
    client: Client,
    base_url: String,
    config: TwilioConfig,
}

impl TwilioWhatsAppSender {
    /// Build a sender with the default endpoint and timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(config: TwilioConfig) -> Result<Self, reqwest::Error> {
        Self::with_base_url(config, TWILIO_API_BASE.to_owned())
    }

    /// Build a sender against an explicit API base URL; used by tests to
    /// point at a local stub server.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_base_url(config: TwilioConfig, base_url: String) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(DEFAULT_SEND_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/Accounts/{}/Messages.json",
            self.base_url, self.config.account_sid
        )
    }
}

/// Subset of the Twilio message resource we care about.
#[derive(Debug, Deserialize)]
struct MessageResource {
    sid: String,
}

fn map_transport_error(error: reqwest::Error) -> ConfirmationSendError {
    ConfirmationSendError::Transport {
        message: error.to_string(),
    }
}

#[async_trait]
impl ConfirmationSender for TwilioWhatsAppSender {
    async fn send(
        &self,
        message: &ConfirmationMessage,
    ) -> Result<SendReceipt, ConfirmationSendError> {
        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&[
                ("From", format!("whatsapp:{}", self.config.whatsapp_from)),
                ("To", format!("whatsapp:{}", message.to)),
                ("Body", message.body.clone()),
            ])
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(ConfirmationSendError::Rejected {
                status: status.as_u16(),
                message: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        let resource: MessageResource = serde_json::from_slice(&body).map_err(|error| {
            ConfirmationSendError::Transport {
                message: format!("invalid Twilio response payload: {error}"),
            }
        })?;
        Ok(SendReceipt { sid: resource.sid })
    }
}
