//! Port for outbound order-confirmation messaging.

use async_trait::async_trait;

/// A confirmation message addressed to a normalised E.164 phone number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationMessage {
    /// Destination phone number in E.164 form.
    pub to: String,
    /// Message body.
    pub body: String,
}

/// Provider receipt for an accepted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReceipt {
    /// Provider-assigned message identifier.
    pub sid: String,
}

/// Errors raised by confirmation sender adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfirmationSendError {
    /// No provider credentials are configured; callers fall back to a
    /// client-side message.
    #[error("confirmation sender is not configured")]
    Unconfigured,
    /// The request never reached the provider.
    #[error("confirmation transport failed: {message}")]
    Transport { message: String },
    /// The provider rejected the message.
    #[error("confirmation rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },
}

/// Port for sending order confirmations over an external messaging channel.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConfirmationSender: Send + Sync {
    /// Deliver the message, returning the provider receipt.
    async fn send(
        &self,
        message: &ConfirmationMessage,
    ) -> Result<SendReceipt, ConfirmationSendError>;
}

/// Sender used when no provider credentials are present; always reports
/// [`ConfirmationSendError::Unconfigured`] so callers take the fallback path.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredConfirmationSender;

#[async_trait]
impl ConfirmationSender for UnconfiguredConfirmationSender {
    async fn send(
        &self,
        _message: &ConfirmationMessage,
    ) -> Result<SendReceipt, ConfirmationSendError> {
        Err(ConfirmationSendError::Unconfigured)
    }
}
