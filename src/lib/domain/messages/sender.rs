//! Message submission seam

use async_trait::async_trait;
use serde::Deserialize;

#[cfg(test)]
use mockall::mock;

use super::{errors::SendError, message::Message};

/// The provider's reply to an accepted message submission.
#[derive(Debug, Clone, Deserialize)]
pub struct SendResponse {
    /// Human-readable status line
    pub message: String,

    /// Opaque identifier for the accepted message
    pub id: String,
}

/// Message submission service
#[async_trait]
pub trait MessageSender: Clone + Send + Sync + 'static {
    /// Validates `message` and queues it for delivery.
    ///
    /// # Arguments
    /// * `message` - The [`Message`] to queue for delivery.
    ///
    /// # Returns
    /// A [`Result`] carrying the provider's [`SendResponse`] on success.
    /// The message itself is left untouched and may be sent again.
    async fn send(&self, message: &Message) -> Result<SendResponse, SendError>;
}

#[cfg(test)]
mock! {
    pub MessageSender {}

    impl Clone for MessageSender {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl MessageSender for MessageSender {
        async fn send(&self, message: &Message) -> Result<SendResponse, SendError>;
    }
}
