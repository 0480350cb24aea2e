//! Error types for outbound messages

use std::{io, path::PathBuf};

use thiserror::Error;

/// A single rule violated by a [`Message`](super::Message) during validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Violation {
    /// The sender address is empty
    #[error("sender address is empty")]
    EmptySender,

    /// The message has no recipients
    #[error("no recipients")]
    NoRecipients,

    /// A recipient address is empty
    #[error("empty recipient address")]
    EmptyRecipient,

    /// A cc address is empty
    #[error("empty cc address")]
    EmptyCc,

    /// A bcc address is empty
    #[error("empty bcc address")]
    EmptyBcc,

    /// A tag is empty
    #[error("empty tag")]
    EmptyTag,

    /// A campaign id is empty
    #[error("empty campaign id")]
    EmptyCampaign,

    /// The message carries more campaigns than the provider accepts
    #[error("more than three campaigns")]
    TooManyCampaigns,

    /// The message body text is empty
    #[error("message text is empty")]
    EmptyText,
}

/// The message failed structural validation.
///
/// Display stays generic; the individual rules are carried as data for
/// callers that want them.
#[derive(Debug, Clone, Error)]
#[error("message is not valid")]
pub struct ValidationError {
    /// Every rule the message violated
    pub violations: Vec<Violation>,
}

/// A custom variable value could not be encoded as JSON.
#[derive(Debug, Error)]
#[error("variable value could not be serialized to JSON")]
pub struct SerializationError(#[from] serde_json::Error);

/// Errors that can occur while sending a message.
#[derive(Debug, Error)]
pub enum SendError {
    /// The message failed validation; nothing was transmitted
    #[error(transparent)]
    InvalidMessage(#[from] ValidationError),

    /// An attached file could not be read
    #[error("could not read attached file {}", .path.display())]
    Attachment {
        /// The file that could not be read
        path: PathBuf,
        /// The underlying I/O error
        source: io::Error,
    },

    /// The HTTP exchange with the provider failed
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// Unknown error
    #[error(transparent)]
    UnknownError(#[from] anyhow::Error),
}
