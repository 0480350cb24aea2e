//! Outbound e-mail message

use std::{collections::HashMap, path::PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::errors::{SerializationError, ValidationError, Violation};

/// The provider accepts at most this many campaigns per message.
pub(super) const MAX_CAMPAIGNS: usize = 3;

/// An outbound e-mail message.
///
/// Fields are accumulated through the mutators below and validated only
/// when the message is sent. A message stays mutable after a send and may
/// be sent again.
#[derive(Debug, Clone, Default)]
pub struct Message {
    pub(super) from: String,
    pub(super) to: Vec<String>,
    pub(super) cc: Vec<String>,
    pub(super) bcc: Vec<String>,
    pub(super) subject: String,
    pub(super) text: String,
    pub(super) html: Option<String>,
    pub(super) tags: Vec<String>,
    pub(super) campaigns: Vec<String>,
    pub(super) dkim: Option<bool>,
    pub(super) delivery_time: Option<DateTime<Utc>>,
    pub(super) test_mode: bool,
    pub(super) tracking: Option<bool>,
    pub(super) tracking_clicks: Option<bool>,
    pub(super) tracking_opens: Option<bool>,
    pub(super) headers: HashMap<String, String>,
    pub(super) variables: HashMap<String, String>,
    pub(super) attachments: Vec<PathBuf>,
    pub(super) inlines: Vec<PathBuf>,
}

impl Message {
    /// Returns a new message with the simplest envelope needed to send.
    ///
    /// No validation happens here; an incomplete message is only rejected
    /// when it is sent.
    pub fn new(from: &str, subject: &str, text: &str, to: &[&str]) -> Self {
        Self {
            from: from.to_string(),
            subject: subject.to_string(),
            text: text.to_string(),
            to: to.iter().map(|recipient| recipient.to_string()).collect(),
            ..Self::default()
        }
    }

    /// Adds a recipient address.
    pub fn add_recipient(&mut self, recipient: &str) {
        self.to.push(recipient.to_string());
    }

    /// Adds a carbon-copy recipient address.
    pub fn add_cc(&mut self, recipient: &str) {
        self.cc.push(recipient.to_string());
    }

    /// Adds a blind-carbon-copy recipient address.
    pub fn add_bcc(&mut self, recipient: &str) {
        self.bcc.push(recipient.to_string());
    }

    /// Sets the HTML alternative to the plain-text body.
    pub fn set_html(&mut self, html: &str) {
        self.html = Some(html.to_string());
    }

    /// Attaches a tag to the message.
    ///
    /// Tags are useful for metrics gathering and event tracking; refer to
    /// the provider documentation for details.
    pub fn add_tag(&mut self, tag: &str) {
        self.tags.push(tag.to_string());
    }

    /// Associates the message with a campaign.
    pub fn add_campaign(&mut self, campaign: &str) {
        self.campaigns.push(campaign.to_string());
    }

    /// Sets the DKIM-signing option.
    ///
    /// Calling this always puts the option on the wire; an unset option is
    /// omitted entirely, which the provider treats differently from an
    /// explicit "no".
    pub fn set_dkim(&mut self, dkim: bool) {
        self.dkim = Some(dkim);
    }

    /// Puts the message in test mode: the provider accepts and then
    /// discards it.
    pub fn enable_test_mode(&mut self) {
        self.test_mode = true;
    }

    /// Schedules the message for transmission at the given time,
    /// replacing any previous schedule.
    pub fn set_delivery_time(&mut self, delivery_time: DateTime<Utc>) {
        self.delivery_time = Some(delivery_time);
    }

    /// Sets whether the provider rewrites URLs to facilitate event
    /// tracking for this message.
    ///
    /// Like [`set_dkim`](Self::set_dkim), calling this always puts the
    /// option on the wire, whatever its value.
    pub fn set_tracking(&mut self, tracking: bool) {
        self.tracking = Some(tracking);
    }

    /// Sets click tracking for this message.
    pub fn set_tracking_clicks(&mut self, tracking_clicks: bool) {
        self.tracking_clicks = Some(tracking_clicks);
    }

    /// Sets open tracking for this message.
    pub fn set_tracking_opens(&mut self, tracking_opens: bool) {
        self.tracking_opens = Some(tracking_opens);
    }

    /// Adds a custom SMTP header.
    pub fn add_header(&mut self, name: &str, value: &str) {
        self.headers.insert(name.to_string(), value.to_string());
    }

    /// Adds a custom variable, encoding `value` as JSON text immediately.
    ///
    /// The wire format only carries strings, so the value is stored as its
    /// JSON representation; reading it back yields that text, not the
    /// original type.
    ///
    /// # Returns
    /// A [`SerializationError`] if the value cannot be represented as JSON.
    pub fn add_variable<T>(&mut self, name: &str, value: &T) -> Result<(), SerializationError>
    where
        T: Serialize + ?Sized,
    {
        let json = serde_json::to_string(value)?;
        self.variables.insert(name.to_string(), json);

        Ok(())
    }

    /// Attaches a file to the message.
    ///
    /// The file is read when the message is transmitted; it must stay
    /// available and unmodified until the send completes.
    pub fn add_attachment(&mut self, path: impl Into<PathBuf>) {
        self.attachments.push(path.into());
    }

    /// Attaches an inline file to the message.
    pub fn add_inline(&mut self, path: impl Into<PathBuf>) {
        self.inlines.push(path.into());
    }

    /// Checks that the accumulated state is sufficient to send.
    ///
    /// Pure over the message state; every violated rule is collected into
    /// the returned [`ValidationError`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut violations = Vec::new();

        if self.from.is_empty() {
            violations.push(Violation::EmptySender);
        }

        if self.to.is_empty() {
            violations.push(Violation::NoRecipients);
        }

        if self.to.iter().any(|recipient| recipient.is_empty()) {
            violations.push(Violation::EmptyRecipient);
        }

        if self.cc.iter().any(|recipient| recipient.is_empty()) {
            violations.push(Violation::EmptyCc);
        }

        if self.bcc.iter().any(|recipient| recipient.is_empty()) {
            violations.push(Violation::EmptyBcc);
        }

        if self.tags.iter().any(|tag| tag.is_empty()) {
            violations.push(Violation::EmptyTag);
        }

        if self.campaigns.iter().any(|campaign| campaign.is_empty()) {
            violations.push(Violation::EmptyCampaign);
        }

        if self.campaigns.len() > MAX_CAMPAIGNS {
            violations.push(Violation::TooManyCampaigns);
        }

        if self.text.is_empty() {
            violations.push(Violation::EmptyText);
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { violations })
        }
    }
}
