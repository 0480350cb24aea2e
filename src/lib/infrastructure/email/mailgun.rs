//! Mailgun HTTP API client

use async_trait::async_trait;
use clap::Parser;
use reqwest::multipart::{Form, Part};
use tracing::debug;

use crate::domain::messages::{
    errors::SendError, FormPayload, Message, MessageSender, SendResponse,
};

/// Basic-auth user expected by the provider; the API key is the password.
const BASIC_AUTH_USER: &str = "api";

/// Path segment of the message-submission endpoint.
const MESSAGES_ENDPOINT: &str = "messages";

/// Mailgun configuration
#[derive(Clone, Default, Debug, Parser)]
pub struct MailgunConfig {
    /// The API base URL
    #[clap(
        long,
        env = "MAILGUN_API_BASE",
        default_value = "https://api.mailgun.net/v3"
    )]
    pub api_base: String,

    /// The sending domain
    #[clap(long, env = "MAILGUN_DOMAIN")]
    pub domain: String,

    /// The API key
    #[clap(long, env = "MAILGUN_API_KEY")]
    pub api_key: String,
}

/// Mailgun message-submission client
#[derive(Debug, Clone)]
pub struct MailgunClient {
    config: MailgunConfig,
    http: reqwest::Client,
}

impl MailgunClient {
    /// Create a new Mailgun client
    pub fn new(config: MailgunConfig) -> Self {
        Self {
            config: MailgunConfig {
                api_base: config.api_base.trim_end_matches('/').to_string(),
                ..config
            },
            http: reqwest::Client::new(),
        }
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/{}/{}",
            self.config.api_base, self.config.domain, MESSAGES_ENDPOINT
        )
    }

    /// Builds the multipart form for `payload`, reading attached files
    /// from disk.
    async fn form(&self, payload: FormPayload) -> Result<Form, SendError> {
        let mut form = Form::new();

        for (name, value) in payload.values() {
            form = form.text(name.clone(), value.clone());
        }

        for (name, path) in payload.files() {
            let contents =
                tokio::fs::read(path)
                    .await
                    .map_err(|source| SendError::Attachment {
                        path: path.clone(),
                        source,
                    })?;

            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();

            form = form.part(name.clone(), Part::bytes(contents).file_name(file_name));
        }

        Ok(form)
    }
}

#[async_trait]
impl MessageSender for MailgunClient {
    async fn send(&self, message: &Message) -> Result<SendResponse, SendError> {
        message.validate()?;

        let form = self.form(message.form_payload()).await?;
        let url = self.messages_url();

        debug!("submitting message to {}", url);

        let response = self
            .http
            .post(&url)
            .basic_auth(BASIC_AUTH_USER, Some(&self.config.api_key))
            .multipart(form)
            .send()
            .await?
            .error_for_status()?
            .json::<SendResponse>()
            .await?;

        Ok(response)
    }
}
