// SPDX-FileCopyrightText: 2026 Photel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram delivery channel for Photel.
//!
//! Implements [`DeliveryChannel`] for the Telegram Bot API via teloxide:
//! artifacts go out with `sendPhoto`, text with `sendMessage`, and
//! credentials are checked with `getMe`.

pub mod recipient;

use async_trait::async_trait;
use photel_config::model::TelegramConfig;
use photel_core::error::PhotelError;
use photel_core::traits::DeliveryChannel;
use photel_core::types::{Artifact, ChannelIdentity};
use secrecy::{ExposeSecret, SecretString};
use teloxide::prelude::*;
use teloxide::types::{InputFile, Recipient};
use tracing::{debug, info};

pub use recipient::parse_recipient;

/// Connection parameters for [`TelegramChannel`].
#[derive(Debug, Clone)]
pub struct TelegramSettings {
    pub token: SecretString,
    /// Numeric chat id or `@username`.
    pub channel_id: String,
    /// Alternative Bot API base URL, e.g. a self-hosted server.
    pub api_url: Option<String>,
}

impl TelegramSettings {
    pub fn new(
        token: impl Into<String>,
        channel_id: impl Into<String>,
        config: &TelegramConfig,
    ) -> Self {
        Self {
            token: SecretString::from(token.into()),
            channel_id: channel_id.into(),
            api_url: config.api_url.clone(),
        }
    }
}

/// Telegram channel implementing [`DeliveryChannel`].
pub struct TelegramChannel {
    bot: Bot,
    recipient: Recipient,
}

impl TelegramChannel {
    /// Creates a new channel. Does not contact the API.
    pub fn new(settings: &TelegramSettings) -> Result<Self, PhotelError> {
        let token = settings.token.expose_secret();
        if token.trim().is_empty() {
            return Err(PhotelError::Config("bot token cannot be empty".into()));
        }

        let recipient = parse_recipient(&settings.channel_id)?;

        let mut bot = Bot::new(token);
        if let Some(api_url) = &settings.api_url {
            let url = reqwest::Url::parse(api_url).map_err(|e| {
                PhotelError::Config(format!("telegram.api_url is not a valid URL: {e}"))
            })?;
            bot = bot.set_api_url(url);
        }

        Ok(Self { bot, recipient })
    }

    /// Returns a reference to the underlying teloxide Bot.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }
}

#[async_trait]
impl DeliveryChannel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn deliver(&self, artifact: &Artifact) -> Result<(), PhotelError> {
        let photo = InputFile::memory(artifact.bytes.clone()).file_name(artifact.file_name.clone());
        let mut request = self.bot.send_photo(self.recipient.clone(), photo);
        if let Some(caption) = &artifact.caption {
            request = request.caption(caption.clone());
        }

        request
            .await
            .map_err(|e| PhotelError::protocol(format!("sendPhoto failed: {e}"), e))?;

        debug!(
            file_name = %artifact.file_name,
            size = artifact.bytes.len(),
            "photo sent to Telegram"
        );
        Ok(())
    }

    async fn send_text(&self, text: &str) -> Result<(), PhotelError> {
        if text.trim().is_empty() {
            return Err(PhotelError::Config("message text cannot be empty".into()));
        }

        self.bot
            .send_message(self.recipient.clone(), text)
            .await
            .map_err(|e| PhotelError::protocol(format!("sendMessage failed: {e}"), e))?;

        debug!(len = text.len(), "text message sent to Telegram");
        Ok(())
    }

    async fn identify(&self) -> Result<ChannelIdentity, PhotelError> {
        let me = self
            .bot
            .get_me()
            .await
            .map_err(|e| PhotelError::protocol(format!("getMe failed: {e}"), e))?;

        info!(bot_id = me.user.id.0, "Telegram bot identified");
        Ok(ChannelIdentity {
            id: me.user.id.0.to_string(),
            username: me.user.username.clone(),
        })
    }
}
