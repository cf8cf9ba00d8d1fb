// SPDX-FileCopyrightText: 2026 Photel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parsing of the stored channel identifier into a Bot API recipient.

use photel_core::PhotelError;
use teloxide::types::{ChatId, Recipient};

/// Accepts a numeric chat id (`-1001234567890`) or a public `@username`.
pub fn parse_recipient(channel_id: &str) -> Result<Recipient, PhotelError> {
    let channel_id = channel_id.trim();

    if let Ok(id) = channel_id.parse::<i64>() {
        return Ok(Recipient::Id(ChatId(id)));
    }

    match channel_id.strip_prefix('@') {
        Some(name) if is_valid_username(name) => {
            Ok(Recipient::ChannelUsername(channel_id.to_string()))
        }
        _ => Err(PhotelError::Config(format!(
            "channel id must be a numeric chat id or an @username, got {channel_id:?}"
        ))),
    }
}

fn is_valid_username(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
