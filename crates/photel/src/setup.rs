// SPDX-FileCopyrightText: 2026 Photel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `photel setup` command implementation.
//!
//! Collects the bot token, channel id and screenshot directory, verifies the
//! token against the Bot API, and stores everything under a password.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use photel_config::PhotelConfig;
use photel_core::{DeliveryChannel, PhotelError};
use photel_telegram::{TelegramChannel, TelegramSettings};
use photel_vault::{mask_secret, read_new_password, CredentialStore, Credentials};
use tracing::info;

/// Arguments for `photel setup`. Missing values are prompted for.
#[derive(clap::Args, Debug)]
pub struct SetupArgs {
    /// Bot API token.
    #[arg(long)]
    pub token: Option<String>,
    /// Destination chat: numeric id or @username.
    #[arg(long)]
    pub channel: Option<String>,
    /// Directory screenshots are saved to.
    #[arg(long, value_name = "DIR")]
    pub save_path: Option<PathBuf>,
    /// Store the values without calling getMe.
    #[arg(long)]
    pub skip_check: bool,
    /// Replace an existing configuration.
    #[arg(long)]
    pub force: bool,
}

/// Run the `photel setup` command.
pub async fn run_setup(config: &PhotelConfig, args: SetupArgs) -> Result<(), PhotelError> {
    let store = CredentialStore::from_config(&config.vault);
    if store.exists() && !args.force {
        return Err(PhotelError::Config(format!(
            "a configuration already exists at {}; pass --force to replace it",
            store.path().display()
        )));
    }

    let token = match args.token {
        Some(token) => token,
        None => rpassword::prompt_password("Bot token: ")
            .map_err(|e| PhotelError::Config(format!("failed to read bot token: {e}")))?,
    };
    let channel = match args.channel {
        Some(channel) => channel,
        None => prompt_line("Channel id (numeric or @username)")?,
    };
    let save_path = match args.save_path {
        Some(path) => path.to_string_lossy().into_owned(),
        None => prompt_line("Screenshot directory")?,
    };

    let credentials = Credentials::new(token.trim(), channel.trim(), save_path.trim());
    validate_setup(&credentials)?;

    if args.skip_check {
        info!("skipping bot verification");
    } else {
        let channel = TelegramChannel::new(&TelegramSettings::new(
            credentials.api_token.clone(),
            credentials.channel_id.clone(),
            &config.telegram,
        ))?;
        let identity = channel.identify().await?;
        println!(
            "Bot verified: @{} (token {})",
            identity.username.as_deref().unwrap_or("unknown"),
            mask_secret(&credentials.api_token)
        );
    }

    let path = store.path().to_path_buf();
    tokio::task::spawn_blocking(move || {
        let password = read_new_password()?;
        store.save(&credentials, &password)
    })
    .await
    .map_err(|e| PhotelError::Internal(format!("save task failed: {e}")))??;

    println!("Configuration saved to {}", path.display());
    Ok(())
}

/// Every field is required and the save path must be an existing directory.
pub fn validate_setup(credentials: &Credentials) -> Result<(), PhotelError> {
    credentials.validate()?;
    photel_telegram::parse_recipient(&credentials.channel_id)?;

    if !Path::new(&credentials.save_path).is_dir() {
        return Err(PhotelError::Config(format!(
            "save path {} is not an existing directory",
            credentials.save_path
        )));
    }
    Ok(())
}

fn prompt_line(label: &str) -> Result<String, PhotelError> {
    eprint!("{label}: ");
    std::io::stderr()
        .flush()
        .map_err(|e| PhotelError::Internal(format!("failed to flush prompt: {e}")))?;

    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| PhotelError::Config(format!("failed to read {label}: {e}")))?;
    Ok(line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn complete_setup_is_accepted() {
        let dir = tempdir().unwrap();
        let creds = Credentials::new("123:ABC", "@shots", dir.path().to_string_lossy());
        assert!(validate_setup(&creds).is_ok());
    }

    #[test]
    fn blank_fields_are_rejected() {
        let dir = tempdir().unwrap();
        let creds = Credentials::new("", "@shots", dir.path().to_string_lossy());
        let err = validate_setup(&creds).unwrap_err();
        assert!(err.to_string().contains("all fields are required"));
    }

    #[test]
    fn save_path_must_be_a_directory() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("file.txt");
        std::fs::write(&file, b"x").unwrap();

        for path in [file, dir.path().join("missing")] {
            let creds = Credentials::new("123:ABC", "@shots", path.to_string_lossy());
            assert!(matches!(
                validate_setup(&creds),
                Err(PhotelError::Config(_))
            ));
        }
    }

    #[test]
    fn malformed_channel_is_rejected() {
        let dir = tempdir().unwrap();
        let creds = Credentials::new("123:ABC", "my channel", dir.path().to_string_lossy());
        assert!(validate_setup(&creds).is_err());
    }
}
