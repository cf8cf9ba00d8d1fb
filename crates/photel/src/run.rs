// SPDX-FileCopyrightText: 2026 Photel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Commands that unlock the stored configuration and talk to the channel:
//! `check`, `send`, `message` and `watch`.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use photel_config::PhotelConfig;
use photel_core::{DeliveryChannel, DeliveryItem, DeliveryObserver, PhotelError};
use photel_delivery::{DeliverySettings, Uploader};
use photel_telegram::{TelegramChannel, TelegramSettings};
use photel_vault::{read_password, CredentialStore, Credentials};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::shutdown::install_signal_handler;

/// Load the credentials, asking for the password only when a record exists.
async fn unlock(config: &PhotelConfig) -> Result<Credentials, PhotelError> {
    let store = CredentialStore::from_config(&config.vault);
    if !store.exists() {
        return Err(PhotelError::NotFound {
            path: store.path().to_path_buf(),
        });
    }

    tokio::task::spawn_blocking(move || unlock_blocking(&store))
        .await
        .map_err(|e| PhotelError::Internal(format!("load task failed: {e}")))?
}

/// Prompts for the password and decrypts the record. Both steps block.
fn unlock_blocking(store: &CredentialStore) -> Result<Credentials, PhotelError> {
    let password = read_password()?;
    store.load(&password)
}

fn connect(config: &PhotelConfig, credentials: &Credentials) -> Result<TelegramChannel, PhotelError> {
    TelegramChannel::new(&TelegramSettings::new(
        credentials.api_token.clone(),
        credentials.channel_id.clone(),
        &config.telegram,
    ))
}

fn holding_dir(config: &PhotelConfig, credentials: &Credentials) -> PathBuf {
    Path::new(&credentials.save_path).join(&config.delivery.holding_dir_name)
}

/// Run the `photel check` command.
pub async fn run_check(config: &PhotelConfig) -> Result<(), PhotelError> {
    let credentials = unlock(config).await?;
    let channel = connect(config, &credentials)?;
    let identity = channel.identify().await?;

    println!(
        "Bot @{} (id {}) posts to {}",
        identity.username.as_deref().unwrap_or("unknown"),
        identity.id,
        credentials.channel_id
    );
    println!("Screenshots: {}", credentials.save_path);
    Ok(())
}

/// Run the `photel message` command.
pub async fn run_message(config: &PhotelConfig, text: &str) -> Result<(), PhotelError> {
    if text.trim().is_empty() {
        return Err(PhotelError::Config("message text cannot be empty".into()));
    }

    let credentials = unlock(config).await?;
    let channel = connect(config, &credentials)?;
    channel.send_text(text).await?;
    println!("Message sent.");
    Ok(())
}

/// Run the `photel send` command.
pub async fn run_send(
    config: &PhotelConfig,
    files: Vec<PathBuf>,
    caption: Option<String>,
) -> Result<(), PhotelError> {
    let credentials = unlock(config).await?;
    let channel = connect(config, &credentials)?;
    channel.identify().await?;

    let summary = Arc::new(DeliverySummary::default());
    let uploader = start_uploader(config, &credentials, Arc::new(channel), summary.clone())?;
    for file in files {
        uploader.enqueue(file, caption.clone())?;
    }
    uploader.finish().await;

    summary.report()
}

/// Run the `photel watch` command.
pub async fn run_watch(config: &PhotelConfig) -> Result<(), PhotelError> {
    let credentials = unlock(config).await?;
    let channel = connect(config, &credentials)?;
    channel.identify().await?;

    let summary = Arc::new(DeliverySummary::default());
    let uploader = start_uploader(config, &credentials, Arc::new(channel), summary.clone())?;
    let shutdown = install_signal_handler();

    info!("reading artifact paths from stdin");
    let stdin = BufReader::new(tokio::io::stdin());
    match feed_lines(stdin, &uploader, &shutdown).await? {
        WatchEnd::Eof => {
            info!(pending = uploader.pending(), "input closed, draining queue");
            let stop = uploader.stop_token();
            let interrupt = tokio::spawn(async move {
                shutdown.cancelled().await;
                stop.cancel();
            });
            uploader.finish().await;
            interrupt.abort();
        }
        WatchEnd::Interrupted => uploader.stop().await,
    }

    summary.report()
}

fn start_uploader(
    config: &PhotelConfig,
    credentials: &Credentials,
    channel: Arc<dyn DeliveryChannel>,
    observer: Arc<dyn DeliveryObserver>,
) -> Result<Uploader, PhotelError> {
    let uploader = Uploader::spawn(
        channel,
        DeliverySettings::from_config(&config.delivery),
        observer,
    );
    uploader.configure_holding_dir(holding_dir(config, credentials))?;
    Ok(uploader)
}

/// How the stdin feed ended.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum WatchEnd {
    Eof,
    Interrupted,
}

/// Enqueue one artifact per input line until EOF or `shutdown`.
pub(crate) async fn feed_lines<R>(
    reader: R,
    uploader: &Uploader,
    shutdown: &CancellationToken,
) -> Result<WatchEnd, PhotelError>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    loop {
        let line = tokio::select! {
            _ = shutdown.cancelled() => return Ok(WatchEnd::Interrupted),
            line = lines.next_line() => line
                .map_err(|e| PhotelError::Internal(format!("failed to read stdin: {e}")))?,
        };

        let Some(line) = line else {
            return Ok(WatchEnd::Eof);
        };
        match parse_watch_line(&line) {
            Some((path, caption)) => uploader.enqueue(path, caption)?,
            None => debug!("skipping blank input line"),
        }
    }
}

/// Parses `path[<TAB>caption]`. Blank lines yield `None`.
pub(crate) fn parse_watch_line(line: &str) -> Option<(PathBuf, Option<String>)> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return None;
    }

    match line.split_once('\t') {
        Some((path, caption)) => Some((
            PathBuf::from(path.trim()),
            Some(caption.trim().to_string()).filter(|c| !c.is_empty()),
        )),
        None => Some((PathBuf::from(line.trim()), None)),
    }
}

/// Counts outcomes for the end-of-run report.
#[derive(Debug, Default)]
pub(crate) struct DeliverySummary {
    delivered: AtomicUsize,
    held: AtomicUsize,
    left: AtomicUsize,
}

impl DeliverySummary {
    fn report(&self) -> Result<(), PhotelError> {
        let delivered = self.delivered.load(Ordering::SeqCst);
        let failed = self.held.load(Ordering::SeqCst) + self.left.load(Ordering::SeqCst);
        println!("Delivered {delivered}, not delivered {failed}.");

        if failed == 0 {
            Ok(())
        } else {
            Err(PhotelError::Protocol {
                message: format!("{failed} artifact(s) could not be delivered"),
                source: None,
            })
        }
    }
}

impl DeliveryObserver for DeliverySummary {
    fn delivered(&self, item: &DeliveryItem, attempts: u32) {
        self.delivered.fetch_add(1, Ordering::SeqCst);
        println!("sent    {} (attempt {attempts})", item.artifact_path.display());
    }

    fn held(&self, item: &DeliveryItem, destination: &Path) {
        self.held.fetch_add(1, Ordering::SeqCst);
        println!(
            "unsent  {} -> {}",
            item.artifact_path.display(),
            destination.display()
        );
    }

    fn left_in_place(&self, item: &DeliveryItem) {
        self.left.fetch_add(1, Ordering::SeqCst);
        warn!(path = %item.artifact_path.display(), "artifact not delivered and not moved");
        println!("unsent  {} (left in place)", item.artifact_path.display());
    }
}
