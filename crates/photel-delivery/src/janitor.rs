// SPDX-FileCopyrightText: 2026 Photel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Disposal of artifacts once their delivery has concluded.
//!
//! Neither operation returns an error: failures are logged and the artifact
//! is left where it is.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, error, info, warn};

/// Highest numeric suffix tried before a held name is considered unavailable.
const MAX_NAME_SUFFIX: u32 = 10_000;

/// Delete `path`, retrying up to `attempts` times with `delay` in between.
///
/// A file that is already gone counts as deleted.
pub async fn safe_delete(path: &Path, attempts: u32, delay: Duration) -> bool {
    let attempts = attempts.max(1);
    for attempt in 1..=attempts {
        match tokio::fs::remove_file(path).await {
            Ok(()) => {
                debug!(path = %path.display(), "artifact deleted");
                return true;
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "artifact already gone");
                return true;
            }
            Err(e) if attempt < attempts => {
                warn!(
                    path = %path.display(),
                    attempt,
                    max = attempts,
                    error = %e,
                    "delete failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => {
                error!(
                    path = %path.display(),
                    attempts,
                    error = %e,
                    "giving up on deleting artifact"
                );
            }
        }
    }
    false
}

/// Move `path` into `holding_dir`, keeping its file name.
///
/// The directory is created if absent. When a file of the same name is
/// already held, a numeric suffix is added (`shot-1.png`). Returns the new
/// location, or `None` if the artifact could not be moved.
pub async fn move_to_holding(path: &Path, holding_dir: &Path) -> Option<PathBuf> {
    if let Err(e) = tokio::fs::create_dir_all(holding_dir).await {
        error!(
            dir = %holding_dir.display(),
            error = %e,
            "cannot create holding directory, artifact left in place"
        );
        return None;
    }

    let Some(file_name) = path.file_name() else {
        error!(path = %path.display(), "artifact path has no file name, left in place");
        return None;
    };

    let destination = match free_destination(holding_dir, Path::new(file_name)).await {
        Ok(Some(destination)) => destination,
        Ok(None) => {
            error!(
                path = %path.display(),
                dir = %holding_dir.display(),
                max = MAX_NAME_SUFFIX,
                "no free name in holding directory, artifact left in place"
            );
            return None;
        }
        Err(e) => {
            error!(
                path = %path.display(),
                dir = %holding_dir.display(),
                error = %e,
                "cannot check holding directory, artifact left in place"
            );
            return None;
        }
    };

    match relocate(path, &destination).await {
        Ok(()) => {
            info!(
                from = %path.display(),
                to = %destination.display(),
                "artifact moved to holding directory"
            );
            Some(destination)
        }
        Err(e) => {
            error!(
                path = %path.display(),
                dir = %holding_dir.display(),
                error = %e,
                "failed to move artifact to holding directory"
            );
            None
        }
    }
}

async fn relocate(from: &Path, to: &Path) -> std::io::Result<()> {
    match tokio::fs::rename(from, to).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::CrossesDevices => {
            debug!(from = %from.display(), to = %to.display(), "cross-device move, copying");
            tokio::fs::copy(from, to).await?;
            if let Err(e) = tokio::fs::remove_file(from).await {
                // The copy is safe in the holding directory; only the source lingers.
                warn!(path = %from.display(), error = %e, "copied but could not remove source");
            }
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// First unused name for `file_name` in `dir`, trying `stem-1.ext` up to
/// `stem-{MAX_NAME_SUFFIX}.ext` after the plain name.
async fn free_destination(dir: &Path, file_name: &Path) -> std::io::Result<Option<PathBuf>> {
    let candidate = dir.join(file_name);
    if !tokio::fs::try_exists(&candidate).await? {
        return Ok(Some(candidate));
    }

    let stem = file_name
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = file_name
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    for n in 1..=MAX_NAME_SUFFIX {
        let candidate = dir.join(format!("{stem}-{n}{extension}"));
        if !tokio::fs::try_exists(&candidate).await? {
            return Ok(Some(candidate));
        }
    }
    Ok(None)
}
