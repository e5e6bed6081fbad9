//! Download engine: existence pre-check, bounded retry with linear backoff,
//! and temp-file-then-rename promotion for each attempt.

mod single;

use std::path::Path;
use std::time::Duration;

use crate::config::ImporterConfig;
use crate::retry::{run_with_retry, FetchError, RetryPolicy};
use crate::storage::TEMP_SUFFIX;

/// Per-attempt transfer settings.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Connect timeout and stall window.
    pub timeout: Duration,
    /// Optional ceiling on the whole transfer.
    pub transfer_timeout: Option<Duration>,
    pub temp_suffix: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            transfer_timeout: None,
            temp_suffix: TEMP_SUFFIX.to_string(),
        }
    }
}

impl FetchOptions {
    pub fn from_config(cfg: &ImporterConfig) -> Self {
        Self {
            timeout: Duration::from_secs(cfg.timeout_secs),
            transfer_timeout: cfg.transfer_timeout_secs.map(Duration::from_secs),
            temp_suffix: cfg.temp_suffix.clone(),
        }
    }
}

/// Result of a successful `download_file` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// Destination already existed; nothing was requested.
    AlreadyPresent,
    /// Fresh download promoted to the destination.
    Downloaded { bytes: u64 },
}

/// True when something (file, dir, or symlink target) already sits at `dest`.
/// Content is not inspected.
pub fn is_present(dest: &Path) -> bool {
    dest.exists()
}

/// Fetch `url` to `dest` unless `dest` already exists.
///
/// Each failed attempt is passed to `on_attempt_failed` before the backoff
/// sleep. When every attempt fails the last error is returned and `dest` has
/// not been created.
pub fn download_file<N>(
    url: &str,
    dest: &Path,
    policy: &RetryPolicy,
    opts: &FetchOptions,
    mut on_attempt_failed: N,
) -> Result<DownloadOutcome, FetchError>
where
    N: FnMut(u32, &FetchError),
{
    if is_present(dest) {
        return Ok(DownloadOutcome::AlreadyPresent);
    }

    let bytes = run_with_retry(
        policy,
        |attempt| {
            tracing::debug!(attempt, url, dest = %dest.display(), "GET");
            single::fetch_once(url, dest, opts)
        },
        |attempt, err| {
            tracing::warn!(attempt, url, timeout = err.is_timeout(), "attempt failed: {}", err);
            on_attempt_failed(attempt, err);
        },
    )?;
    tracing::info!(url, bytes, "downloaded {}", dest.display());
    Ok(DownloadOutcome::Downloaded { bytes })
}
