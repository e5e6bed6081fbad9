//! Import run: walk the manifest once, in order, resolving and fetching each
//! entry. Only a bad manifest is fatal; every per-entry problem is reported
//! through [`ImportEvent`] and counted in the [`ImportSummary`].

use anyhow::Result;
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::config::ImporterConfig;
use crate::downloader::{self, DownloadOutcome, FetchOptions};
use crate::layout::DestinationLayout;
use crate::manifest::Manifest;
use crate::resolver::resolve_entry;
use crate::retry::{FetchError, RetryPolicy};
use crate::storage;

/// Everything the run needs, built once from config at startup.
#[derive(Debug, Clone)]
pub struct ImportSettings {
    pub layout: DestinationLayout,
    pub retry: RetryPolicy,
    pub fetch: FetchOptions,
}

impl ImportSettings {
    /// Fails when `cfg` holds a zero timeout or an unusable retry delay.
    pub fn from_config(cfg: &ImporterConfig) -> Result<Self> {
        cfg.validate()?;
        Ok(Self {
            layout: cfg.destination_layout(),
            retry: cfg.retry_policy()?,
            fetch: FetchOptions::from_config(cfg),
        })
    }
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            layout: DestinationLayout::builtin(),
            retry: RetryPolicy::default(),
            fetch: FetchOptions::default(),
        }
    }
}

/// Progress notifications, in the order they happen.
#[derive(Debug)]
pub enum ImportEvent<'a> {
    /// Emitted once, before any entry is processed.
    Found { count: usize },
    /// Entry has no URL under any accepted key; skipped.
    MissingUrl { index: usize, entry: &'a Value },
    /// Destination already present; not requested again.
    AlreadyExists { dest: &'a Path },
    Downloading { name: &'a str, dest: &'a Path },
    AttemptFailed { attempt: u32, error: &'a FetchError },
    Downloaded { dest: &'a Path, bytes: u64 },
    /// Retries exhausted (or the destination folder could not be created).
    Failed { url: &'a str, error: &'a FetchError },
    Finished { summary: &'a ImportSummary },
}

/// Final counts. `found` is the number of manifest entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub found: usize,
    pub downloaded: usize,
    pub already_present: usize,
    pub missing_url: usize,
    pub failed: usize,
    /// Destinations written during this run.
    pub downloaded_paths: Vec<PathBuf>,
}

impl ImportSummary {
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// Process every entry of `manifest` against `dest_root`, sequentially.
pub fn run_import<F>(
    manifest: &Manifest,
    dest_root: &Path,
    settings: &ImportSettings,
    mut on_event: F,
) -> ImportSummary
where
    F: FnMut(&ImportEvent<'_>),
{
    let mut summary = ImportSummary {
        found: manifest.len(),
        ..ImportSummary::default()
    };
    tracing::info!(entries = summary.found, root = %dest_root.display(), "import started");
    on_event(&ImportEvent::Found {
        count: summary.found,
    });

    for (index, entry) in manifest.iter().enumerate() {
        let resolved = match resolve_entry(entry, dest_root, &settings.layout) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(index, "skipping entry: {}", e);
                summary.missing_url += 1;
                on_event(&ImportEvent::MissingUrl {
                    index,
                    entry: entry.value(),
                });
                continue;
            }
        };
        let dest = resolved.dest.as_path();

        if let Err(e) = storage::ensure_parent(dest) {
            let error = FetchError::Storage(e);
            tracing::warn!(url = %resolved.url, "cannot create folder for {}: {}", dest.display(), error);
            summary.failed += 1;
            on_event(&ImportEvent::Failed {
                url: &resolved.url,
                error: &error,
            });
            continue;
        }

        if downloader::is_present(dest) {
            tracing::debug!("already exists: {}", dest.display());
            summary.already_present += 1;
            on_event(&ImportEvent::AlreadyExists { dest });
            continue;
        }

        on_event(&ImportEvent::Downloading {
            name: &resolved.name,
            dest,
        });
        let result = downloader::download_file(
            &resolved.url,
            dest,
            &settings.retry,
            &settings.fetch,
            |attempt, error| on_event(&ImportEvent::AttemptFailed { attempt, error }),
        );
        match result {
            Ok(DownloadOutcome::Downloaded { bytes }) => {
                summary.downloaded += 1;
                summary.downloaded_paths.push(resolved.dest.clone());
                on_event(&ImportEvent::Downloaded { dest, bytes });
            }
            Ok(DownloadOutcome::AlreadyPresent) => {
                summary.already_present += 1;
                on_event(&ImportEvent::AlreadyExists { dest });
            }
            Err(error) => {
                tracing::warn!(url = %resolved.url, "giving up: {}", error);
                summary.failed += 1;
                on_event(&ImportEvent::Failed {
                    url: &resolved.url,
                    error: &error,
                });
            }
        }
    }

    tracing::info!(
        found = summary.found,
        downloaded = summary.downloaded,
        already_present = summary.already_present,
        missing_url = summary.missing_url,
        failed = summary.failed,
        "import finished"
    );
    on_event(&ImportEvent::Finished { summary: &summary });
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::parse_manifest;

    fn collect(manifest: &Manifest, root: &Path) -> (ImportSummary, Vec<String>) {
        let mut seen = Vec::new();
        let summary = run_import(manifest, root, &ImportSettings::default(), |ev| {
            seen.push(match ev {
                ImportEvent::Found { .. } => "found",
                ImportEvent::MissingUrl { .. } => "missing_url",
                ImportEvent::AlreadyExists { .. } => "exists",
                ImportEvent::Downloading { .. } => "downloading",
                ImportEvent::AttemptFailed { .. } => "attempt_failed",
                ImportEvent::Downloaded { .. } => "downloaded",
                ImportEvent::Failed { .. } => "failed",
                ImportEvent::Finished { .. } => "finished",
            }
            .to_string())
        });
        (summary, seen)
    }

    #[test]
    fn entries_without_url_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let m = parse_manifest(r#"{"version": "1.2", "orphan": {"name": "x.ckpt"}}"#).unwrap();
        let (summary, seen) = collect(&m, dir.path());
        assert_eq!(summary.found, 2);
        assert_eq!(summary.missing_url, 2);
        assert_eq!(summary.downloaded, 0);
        assert_eq!(seen, ["found", "missing_url", "missing_url", "finished"]);
    }

    #[test]
    fn existing_destination_is_not_requested() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("vae")).unwrap();
        std::fs::write(dir.path().join("vae/sdxl_vae.pt"), b"cached").unwrap();
        // Port 1 is never listening; a request would fail the entry.
        let m = parse_manifest(r#"[{"url": "http://127.0.0.1:1/sdxl_vae.pt"}]"#).unwrap();
        let (summary, seen) = collect(&m, dir.path());
        assert_eq!(summary.already_present, 1);
        assert_eq!(summary.failed, 0);
        assert_eq!(seen, ["found", "exists", "finished"]);
    }

    #[test]
    fn settings_reject_zero_timeout() {
        let cfg = ImporterConfig {
            timeout_secs: 0,
            ..ImporterConfig::default()
        };
        assert!(ImportSettings::from_config(&cfg).is_err());

        let settings = ImportSettings::from_config(&ImporterConfig::default()).unwrap();
        assert_eq!(settings.fetch.timeout, std::time::Duration::from_secs(60));
        assert_eq!(settings.retry.max_attempts, 3);
        assert_eq!(settings.retry.base_delay, std::time::Duration::from_millis(1500));
    }

    #[test]
    fn empty_manifest_reports_zero() {
        let dir = tempfile::tempdir().unwrap();
        let m = parse_manifest("[]").unwrap();
        let (summary, seen) = collect(&m, dir.path());
        assert_eq!(summary, ImportSummary::default());
        assert_eq!(seen, ["found", "finished"]);
    }
}
