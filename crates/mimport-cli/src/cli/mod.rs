//! CLI for mimport.

mod report;

use anyhow::{Context, Result};
use clap::Parser;
use mimport_core::config::{self, ImporterConfig, RetryConfig};
use mimport_core::{load_manifest, run_import, ImportSettings, ImportSummary};
use std::io;
use std::path::PathBuf;

pub use report::Reporter;

/// Fetch the model files listed in a JSON manifest into a models directory.
#[derive(Debug, Parser)]
#[command(name = "mimport")]
#[command(about = "mimport: fetch model files listed in a JSON manifest", long_about = None)]
pub struct Cli {
    /// JSON manifest (array, object of entries, or {"models": [...]}).
    pub manifest: PathBuf,

    /// Destination root; files land in layout subfolders or explicit paths below it.
    pub dest_root: PathBuf,

    /// Config file (default: ~/.config/mimport/config.toml when present).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Attempts per file, including the first.
    #[arg(long, value_name = "N")]
    pub max_attempts: Option<u32>,

    /// Per-attempt network timeout in seconds (at least 1).
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: Option<u64>,

    /// Arguments after the two positionals are accepted and ignored.
    #[arg(hide = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub extra: Vec<String>,
}

impl Cli {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let summary = cli.run(io::stdout().lock())?;
        if summary.has_failures() {
            tracing::warn!("{} of {} entries failed to download", summary.failed, summary.found);
        }
        Ok(())
    }

    /// Load config and manifest, then import, printing progress to `out`.
    /// Only config and manifest problems are errors; per-entry failures are
    /// reported and counted.
    pub fn run<W: io::Write>(&self, out: W) -> Result<ImportSummary> {
        if !self.extra.is_empty() {
            tracing::debug!("ignoring extra arguments: {:?}", self.extra);
        }
        let mut cfg = config::load(self.config.as_deref())?;
        self.apply_overrides(&mut cfg);
        tracing::debug!("loaded config: {:?}", cfg);

        let manifest = load_manifest(&self.manifest)
            .with_context(|| format!("cannot import from {}", self.manifest.display()))?;

        let settings = ImportSettings::from_config(&cfg)?;
        let mut reporter = Reporter::new(out);
        Ok(run_import(&manifest, &self.dest_root, &settings, |ev| {
            reporter.report(ev)
        }))
    }

    fn apply_overrides(&self, cfg: &mut ImporterConfig) {
        if let Some(n) = self.max_attempts {
            let retry = cfg.retry.get_or_insert_with(RetryConfig::default);
            retry.max_attempts = n;
        }
        if let Some(secs) = self.timeout_secs {
            cfg.timeout_secs = secs;
        }
    }
}

#[cfg(test)]
mod tests;
