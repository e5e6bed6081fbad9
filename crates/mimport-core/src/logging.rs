//! Structured log setup for an import run.
//!
//! The log goes to `mimport.log` in the XDG state dir so that stdout stays
//! reserved for progress lines. When that file cannot be set up, `main`
//! switches to stderr.

use anyhow::Result;
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,mimport_core=debug";

/// Per-event log sink. Each event gets its own handle to the log file; if the
/// handle cannot be duplicated, that event goes to stderr instead.
enum FileOrStderr {
    File(fs::File),
    Stderr,
}

impl io::Write for FileOrStderr {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            FileOrStderr::File(f) => f.write(buf),
            FileOrStderr::Stderr => io::stderr().lock().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            FileOrStderr::File(f) => f.flush(),
            FileOrStderr::Stderr => io::stderr().lock().flush(),
        }
    }
}

struct LogFile(fs::File);

impl<'a> MakeWriter<'a> for LogFile {
    type Writer = FileOrStderr;

    fn make_writer(&'a self) -> Self::Writer {
        match self.0.try_clone() {
            Ok(f) => FileOrStderr::File(f),
            Err(_) => FileOrStderr::Stderr,
        }
    }
}

/// `RUST_LOG` when set, else [`DEFAULT_FILTER`].
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Send logs to `$XDG_STATE_HOME/mimport/mimport.log`, appending across runs,
/// and return the file's path. Errors leave no subscriber installed.
pub fn init_logging() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("mimport")?;
    let log_file_path: PathBuf = xdg_dirs.place_state_file("mimport.log")?;
    if let Some(dir) = log_file_path.parent() {
        fs::create_dir_all(dir)?;
    }

    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file_path)?;

    let writer = BoxMakeWriter::new(LogFile(file));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "logging to {}", log_file_path.display());

    Ok(log_file_path)
}

/// Stderr-only subscriber for runs where the log file is unavailable.
pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}
