//! Human-readable progress lines on stdout.

use mimport_core::ImportEvent;
use std::io::Write;

/// Prints one line per import event. Write errors (closed stdout) are ignored
/// so they never abort the run.
pub struct Reporter<W: Write> {
    out: W,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn report(&mut self, event: &ImportEvent<'_>) {
        let _ = match event {
            ImportEvent::Found { count } => {
                writeln!(self.out, "Found {} model entries in manifest", count)
            }
            ImportEvent::MissingUrl { entry, .. } => {
                writeln!(self.out, "Skipping entry with no download URL: {}", entry)
            }
            ImportEvent::AlreadyExists { dest } => {
                writeln!(self.out, "Already exists, skipping: {}", dest.display())
            }
            ImportEvent::Downloading { name, dest } => {
                writeln!(self.out, "Downloading {} -> {}", name, dest.display())
            }
            ImportEvent::AttemptFailed { attempt, error } => {
                writeln!(self.out, "Attempt {} failed: {}", attempt, error)
            }
            ImportEvent::Downloaded { dest, .. } => {
                writeln!(self.out, "Downloaded: {}", dest.display())
            }
            ImportEvent::Failed { url, error } => {
                writeln!(self.out, "Failed to download {}: {}", url, error)
            }
            ImportEvent::Finished { summary } => writeln!(
                self.out,
                "Model import finished. Downloaded: {} of {} entries ({} already present, {} without URL, {} failed)",
                summary.downloaded,
                summary.found,
                summary.already_present,
                summary.missing_url,
                summary.failed
            ),
        };
        let _ = self.out.flush();
    }
}
