//! Sequential writer for temp download files.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writer for one attempt's temp file. Dropping it closes the handle; only
/// `finalize` makes the content visible at the destination.
pub struct TempFileWriter {
    file: BufWriter<File>,
    temp_path: PathBuf,
    written: u64,
}

impl TempFileWriter {
    /// Create the temp file at `temp_path`, truncating any leftover from an
    /// earlier attempt or run.
    pub fn create(temp_path: &Path) -> io::Result<Self> {
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(temp_path)?;
        Ok(Self {
            file: BufWriter::new(file),
            temp_path: temp_path.to_path_buf(),
            written: 0,
        })
    }

    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    /// Flush and sync, close the handle, then rename onto `final_path`.
    /// Fails if `final_path` is on a different filesystem. On any error the
    /// temp file is removed before returning.
    pub fn finalize(self, final_path: &Path) -> io::Result<()> {
        let temp_path = self.temp_path.clone();
        let result = self.promote(final_path);
        if let Err(e) = &result {
            tracing::debug!("promoting {} failed: {}", temp_path.display(), e);
            let _ = std::fs::remove_file(&temp_path);
        }
        result
    }

    fn promote(self, final_path: &Path) -> io::Result<()> {
        let file = self.file.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
        drop(file);
        std::fs::rename(&self.temp_path, final_path)
    }

    /// Close the handle and remove the temp file (best effort).
    pub fn discard(self) {
        let temp_path = self.temp_path;
        drop(self.file);
        if let Err(e) = std::fs::remove_file(&temp_path) {
            tracing::debug!("could not remove {}: {}", temp_path.display(), e);
        }
    }
}

impl Write for TempFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.file.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}
