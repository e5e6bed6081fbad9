//! Disk I/O and file lifecycle.
//!
//! Downloads stream into a temp file beside the destination and are only
//! exposed at the final path through a single rename.

mod writer;

pub use writer::TempFileWriter;

use std::io;
use std::path::{Path, PathBuf};

/// Default temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".tmp";

/// Path for the temp file: appends `suffix` to the final path
/// (e.g. `a.safetensors` → `a.safetensors.tmp`).
pub fn temp_path(final_path: &Path, suffix: &str) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(suffix);
    PathBuf::from(o)
}

/// Create all ancestors of `path` (no-op when they already exist).
pub fn ensure_parent(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
        _ => Ok(()),
    }
}
