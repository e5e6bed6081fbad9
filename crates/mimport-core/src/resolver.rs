//! Entry resolution: turn one manifest entry into a URL, a display name and a
//! destination path under the destination root.
//!
//! Resolution is pure; directories are created by the importer right before
//! the existence check.

use std::path::{Component, Path, PathBuf};
use thiserror::Error;

use crate::layout::DestinationLayout;
use crate::manifest::ManifestEntry;
use crate::url_model::display_name_from_url;

/// The entry has none of the accepted URL keys. Not fatal; the entry is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("entry has no download URL")]
pub struct MissingUrl;

/// How the destination path was chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// Taken from the entry's `path` / `relative_path`.
    Explicit,
    /// Classified into this layout folder by the display name.
    Classified(String),
}

/// Everything needed to fetch one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntry {
    pub url: String,
    pub name: String,
    pub dest: PathBuf,
    pub placement: Placement,
}

pub fn resolve_entry(
    entry: ManifestEntry<'_>,
    dest_root: &Path,
    layout: &DestinationLayout,
) -> Result<ResolvedEntry, MissingUrl> {
    let url = entry.url().ok_or(MissingUrl)?;
    let name = match entry.name() {
        Some(n) => n.to_string(),
        None => display_name_from_url(url),
    };

    let (dest, placement) = match entry.relative_path() {
        Some(rel) => {
            if escapes_root(Path::new(rel)) {
                tracing::warn!("relative path {:?} leaves the destination root", rel);
            }
            (dest_root.join(rel), Placement::Explicit)
        }
        None => {
            let folder = layout.classify(&name);
            (
                dest_root.join(folder).join(&name),
                Placement::Classified(folder.to_string()),
            )
        }
    };
    tracing::debug!(url, name = %name, dest = %dest.display(), ?placement, "resolved entry");

    Ok(ResolvedEntry {
        url: url.to_string(),
        name,
        dest,
        placement,
    })
}

/// True for absolute paths and paths with `..` components; joining either onto
/// the root can land outside it.
fn escapes_root(rel: &Path) -> bool {
    rel.components()
        .any(|c| matches!(c, Component::RootDir | Component::Prefix(_) | Component::ParentDir))
}
