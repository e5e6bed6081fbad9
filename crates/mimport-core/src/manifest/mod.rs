//! Manifest loading: normalize the accepted top-level JSON shapes into one
//! ordered list of entry records.

mod entry;

pub use entry::{ManifestEntry, NAME_KEYS, PATH_KEYS, URL_KEYS};

use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Key whose array value is preferred as the entry list.
pub const MODELS_KEY: &str = "models";

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("manifest is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Top-level JSON is neither an object nor an array.
    #[error("unrecognized JSON structure in manifest: expected an object or array, found {found}")]
    Format { found: &'static str },
}

/// Which top-level shape the entries were taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestShape {
    /// `{"models": [...]}`.
    ModelsList,
    /// Any other object: every value is an entry, keys discarded.
    ObjectValues,
    /// A bare array.
    Array,
}

/// Parsed manifest. Entries keep document order.
#[derive(Debug, Clone)]
pub struct Manifest {
    pub shape: ManifestShape,
    pub entries: Vec<Value>,
}

impl Manifest {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ManifestEntry<'_>> {
        self.entries.iter().map(ManifestEntry::new)
    }
}

/// Normalize an already-parsed document.
///
/// An object without a `models` array contributes all of its values, even
/// ones that are not entry-like (a version string, say). Those expose no
/// fields and end up skipped for lacking a URL.
pub fn from_value(value: Value) -> Result<Manifest, ManifestError> {
    match value {
        Value::Object(mut map) => {
            if matches!(map.get(MODELS_KEY), Some(Value::Array(_))) {
                if let Some(Value::Array(entries)) = map.remove(MODELS_KEY) {
                    return Ok(Manifest {
                        shape: ManifestShape::ModelsList,
                        entries,
                    });
                }
            }
            Ok(Manifest {
                shape: ManifestShape::ObjectValues,
                entries: map.into_iter().map(|(_, v)| v).collect(),
            })
        }
        Value::Array(entries) => Ok(Manifest {
            shape: ManifestShape::Array,
            entries,
        }),
        other => Err(ManifestError::Format {
            found: json_kind(&other),
        }),
    }
}

pub fn parse_manifest(text: &str) -> Result<Manifest, ManifestError> {
    let value: Value = serde_json::from_str(text)?;
    from_value(value)
}

pub fn load_manifest(path: &Path) -> Result<Manifest, ManifestError> {
    let text = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let manifest = parse_manifest(&text)?;
    tracing::debug!(
        shape = ?manifest.shape,
        entries = manifest.len(),
        "loaded manifest {}",
        path.display()
    );
    Ok(manifest)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
