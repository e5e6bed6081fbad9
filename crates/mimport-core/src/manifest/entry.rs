//! Read-only view over one manifest entry.

use serde_json::Value;

/// Keys tried, in order, for the download URL.
pub const URL_KEYS: &[&str] = &["download_url", "url", "file_url", "location"];
/// Keys tried, in order, for the display name.
pub const NAME_KEYS: &[&str] = &["name", "filename"];
/// Keys tried, in order, for an explicit path relative to the destination root.
pub const PATH_KEYS: &[&str] = &["path", "relative_path"];

/// Borrowed entry record. Any JSON value is accepted; non-objects simply have
/// no fields.
#[derive(Debug, Clone, Copy)]
pub struct ManifestEntry<'a> {
    value: &'a Value,
}

impl<'a> ManifestEntry<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self { value }
    }

    pub fn value(&self) -> &'a Value {
        self.value
    }

    /// First key in `keys` holding a non-empty string.
    ///
    /// Null, empty-string, and non-string values count as absent and fall
    /// through to the next key.
    pub fn lookup(&self, keys: &[&str]) -> Option<&'a str> {
        let obj = self.value.as_object()?;
        keys.iter()
            .filter_map(|k| obj.get(*k))
            .filter_map(Value::as_str)
            .find(|s| !s.is_empty())
    }

    pub fn url(&self) -> Option<&'a str> {
        self.lookup(URL_KEYS)
    }

    pub fn name(&self) -> Option<&'a str> {
        self.lookup(NAME_KEYS)
    }

    pub fn relative_path(&self) -> Option<&'a str> {
        self.lookup(PATH_KEYS)
    }
}
