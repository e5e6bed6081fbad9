//! Display-name derivation for manifest entries without a `name`.

mod path;

pub use path::filename_from_url_path;

/// Default filename when the URL path yields nothing usable.
pub const DEFAULT_FILENAME: &str = "download.bin";

/// Name for a file fetched from `url`: the last path segment with the query
/// stripped, or `download.bin`.
///
/// # Examples
///
/// - `display_name_from_url("http://x/a.safetensors?dl=1")` → `"a.safetensors"`
/// - `display_name_from_url("http://x/models/")` → `"download.bin"`
pub fn display_name_from_url(url: &str) -> String {
    filename_from_url_path(url).unwrap_or_else(|| DEFAULT_FILENAME.to_string())
}
