//! Filename extraction from URL path.

/// Extracts the final path segment of `url`, ignoring query and fragment.
///
/// Returns `None` when the segment is empty (root URL, trailing `/`) or a
/// dot segment. Percent-encoding is left as-is.
pub fn filename_from_url_path(url: &str) -> Option<String> {
    let path = match url::Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        // Not an absolute URL; strip the query by hand.
        Err(_) => url.split(['?', '#']).next().unwrap_or_default().to_string(),
    };
    let segment = path.rsplit('/').next()?;
    if segment.is_empty() || segment == "." || segment == ".." {
        return None;
    }
    Some(segment.to_string())
}
