use std::path::Path;

/// Guesses a Content-Type from the file extension.
///
/// Unknown extensions fall back to `application/octet-stream`.
pub fn content_type(path: &Path) -> String {
    mime_guess::from_path(path).first_or_octet_stream().to_string()
}
