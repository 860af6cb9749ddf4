//! Download filename sanitization.

/// Extension given to every proxied download.
pub const DOWNLOAD_EXTENSION: &str = "pdf";

/// Stem used when a display name sanitizes to nothing.
const FALLBACK_STEM: &str = "download";

/// Strips everything except ASCII letters, digits, spaces, `.`, `-`, and `_`.
#[must_use]
pub fn sanitize_display_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(*c, ' ' | '.' | '-' | '_'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Builds the download filename for a record's display name.
#[must_use]
pub fn download_filename(display_name: &str) -> String {
    let stem = sanitize_display_name(display_name);
    let stem = if stem.is_empty() {
        FALLBACK_STEM
    } else {
        stem.as_str()
    };
    format!("{stem}.{DOWNLOAD_EXTENSION}")
}

/// Builds an `attachment` Content-Disposition header value.
#[must_use]
pub fn content_disposition(display_name: &str) -> String {
    format!("attachment; filename=\"{}\"", download_filename(display_name))
}
