//! Window-title parsing for the target application.
//!
//! Document windows are titled `"<project> - <marker> <version>"`, e.g.
//! `"MySong - FL Studio 20"`. The application's own window carries the bare
//! marker (`"FL Studio 20"`) and names no project.

/// Returns `true` if `title` belongs to the target application.
pub fn is_app_window(title: &str, marker: &str) -> bool {
    title.contains(marker)
}

/// Extracts the project name from a document window title.
///
/// Titles that start with the marker are treated as the main window and yield
/// `None`, which also drops projects whose own name starts with the marker
/// (`"FL Studio Remix - FL Studio 20"`).
pub fn extract_project_name(title: &str, marker: &str) -> Option<String> {
    let title = title.trim();
    if title.starts_with(marker) {
        return None;
    }

    let separator = format!(" - {marker}");
    // The title is trimmed and the separator starts with a space, so the
    // prefix is never empty.
    let (name, _) = title.split_once(separator.as_str())?;
    Some(name.trim().to_string())
}

/// Extracts the version number that follows the marker.
///
/// Only the text between the first marker and the next one (or the end of the
/// title) is considered. All of its digits are concatenated, so `"20.8"` reads
/// as `208`. Values that overflow `u32` are treated as absent.
pub fn extract_version_number(title: &str, marker: &str) -> Option<u32> {
    let mut pieces = title.split(marker);
    pieces.next()?;
    let after = pieces.next()?;
    let digits: String = after.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}
