//! Image MIME detection by file extension.

use std::path::Path;

/// Extensions treated as images when scanning for assets (lowercase).
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "webp"];

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

/// MIME type for an image path; unknown extensions map to `image/png`.
///
/// # Examples
///
/// ```
/// use enikki_storage::mime_for_path;
/// use std::path::Path;
///
/// assert_eq!(mime_for_path(Path::new("bob.JPG")), "image/jpeg");
/// assert_eq!(mime_for_path(Path::new("style")), "image/png");
/// ```
pub fn mime_for_path(path: &Path) -> &'static str {
    match extension(path).as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        _ => "image/png",
    }
}

/// Whether `path` has one of the [`SUPPORTED_EXTENSIONS`], ignoring case.
pub fn is_supported_image(path: &Path) -> bool {
    extension(path).is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}
