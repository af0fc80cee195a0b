//! Path utilities for uploaded image file names.
//!
//! Uploads arrive with a client-supplied file name. These helpers pull out the
//! part that is safe to keep (the final path component) and the lowercase
//! extension used for whitelisting.

/// Image extensions accepted when no explicit whitelist is configured.
const DEFAULT_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

/// Get the default list of accepted image extensions.
///
/// # Examples
///
/// ```
/// use storefront_common::paths::default_image_extensions;
///
/// let extensions = default_image_extensions();
/// assert!(extensions.contains(&"png"));
/// assert!(extensions.contains(&"jpeg"));
/// ```
#[must_use]
pub fn default_image_extensions() -> &'static [&'static str] {
    DEFAULT_IMAGE_EXTENSIONS
}

/// Return the final path component of an uploaded file name.
///
/// Both `/` and `\` are treated as separators since the name comes from an
/// arbitrary client. Returns `None` when nothing usable is left.
///
/// # Examples
///
/// ```
/// use storefront_common::paths::upload_basename;
///
/// assert_eq!(upload_basename("mug.png"), Some("mug.png"));
/// assert_eq!(upload_basename("../../etc/mug.png"), Some("mug.png"));
/// assert_eq!(upload_basename("C:\\photos\\mug.png"), Some("mug.png"));
/// assert_eq!(upload_basename("photos/"), None);
/// ```
pub fn upload_basename(filename: &str) -> Option<&str> {
    let base = filename
        .rsplit(&['/', '\\'][..])
        .next()
        .unwrap_or(filename)
        .trim();
    match base {
        "" | "." | ".." => None,
        other => Some(other),
    }
}

/// Return the lowercase extension of a file name.
///
/// The extension is whatever follows the last `.`; a name without a `.` or
/// ending in one has no extension.
///
/// # Examples
///
/// ```
/// use storefront_common::paths::upload_extension;
///
/// assert_eq!(upload_extension("mug.PNG").as_deref(), Some("png"));
/// assert_eq!(upload_extension("archive.tar.gz").as_deref(), Some("gz"));
/// assert_eq!(upload_extension("README"), None);
/// assert_eq!(upload_extension("trailing."), None);
/// ```
pub fn upload_extension(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_lowercase())
}

/// Normalize a configured extension: lowercase, without a leading dot.
///
/// # Examples
///
/// ```
/// use storefront_common::paths::normalize_extension;
///
/// assert_eq!(normalize_extension(".JPG"), "jpg");
/// assert_eq!(normalize_extension(" png "), "png");
/// ```
pub fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}

/// Check if an extension is in the allowed set (case-insensitive).
pub fn is_allowed_extension<S: AsRef<str>>(ext: &str, allowed: &[S]) -> bool {
    let ext = normalize_extension(ext);
    allowed
        .iter()
        .any(|candidate| normalize_extension(candidate.as_ref()) == ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basename_strips_directories() {
        assert_eq!(upload_basename("a/b/c.jpg"), Some("c.jpg"));
        assert_eq!(upload_basename("..\\..\\c.jpg"), Some("c.jpg"));
        assert_eq!(upload_basename("  spaced.gif "), Some("spaced.gif"));
    }

    #[test]
    fn test_basename_rejects_empty() {
        assert_eq!(upload_basename(""), None);
        assert_eq!(upload_basename("dir/.."), None);
        assert_eq!(upload_basename("dir/."), None);
    }

    #[test]
    fn test_extension() {
        assert_eq!(upload_extension("photo.JpEg").as_deref(), Some("jpeg"));
        assert_eq!(upload_extension(".png").as_deref(), Some("png"));
        assert_eq!(upload_extension("noext"), None);
        assert_eq!(upload_extension(""), None);
    }

    #[test]
    fn test_allowed_extension_default_set() {
        let allowed = default_image_extensions();
        assert!(is_allowed_extension("png", allowed));
        assert!(is_allowed_extension("JPG", allowed));
        assert!(is_allowed_extension("gif", allowed));
        assert!(!is_allowed_extension("webp", allowed));
        assert!(!is_allowed_extension("exe", allowed));
    }

    #[test]
    fn test_allowed_extension_configured_set() {
        let allowed = vec![".WEBP".to_string()];
        assert!(is_allowed_extension("webp", &allowed));
        assert!(!is_allowed_extension("png", &allowed));
    }
}
