//! Filesystem-level image storage.
//!
//! Stores each upload under `{upload_dir}/{timestamp}_{filename}` and hands
//! back `{base_url}/static/{timestamp}_{filename}` as its reference.

use std::io::Write;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use chrono::Utc;
use storefront_common::paths::{is_allowed_extension, upload_basename, upload_extension};
use storefront_common::{Error, Result};

use crate::config::StorageConfig;

/// URL path segment stored files are served under.
const STATIC_PREFIX: &str = "/static/";

/// Name attempts before giving up on a collision streak.
const MAX_NAME_ATTEMPTS: u32 = 16;

/// One uploaded file as read from the request.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// File name as supplied by the client.
    pub filename: String,
    /// Full file content.
    pub content: Bytes,
}

impl ImageUpload {
    pub fn new(filename: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }
}

/// Local-disk sink for uploaded images.
///
/// Built from an explicit [`StorageConfig`]; nothing is read from ambient
/// process state.
#[derive(Debug, Clone)]
pub struct ImageStore {
    upload_dir: PathBuf,
    staging_dir: PathBuf,
    base_url: String,
    allowed_extensions: Vec<String>,
}

impl ImageStore {
    /// Create a store from configuration without touching the filesystem.
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            upload_dir: config.upload_dir.clone(),
            staging_dir: staging_dir_for(&config.upload_dir),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            allowed_extensions: config.allowed_extensions.clone(),
        }
    }

    /// Create a store and make sure its upload and staging directories exist.
    pub fn open(config: &StorageConfig) -> Result<Self> {
        let store = Self::new(config);
        std::fs::create_dir_all(&store.upload_dir)?;
        std::fs::create_dir_all(&store.staging_dir)?;
        Ok(store)
    }

    /// Directory stored files live in.
    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Directory partial uploads are written to before they are moved into
    /// the upload directory. Never served.
    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }

    /// Validate and write one upload, returning its reference URL.
    ///
    /// Fails with [`Error::InvalidInput`] for a missing or disallowed
    /// extension and with [`Error::StorageWrite`] when the file cannot be
    /// written. The content is written to a temporary file in the staging
    /// directory first and then moved into place, so neither the final name
    /// nor anything under `/static/` exposes a partial file.
    /// Nothing is cleaned up here if a later step fails; see [`Self::delete`].
    pub fn store(&self, upload: &ImageUpload) -> Result<String> {
        let basename = upload_basename(&upload.filename)
            .ok_or_else(|| Error::invalid_input("Invalid file name"))?;
        let ext = upload_extension(basename)
            .ok_or_else(|| Error::invalid_input("Invalid file name"))?;
        if !is_allowed_extension(&ext, &self.allowed_extensions) {
            return Err(Error::invalid_input(format!(
                "Allowed file types: {}",
                self.allowed_extensions.join(", ")
            )));
        }

        let safe_name = sanitize_filename(basename);

        let mut tmp = tempfile::Builder::new()
            .prefix(".upload-")
            .tempfile_in(&self.staging_dir)
            .map_err(|e| Error::storage_write(&self.staging_dir, e))?;
        tmp.write_all(&upload.content)
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| Error::storage_write(tmp.path(), e))?;

        let stamp = Utc::now().format("%Y%m%d%H%M%S%6f").to_string();
        for attempt in 0..MAX_NAME_ATTEMPTS {
            let filename = generated_filename(&stamp, attempt, &safe_name);
            let dest = self.upload_dir.join(&filename);
            match tmp.persist_noclobber(&dest) {
                Ok(_) => {
                    tracing::debug!(
                        file = %dest.display(),
                        bytes = upload.content.len(),
                        "Stored uploaded image"
                    );
                    return Ok(self.reference_for(&filename));
                }
                Err(e) if e.error.kind() == std::io::ErrorKind::AlreadyExists => {
                    tmp = e.file;
                }
                Err(e) => return Err(Error::storage_write(dest, e.error)),
            }
        }

        Err(Error::storage_write(
            self.upload_dir.join(&safe_name),
            std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                "no free file name after repeated collisions",
            ),
        ))
    }

    /// Delete the file behind a reference produced by [`Self::store`].
    ///
    /// Returns `Ok(false)` if the file is already gone. A reference that does
    /// not point into the upload directory is [`Error::InvalidInput`].
    pub fn delete(&self, reference: &str) -> Result<bool> {
        let path = self.resolve_reference(reference).ok_or_else(|| {
            Error::invalid_input(format!("Not a stored image reference: {reference}"))
        })?;

        match std::fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(file = %path.display(), "Deleted stored image");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Error::Io(e)),
        }
    }

    /// Map a reference (full URL or `/static/...` path) to its file on disk.
    pub fn resolve_reference(&self, reference: &str) -> Option<PathBuf> {
        let name = reference
            .strip_prefix(&self.base_url)
            .unwrap_or(reference)
            .strip_prefix(STATIC_PREFIX)?;

        if name.is_empty() || name == "." || name == ".." || name.contains(&['/', '\\'][..]) {
            return None;
        }
        Some(self.upload_dir.join(name))
    }

    fn reference_for(&self, filename: &str) -> String {
        format!("{}{}{}", self.base_url, STATIC_PREFIX, filename)
    }
}

/// Sibling of the upload directory, on the same filesystem so a staged file
/// can be renamed into place.
fn staging_dir_for(upload_dir: &Path) -> PathBuf {
    let name = upload_dir
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "uploads".to_string());
    upload_dir.with_file_name(format!(".{name}.incoming"))
}

/// Format the stored file name; retries after a collision get a `-N` suffix
/// on the timestamp.
fn generated_filename(stamp: &str, attempt: u32, basename: &str) -> String {
    if attempt == 0 {
        format!("{stamp}_{basename}")
    } else {
        format!("{stamp}-{attempt}_{basename}")
    }
}

/// Keep ASCII alphanumerics, `.`, `-` and `_`; everything else becomes `_`
/// so the name is usable verbatim in a URL path.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
