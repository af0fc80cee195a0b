//! Image upload storage.
//!
//! Uploaded product images are written to a local directory under generated
//! unique names and referenced by URL. Serving the files back is left to the
//! HTTP layer's `/static/` route.

mod storage;

pub use storage::{ImageStore, ImageUpload};
