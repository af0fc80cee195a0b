//! Storefront-Common: Shared types and utilities.
//!
//! This crate provides common functionality used across storefront:
//!
//! - **Typed IDs**: Integer newtypes for products and images
//! - **Path Utilities**: Upload filename and extension handling
//! - **Error Handling**: The error taxonomy shared by every layer
//!
//! # Examples
//!
//! ```
//! use storefront_common::{Error, ProductId, Result};
//! use storefront_common::paths::upload_extension;
//!
//! let id = ProductId::from(7);
//! assert_eq!(id.get(), 7);
//!
//! assert_eq!(upload_extension("mug.PNG").as_deref(), Some("png"));
//!
//! fn example() -> Result<()> {
//!     Err(Error::not_found("product", 42))
//! }
//! assert!(example().is_err());
//! ```

pub mod error;
pub mod ids;
pub mod paths;

pub use error::{Error, Result};
pub use ids::*;
