//! Product listings and their images.
//!
//! [`ProductService`] implements the add / update / remove / retrieve / list
//! use cases on top of the [`ImageStore`](crate::images::ImageStore) and the
//! database unit of work.

mod service;
mod types;

pub use service::ProductService;
pub use types::{
    parse_price, NewProduct, ProductDetails, ProductView, RemovedProduct, SavedProduct,
    SkippedImage,
};
