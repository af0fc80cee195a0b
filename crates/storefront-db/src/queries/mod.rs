//! Database query modules.

pub mod images;
pub mod products;
