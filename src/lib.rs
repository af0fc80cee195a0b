//! Storefront - product listing backend with image uploads
//!
//! This library crate exposes the core functionality for integration testing.

pub mod config;
pub mod images;
pub mod products;
pub mod server;
