//! Storefront-DB: Database schema, migrations, and query operations
//!
//! This crate provides database functionality for storefront using SQLite
//! with rusqlite and r2d2 connection pooling.
//!
//! # Modules
//!
//! - `migrations` - Database schema migrations
//! - `pool` - Connection pool management
//! - `models` - Rust models matching database schema
//! - `queries` - Database query operations
//! - `session` - Transactional unit of work over products and images
//!
//! # Example
//!
//! ```
//! use storefront_db::pool::{init_memory_pool, get_conn};
//! use storefront_db::session::UnitOfWork;
//!
//! let pool = init_memory_pool().unwrap();
//! let conn = get_conn(&pool).unwrap();
//!
//! let uow = UnitOfWork::begin(&conn).unwrap();
//! let product = uow.insert_product("Mug", "Ceramic mug", 9.99).unwrap();
//! uow.insert_image(product.id, "http://localhost:8000/static/mug.png").unwrap();
//! uow.commit().unwrap();
//! ```

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
pub mod session;
