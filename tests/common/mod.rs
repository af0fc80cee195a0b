//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which creates an in-memory DB, a temporary upload
//! directory, and a full [`AppContext`]. [`MultipartForm`] builds the
//! `multipart/form-data` bodies the product routes expect.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use std::path::PathBuf;
use tempfile::TempDir;
use tower::ServiceExt;

use storefront::config::Config;
use storefront::images::{ImageStore, ImageUpload};
use storefront::products::{NewProduct, ProductService};
use storefront::server::{create_router, AppContext};
use storefront_db::pool::{init_memory_pool, DbPool};

pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake image data";

/// Test harness wrapping a fully-constructed [`AppContext`] backed by an
/// in-memory database and a throwaway upload directory.
pub struct TestHarness {
    pub ctx: AppContext,
    pub db: DbPool,
    pub upload_dir: PathBuf,
    /// Holds the upload directory and its staging sibling.
    _root: TempDir,
}

impl TestHarness {
    /// Create a new harness with default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a new harness with a custom configuration. The upload
    /// directory is always replaced by a fresh temporary one.
    pub fn with_config(mut config: Config) -> Self {
        let root = TempDir::new().expect("failed to create temp dir");
        let upload_dir = root.path().join("uploads");
        config.storage.upload_dir = upload_dir.clone();

        let db = init_memory_pool().expect("failed to create in-memory pool");
        let store = ImageStore::open(&config.storage).expect("failed to open image store");
        let products = ProductService::new(db.clone(), store);
        let ctx = AppContext::new(config, products);

        Self {
            ctx,
            db,
            upload_dir,
            _root: root,
        }
    }

    pub fn service(&self) -> &ProductService {
        &self.ctx.products
    }

    pub fn app(&self) -> Router {
        create_router(self.ctx.clone())
    }

    /// Send one request through a fresh router.
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self.app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    /// Send one request and parse the response body as JSON.
    pub async fn send_json(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let (status, bytes) = self.send(request).await;
        let json = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| panic!("non-JSON body: {}", String::from_utf8_lossy(&bytes)));
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        self.send_json(empty_request(Method::GET, uri)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        self.send_json(empty_request(Method::DELETE, uri)).await
    }

    /// Create a product with one PNG image directly through the service.
    pub fn seed_product(&self, name: &str) -> storefront_common::ProductId {
        let product = NewProduct::new(name, format!("{name} description"), 9.99).unwrap();
        self.service()
            .add_product(product, &[png("seed.png")])
            .unwrap()
            .product_id
    }

    /// Number of files currently in the upload directory.
    pub fn stored_files(&self) -> usize {
        std::fs::read_dir(&self.upload_dir).unwrap().count()
    }
}

pub fn png(name: &str) -> ImageUpload {
    ImageUpload::new(name, PNG_BYTES)
}

pub fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Builder for `multipart/form-data` request bodies.
pub struct MultipartForm {
    boundary: String,
    body: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self {
            boundary: "storefront-test-boundary".to_string(),
            body: Vec::new(),
        }
    }

    /// Form with the three product text fields filled in.
    pub fn product(name: &str, description: &str, price: &str) -> Self {
        Self::new()
            .text("pname", name)
            .text("p_desc", description)
            .text("price", price)
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n",
                self.boundary
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, filename: &str, content: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                self.boundary
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(content);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn image(self, filename: &str) -> Self {
        self.file("images", filename, PNG_BYTES)
    }

    pub fn into_request(mut self, method: Method, uri: &str) -> Request<Body> {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        Request::builder()
            .method(method)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", self.boundary),
            )
            .body(Body::from(self.body))
            .unwrap()
    }
}
