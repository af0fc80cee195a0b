//! Transactional unit of work over products and images.
//!
//! A [`UnitOfWork`] wraps one SQLite transaction. Every mutation made through
//! it becomes visible to other connections only on [`UnitOfWork::commit`];
//! dropping it without committing rolls everything back.

use rusqlite::{Connection, Transaction, TransactionBehavior};
use storefront_common::{Error, ImageId, ProductId, Result};

use crate::models::{Image, Product, ProductWithImages};
use crate::queries::{images, products};

/// One transaction's worth of repository operations.
pub struct UnitOfWork<'conn> {
    tx: Transaction<'conn>,
}

impl<'conn> UnitOfWork<'conn> {
    /// Begin a write transaction.
    ///
    /// The write lock is taken up front (`BEGIN IMMEDIATE`) so a later
    /// insert cannot fail with a lock upgrade conflict halfway through.
    pub fn begin(conn: &'conn Connection) -> Result<Self> {
        Self::begin_with(conn, TransactionBehavior::Immediate)
    }

    /// Begin a read-only transaction for a consistent snapshot.
    pub fn begin_read(conn: &'conn Connection) -> Result<Self> {
        Self::begin_with(conn, TransactionBehavior::Deferred)
    }

    fn begin_with(conn: &'conn Connection, behavior: TransactionBehavior) -> Result<Self> {
        let tx = Transaction::new_unchecked(conn, behavior).map_err(Error::database)?;
        Ok(Self { tx })
    }

    /// Insert a product; its generated ID is usable for image rows right away.
    pub fn insert_product(&self, name: &str, description: &str, price: f64) -> Result<Product> {
        products::insert_product(&self.tx, name, description, price)
    }

    /// Attach an image reference to a product.
    pub fn insert_image(&self, product_id: ProductId, image_ref: &str) -> Result<Image> {
        images::insert_image(&self.tx, product_id, image_ref)
    }

    /// Fetch a product row without its images, or `None` if it does not exist.
    pub fn get_product(&self, id: ProductId) -> Result<Option<Product>> {
        products::get_product(&self.tx, id)
    }

    /// Fetch a product with its images, or `None` if it does not exist.
    pub fn find_product(&self, id: ProductId) -> Result<Option<ProductWithImages>> {
        products::get_product_with_images(&self.tx, id)
    }

    /// Fetch the images owned by a product.
    pub fn images_for_product(&self, product_id: ProductId) -> Result<Vec<Image>> {
        images::list_images_for_product(&self.tx, product_id)
    }

    /// List every product with its images.
    pub fn list_products(&self) -> Result<Vec<ProductWithImages>> {
        products::list_products_with_images(&self.tx)
    }

    /// Overwrite a product's name, description, and price.
    pub fn update_product(
        &self,
        id: ProductId,
        name: &str,
        description: &str,
        price: f64,
    ) -> Result<bool> {
        products::update_product(&self.tx, id, name, description, price)
    }

    /// Delete a product row.
    pub fn delete_product(&self, id: ProductId) -> Result<bool> {
        products::delete_product(&self.tx, id)
    }

    /// Delete a single image row.
    pub fn delete_image(&self, id: ImageId) -> Result<bool> {
        images::delete_image(&self.tx, id)
    }

    /// Delete all image rows of a product.
    pub fn delete_images_for_product(&self, product_id: ProductId) -> Result<usize> {
        images::delete_images_for_product(&self.tx, product_id)
    }

    /// Make every change of this unit durable and visible.
    pub fn commit(self) -> Result<()> {
        self.tx.commit().map_err(Error::database)
    }

    /// Discard every change of this unit.
    pub fn rollback(self) -> Result<()> {
        self.tx.rollback().map_err(Error::database)
    }
}
