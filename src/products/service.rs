//! Product use cases.
//!
//! Every write runs inside one [`UnitOfWork`]. The product row and its image
//! rows commit together or not at all; files written by a call that ends up
//! rolled back are removed again on a best-effort basis.

use storefront_common::{Error, ProductId, Result};
use storefront_db::pool::{get_conn, DbPool};
use storefront_db::session::UnitOfWork;

use super::types::{
    NewProduct, ProductDetails, ProductView, RemovedProduct, SavedProduct, SkippedImage,
};
use crate::images::{ImageStore, ImageUpload};

const ENTITY: &str = "product";

/// Images stored and skipped while processing one batch of uploads.
#[derive(Debug, Default)]
struct ImageBatch {
    stored: Vec<String>,
    skipped: Vec<SkippedImage>,
}

/// Orchestrates product persistence and image storage.
#[derive(Debug, Clone)]
pub struct ProductService {
    pool: DbPool,
    store: ImageStore,
}

impl ProductService {
    pub fn new(pool: DbPool, store: ImageStore) -> Self {
        Self { pool, store }
    }

    pub fn store(&self) -> &ImageStore {
        &self.store
    }

    /// Create a product with at least one image.
    ///
    /// Uploads that fail validation or cannot be written are skipped. If none
    /// survive, the call fails with [`Error::InvalidInput`] and no product row
    /// is left behind.
    pub fn add_product(&self, product: NewProduct, images: &[ImageUpload]) -> Result<SavedProduct> {
        if images.is_empty() {
            return Err(Error::invalid_input("At least one image is required"));
        }

        let (saved, _) = self.run_write("Failed to create product", |uow, written| {
            let row = uow.insert_product(product.name(), product.description(), product.price())?;
            let batch = self.store_images(uow, row.id, images, written)?;
            if batch.stored.is_empty() {
                return Err(Error::invalid_input("No valid images were provided"));
            }
            Ok((saved_product(row.id, &product, batch), Vec::new()))
        })?;

        tracing::info!(
            product_id = %saved.product_id,
            images = saved.image_urls.len(),
            skipped = saved.skipped.len(),
            "Created product"
        );
        Ok(saved)
    }

    /// Overwrite a product's fields, optionally replacing all of its images.
    ///
    /// With `images` set, the old image rows are dropped and the new batch is
    /// stored under the same best-effort policy as [`Self::add_product`]. The
    /// replaced files are deleted only after the change has committed.
    pub fn update_product(
        &self,
        id: ProductId,
        product: NewProduct,
        images: Option<&[ImageUpload]>,
    ) -> Result<SavedProduct> {
        let (saved, replaced) = self.run_write("Failed to update product", |uow, written| {
            if uow.get_product(id)?.is_none() {
                return Err(Error::not_found(ENTITY, id));
            }
            uow.update_product(id, product.name(), product.description(), product.price())?;

            let Some(images) = images else {
                return Ok((saved_product(id, &product, ImageBatch::default()), Vec::new()));
            };

            let previous = uow.images_for_product(id)?;
            uow.delete_images_for_product(id)?;
            let batch = self.store_images(uow, id, images, written)?;
            let replaced = previous.into_iter().map(|image| image.image_ref).collect();
            Ok((saved_product(id, &product, batch), replaced))
        })?;

        for reference in &replaced {
            self.discard_file(reference);
        }

        tracing::info!(
            product_id = %id,
            images = saved.image_urls.len(),
            replaced = replaced.len(),
            "Updated product"
        );
        Ok(saved)
    }

    /// Delete a product, its image rows, and their files.
    ///
    /// Files are deleted only once the rows are gone for good. A file that
    /// cannot be deleted is logged and does not fail the removal.
    pub fn remove_product(&self, id: ProductId) -> Result<RemovedProduct> {
        let (removed, orphaned) = self.run_write("Failed to delete product", |uow, _| {
            if uow.get_product(id)?.is_none() {
                return Err(Error::not_found(ENTITY, id));
            }
            let images = uow.images_for_product(id)?;
            for image in &images {
                uow.delete_image(image.id)?;
            }
            uow.delete_product(id)?;
            let removed = RemovedProduct {
                product_id: id,
                images_removed: images.len(),
            };
            let orphaned = images.into_iter().map(|image| image.image_ref).collect();
            Ok((removed, orphaned))
        })?;

        for reference in &orphaned {
            self.discard_file(reference);
        }

        tracing::info!(product_id = %id, images = removed.images_removed, "Removed product");
        Ok(removed)
    }

    /// Fetch one product with its image references.
    pub fn retrieve_product(&self, id: ProductId) -> Result<ProductView> {
        self.run_read("Failed to retrieve product", |uow| {
            uow.find_product(id)?
                .map(ProductView::from)
                .ok_or_else(|| Error::not_found(ENTITY, id))
        })
    }

    /// List every product in ascending ID order.
    pub fn list_products(&self) -> Result<Vec<ProductView>> {
        self.run_read("Failed to fetch products", |uow| {
            Ok(uow
                .list_products()?
                .into_iter()
                .map(ProductView::from)
                .collect())
        })
    }

    /// Store each upload and record it against `product_id`.
    ///
    /// Store failures are folded into the batch as skips. A failed row insert
    /// aborts the whole batch. Every file written is pushed to `written` before
    /// its row is inserted so the caller can clean up after a rollback.
    fn store_images(
        &self,
        uow: &UnitOfWork<'_>,
        product_id: ProductId,
        images: &[ImageUpload],
        written: &mut Vec<String>,
    ) -> Result<ImageBatch> {
        images.iter().try_fold(ImageBatch::default(), |mut batch, upload| {
            match self.store.store(upload) {
                Ok(reference) => {
                    written.push(reference.clone());
                    uow.insert_image(product_id, &reference)?;
                    batch.stored.push(reference);
                }
                Err(err) => {
                    tracing::warn!(
                        product_id = %product_id,
                        filename = %upload.filename,
                        error = %err,
                        "Skipping image"
                    );
                    batch.skipped.push(SkippedImage {
                        filename: upload.filename.clone(),
                        reason: err.to_string(),
                    });
                }
            }
            Ok(batch)
        })
    }

    /// Run `work` in a write transaction and commit it.
    ///
    /// On failure the transaction is rolled back, files listed in `written`
    /// are removed, and anything that is not a client error is reported as
    /// [`Error::Internal`] with `failure` as its message.
    fn run_write<T, F>(&self, failure: &'static str, work: F) -> Result<(T, Vec<String>)>
    where
        F: FnOnce(&UnitOfWork<'_>, &mut Vec<String>) -> Result<(T, Vec<String>)>,
    {
        let conn = get_conn(&self.pool).map_err(|e| classify(failure, e))?;
        let uow = UnitOfWork::begin(&conn).map_err(|e| classify(failure, e))?;
        let mut written = Vec::new();

        match work(&uow, &mut written) {
            Ok(value) => match uow.commit() {
                Ok(()) => Ok(value),
                Err(err) => {
                    self.discard_files(&written);
                    Err(classify(failure, err))
                }
            },
            Err(err) => {
                if let Err(rollback_err) = uow.rollback() {
                    tracing::warn!(error = %rollback_err, "Rollback failed");
                }
                self.discard_files(&written);
                Err(classify(failure, err))
            }
        }
    }

    /// Run `work` against a read snapshot.
    fn run_read<T, F>(&self, failure: &'static str, work: F) -> Result<T>
    where
        F: FnOnce(&UnitOfWork<'_>) -> Result<T>,
    {
        let conn = get_conn(&self.pool).map_err(|e| classify(failure, e))?;
        let uow = UnitOfWork::begin_read(&conn).map_err(|e| classify(failure, e))?;
        work(&uow).map_err(|e| classify(failure, e))
    }

    fn discard_files(&self, references: &[String]) {
        if !references.is_empty() {
            tracing::debug!(files = references.len(), "Discarding files of a failed write");
        }
        for reference in references {
            self.discard_file(reference);
        }
    }

    fn discard_file(&self, reference: &str) {
        match self.store.delete(reference) {
            Ok(true) => {}
            Ok(false) => tracing::debug!(reference, "Image file already gone"),
            Err(err) => tracing::warn!(reference, error = %err, "Failed to delete image file"),
        }
    }
}

fn saved_product(product_id: ProductId, product: &NewProduct, batch: ImageBatch) -> SavedProduct {
    SavedProduct {
        product_id,
        image_urls: batch.stored,
        product_details: ProductDetails::from(product),
        skipped: batch.skipped,
    }
}

/// Pass client errors through; wrap everything else as an internal failure.
fn classify(failure: &'static str, err: Error) -> Error {
    if err.is_client_error() {
        err
    } else {
        tracing::error!(error = %err, "{failure}");
        Error::internal_from(failure, err)
    }
}
