//! Image database queries.
//!
//! This module provides insert, list, and delete operations for the image
//! references attached to products.

use rusqlite::Connection;
use storefront_common::{Error, ImageId, ProductId, Result};

use crate::models::{Image, IMAGE_COLUMNS};

/// Insert a new image record for a product.
///
/// Fails with a database error when the product does not exist (foreign key).
pub fn insert_image(conn: &Connection, product_id: ProductId, image_ref: &str) -> Result<Image> {
    conn.execute(
        "INSERT INTO images (image_ref, product_id) VALUES (:image_ref, :product_id)",
        rusqlite::named_params! {
            ":image_ref": image_ref,
            ":product_id": product_id.get(),
        },
    )
    .map_err(Error::database)?;

    Ok(Image {
        id: ImageId::from(conn.last_insert_rowid()),
        image_ref: image_ref.to_string(),
        product_id,
    })
}

/// List the images of a product, ordered by ID.
pub fn list_images_for_product(conn: &Connection, product_id: ProductId) -> Result<Vec<Image>> {
    let q = format!("SELECT {IMAGE_COLUMNS} FROM images WHERE product_id = ?1 ORDER BY id");
    let mut stmt = conn.prepare(&q).map_err(Error::database)?;
    let rows = stmt
        .query_map([product_id.get()], Image::from_row)
        .map_err(Error::database)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(Error::database)?;
    Ok(rows)
}

/// List every image, ordered by ID.
pub fn list_all_images(conn: &Connection) -> Result<Vec<Image>> {
    let q = format!("SELECT {IMAGE_COLUMNS} FROM images ORDER BY id");
    let mut stmt = conn.prepare(&q).map_err(Error::database)?;
    let rows = stmt
        .query_map([], Image::from_row)
        .map_err(Error::database)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(Error::database)?;
    Ok(rows)
}

/// Delete an image by ID.
pub fn delete_image(conn: &Connection, id: ImageId) -> Result<bool> {
    let n = conn
        .execute("DELETE FROM images WHERE id = ?1", [id.get()])
        .map_err(Error::database)?;
    Ok(n > 0)
}

/// Delete every image of a product, returning how many rows were removed.
pub fn delete_images_for_product(conn: &Connection, product_id: ProductId) -> Result<usize> {
    conn.execute("DELETE FROM images WHERE product_id = ?1", [product_id.get()])
        .map_err(Error::database)
}

/// Count all images.
pub fn count_images(conn: &Connection) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM images", [], |row| row.get(0))
        .map_err(Error::database)
}
