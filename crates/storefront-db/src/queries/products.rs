//! Product database queries.
//!
//! This module provides CRUD operations for product listings. Every function
//! takes a plain `&Connection`, so it works the same on a pooled connection
//! or inside a transaction.

use std::collections::HashMap;

use rusqlite::{Connection, OptionalExtension};
use storefront_common::{Error, ProductId, Result};

use crate::models::{Product, ProductWithImages, PRODUCT_COLUMNS};
use crate::queries::images;

/// Insert a new product and return it with its generated ID.
///
/// # Arguments
///
/// * `conn` - Database connection
/// * `name` - Product name (must be non-empty)
/// * `description` - Free-form description
/// * `price` - Non-negative price
pub fn insert_product(
    conn: &Connection,
    name: &str,
    description: &str,
    price: f64,
) -> Result<Product> {
    conn.execute(
        "INSERT INTO products (name, description, price)
         VALUES (:name, :description, :price)",
        rusqlite::named_params! {
            ":name": name,
            ":description": description,
            ":price": price,
        },
    )
    .map_err(Error::database)?;

    Ok(Product {
        id: ProductId::from(conn.last_insert_rowid()),
        name: name.to_string(),
        description: description.to_string(),
        price,
    })
}

/// Get a product by ID.
///
/// # Returns
///
/// * `Ok(Some(Product))` - The product if found
/// * `Ok(None)` - If the product does not exist
/// * `Err(Error)` - If a database error occurs
pub fn get_product(conn: &Connection, id: ProductId) -> Result<Option<Product>> {
    let q = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");
    conn.query_row(&q, [id.get()], Product::from_row)
        .optional()
        .map_err(Error::database)
}

/// Get a product by ID together with its images.
pub fn get_product_with_images(
    conn: &Connection,
    id: ProductId,
) -> Result<Option<ProductWithImages>> {
    let Some(product) = get_product(conn, id)? else {
        return Ok(None);
    };
    let images = images::list_images_for_product(conn, id)?;
    Ok(Some(ProductWithImages { product, images }))
}

/// List all products, ordered by ID.
pub fn list_products(conn: &Connection) -> Result<Vec<Product>> {
    let q = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id");
    let mut stmt = conn.prepare(&q).map_err(Error::database)?;
    let rows = stmt
        .query_map([], Product::from_row)
        .map_err(Error::database)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(Error::database)?;
    Ok(rows)
}

/// List all products with their images, ordered by product ID.
///
/// Runs two queries (products, then all images) and groups images in memory
/// instead of issuing one image query per product.
pub fn list_products_with_images(conn: &Connection) -> Result<Vec<ProductWithImages>> {
    let products = list_products(conn)?;

    let mut by_product: HashMap<ProductId, Vec<_>> = HashMap::new();
    for image in images::list_all_images(conn)? {
        by_product.entry(image.product_id).or_default().push(image);
    }

    Ok(products
        .into_iter()
        .map(|product| {
            let images = by_product.remove(&product.id).unwrap_or_default();
            ProductWithImages { product, images }
        })
        .collect())
}

/// Overwrite the editable fields of a product.
///
/// Returns `false` when no product has the given ID.
pub fn update_product(
    conn: &Connection,
    id: ProductId,
    name: &str,
    description: &str,
    price: f64,
) -> Result<bool> {
    let n = conn
        .execute(
            "UPDATE products SET name = :name, description = :description, price = :price
             WHERE id = :id",
            rusqlite::named_params! {
                ":id": id.get(),
                ":name": name,
                ":description": description,
                ":price": price,
            },
        )
        .map_err(Error::database)?;
    Ok(n > 0)
}

/// Delete a product by ID.
///
/// Image rows are removed by the `ON DELETE CASCADE` foreign key.
pub fn delete_product(conn: &Connection, id: ProductId) -> Result<bool> {
    let n = conn
        .execute("DELETE FROM products WHERE id = ?1", [id.get()])
        .map_err(Error::database)?;
    Ok(n > 0)
}

/// Count all products.
pub fn count_products(conn: &Connection) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))
        .map_err(Error::database)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{get_conn, init_memory_pool, PooledConnection};

    fn setup() -> PooledConnection {
        let pool = init_memory_pool().unwrap();
        get_conn(&pool).unwrap()
    }

    #[test]
    fn test_insert_and_get() {
        let conn = setup();
        let product = insert_product(&conn, "Mug", "Ceramic mug", 9.99).unwrap();
        assert!(product.id.get() > 0);

        let fetched = get_product(&conn, product.id).unwrap().unwrap();
        assert_eq!(fetched, product);
    }

    #[test]
    fn test_get_missing_returns_none() {
        let conn = setup();
        assert!(get_product(&conn, ProductId::from(404)).unwrap().is_none());
        assert!(get_product_with_images(&conn, ProductId::from(404))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_ids_are_not_reused() {
        let conn = setup();
        let first = insert_product(&conn, "A", "", 1.0).unwrap();
        assert!(delete_product(&conn, first.id).unwrap());
        let second = insert_product(&conn, "B", "", 1.0).unwrap();
        assert!(second.id > first.id);
    }

    #[test]
    fn test_list_with_images_groups_by_product() {
        let conn = setup();
        let mug = insert_product(&conn, "Mug", "", 9.99).unwrap();
        let cup = insert_product(&conn, "Cup", "", 4.0).unwrap();
        let plate = insert_product(&conn, "Plate", "", 12.5).unwrap();
        images::insert_image(&conn, mug.id, "/static/mug1.png").unwrap();
        images::insert_image(&conn, plate.id, "/static/plate.png").unwrap();
        images::insert_image(&conn, mug.id, "/static/mug2.png").unwrap();

        let listed = list_products_with_images(&conn).unwrap();
        assert_eq!(listed.len(), 3);
        assert_eq!(listed[0].product.id, mug.id);
        assert_eq!(
            listed[0].image_refs(),
            vec!["/static/mug1.png", "/static/mug2.png"]
        );
        assert_eq!(listed[1].product.id, cup.id);
        assert!(listed[1].images.is_empty());
        assert_eq!(listed[2].image_refs(), vec!["/static/plate.png"]);
    }

    #[test]
    fn test_list_empty() {
        let conn = setup();
        assert!(list_products(&conn).unwrap().is_empty());
        assert!(list_products_with_images(&conn).unwrap().is_empty());
        assert_eq!(count_products(&conn).unwrap(), 0);
    }

    #[test]
    fn test_update() {
        let conn = setup();
        let product = insert_product(&conn, "Mug", "Ceramic mug", 9.99).unwrap();

        assert!(update_product(&conn, product.id, "Big Mug", "Bigger", 12.0).unwrap());
        let fetched = get_product(&conn, product.id).unwrap().unwrap();
        assert_eq!(fetched.name, "Big Mug");
        assert_eq!(fetched.description, "Bigger");
        assert_eq!(fetched.price, 12.0);

        assert!(!update_product(&conn, ProductId::from(999), "X", "", 1.0).unwrap());
    }

    #[test]
    fn test_delete_cascades_to_images() {
        let conn = setup();
        let product = insert_product(&conn, "Mug", "", 9.99).unwrap();
        images::insert_image(&conn, product.id, "/static/mug.png").unwrap();

        assert!(delete_product(&conn, product.id).unwrap());
        assert!(!delete_product(&conn, product.id).unwrap());
        assert!(images::list_images_for_product(&conn, product.id)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_rejects_negative_price() {
        let conn = setup();
        let err = insert_product(&conn, "Mug", "", -0.5).unwrap_err();
        assert!(matches!(err, Error::Database { .. }));
    }
}
