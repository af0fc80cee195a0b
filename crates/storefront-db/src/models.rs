//! Rust models matching the database schema.

use serde::{Deserialize, Serialize};
use storefront_common::{ImageId, ProductId};

/// Column list for `products`, in [`Product::from_row`] order.
pub(crate) const PRODUCT_COLUMNS: &str = "id, name, description, price";

/// Column list for `images`, in [`Image::from_row`] order.
pub(crate) const IMAGE_COLUMNS: &str = "id, image_ref, product_id";

/// Product listing row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: f64,
}

impl Product {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: ProductId::from(row.get::<_, i64>(0)?),
            name: row.get(1)?,
            description: row.get(2)?,
            price: row.get(3)?,
        })
    }
}

/// Stored image row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Image {
    pub id: ImageId,
    pub image_ref: String,
    pub product_id: ProductId,
}

impl Image {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: ImageId::from(row.get::<_, i64>(0)?),
            image_ref: row.get(1)?,
            product_id: ProductId::from(row.get::<_, i64>(2)?),
        })
    }
}

/// A product together with the images it owns, ordered by image id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductWithImages {
    #[serde(flatten)]
    pub product: Product,
    pub images: Vec<Image>,
}

impl ProductWithImages {
    /// References of the owned images, in storage order.
    pub fn image_refs(&self) -> Vec<String> {
        self.images.iter().map(|img| img.image_ref.clone()).collect()
    }
}
