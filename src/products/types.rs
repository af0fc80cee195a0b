use serde::Serialize;
use storefront_common::{Error, ProductId, Result};
use storefront_db::models::ProductWithImages;

/// Parse a price as submitted by a client.
///
/// Accepts any finite, non-negative decimal number.
pub fn parse_price(raw: &str) -> Result<f64> {
    let price: f64 = raw
        .trim()
        .parse()
        .map_err(|_| Error::invalid_input("Price must be a valid number"))?;
    check_price(price)
}

fn check_price(price: f64) -> Result<f64> {
    if !price.is_finite() {
        return Err(Error::invalid_input("Price must be a valid number"));
    }
    if price < 0.0 {
        return Err(Error::invalid_input("Price must not be negative"));
    }
    Ok(price)
}

/// Validated product fields.
///
/// Built once at the request boundary and passed by value into the service,
/// so the service never sees an empty name or a bad price.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    name: String,
    description: String,
    price: f64,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, description: impl Into<String>, price: f64) -> Result<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(Error::invalid_input("Product name must not be empty"));
        }
        Ok(Self {
            name,
            description: description.into(),
            price: check_price(price)?,
        })
    }

    /// Validate raw form fields, parsing the price from text.
    pub fn parse(name: &str, description: &str, price: &str) -> Result<Self> {
        Self::new(name, description, parse_price(price)?)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn price(&self) -> f64 {
        self.price
    }
}

/// Echo of the stored product fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductDetails {
    #[serde(rename = "pname")]
    pub name: String,
    #[serde(rename = "p_desc")]
    pub description: String,
    pub price: f64,
}

impl From<&NewProduct> for ProductDetails {
    fn from(product: &NewProduct) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
        }
    }
}

/// An upload that was skipped under the best-effort policy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedImage {
    pub filename: String,
    pub reason: String,
}

/// Outcome of a successful add or update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavedProduct {
    pub product_id: ProductId,
    /// References of the images stored by this call, in upload order.
    pub image_urls: Vec<String>,
    pub product_details: ProductDetails,
    #[serde(rename = "skipped_images", skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedImage>,
}

/// Outcome of a successful remove.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemovedProduct {
    pub product_id: ProductId,
    pub images_removed: usize,
}

/// Read model of a product with its image references.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductView {
    pub id: ProductId,
    #[serde(rename = "pname")]
    pub name: String,
    #[serde(rename = "p_desc")]
    pub description: String,
    pub price: f64,
    pub images: Vec<String>,
}

impl From<ProductWithImages> for ProductView {
    fn from(found: ProductWithImages) -> Self {
        let images = found.image_refs();
        let product = found.product;
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            images,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("9.99").unwrap(), 9.99);
        assert_eq!(parse_price(" 0 ").unwrap(), 0.0);
        assert_eq!(parse_price("12").unwrap(), 12.0);
    }

    #[test]
    fn test_parse_price_rejects_non_numeric() {
        for raw in ["", "abc", "9,99", "NaN", "inf"] {
            let err = parse_price(raw).unwrap_err();
            assert_matches!(err, Error::InvalidInput(msg) if msg == "Price must be a valid number");
        }
    }

    #[test]
    fn test_parse_price_rejects_negative() {
        let err = parse_price("-1").unwrap_err();
        assert_matches!(err, Error::InvalidInput(msg) if msg == "Price must not be negative");
    }

    #[test]
    fn test_new_product_trims_name() {
        let product = NewProduct::new("  Mug ", "Ceramic mug", 9.99).unwrap();
        assert_eq!(product.name(), "Mug");
        assert_eq!(product.description(), "Ceramic mug");
        assert_eq!(product.price(), 9.99);
    }

    #[test]
    fn test_new_product_rejects_blank_name() {
        assert_matches!(NewProduct::new("   ", "", 1.0), Err(Error::InvalidInput(_)));
    }

    #[test]
    fn test_parse_checks_every_field() {
        assert!(NewProduct::parse("Mug", "", "3.50").is_ok());
        assert_matches!(NewProduct::parse("Mug", "", "three"), Err(Error::InvalidInput(_)));
        assert_matches!(NewProduct::parse("", "", "3.50"), Err(Error::InvalidInput(_)));
    }

    #[test]
    fn test_details_serialize_with_form_names() {
        let product = NewProduct::new("Mug", "Ceramic mug", 9.99).unwrap();
        let json = serde_json::to_value(ProductDetails::from(&product)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"pname": "Mug", "p_desc": "Ceramic mug", "price": 9.99})
        );
    }

    #[test]
    fn test_saved_product_omits_empty_skips() {
        let saved = SavedProduct {
            product_id: ProductId::from(1),
            image_urls: vec!["http://localhost:8000/static/1_a.png".to_string()],
            product_details: ProductDetails::from(&NewProduct::new("Mug", "", 1.0).unwrap()),
            skipped: Vec::new(),
        };
        let json = serde_json::to_value(&saved).unwrap();
        assert!(json.get("skipped_images").is_none());
        assert_eq!(json["product_id"], 1);
    }
}
