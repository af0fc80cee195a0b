//! Product API routes.
//!
//! Add and update take `multipart/form-data` with the fields `pname`,
//! `p_desc`, `price` and any number of `images` files.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Serialize;
use storefront_common::{Error, ProductId};

use super::error::AppError;
use super::AppContext;
use crate::images::ImageUpload;
use crate::products::{NewProduct, ProductView, SavedProduct};

/// Create product routes, nested under `/product`.
pub fn product_routes() -> Router<AppContext> {
    Router::new()
        .route("/addProduct", post(add_product))
        .route("/getProducts", get(list_products))
        .route("/getProduct/:id", get(get_product))
        .route("/updateProduct/:id", put(update_product))
        .route("/removeProduct/:id", delete(remove_product))
}

// ============================================================================
// Request types
// ============================================================================

/// Raw product form as read from a multipart body.
#[derive(Debug, Default)]
struct ProductForm {
    name: Option<String>,
    description: Option<String>,
    price: Option<String>,
    /// `None` when no `images` field was sent at all.
    images: Option<Vec<ImageUpload>>,
}

impl ProductForm {
    async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or("").to_string();
            match name.as_str() {
                "pname" => form.name = Some(field.text().await?),
                "p_desc" => form.description = Some(field.text().await?),
                "price" => form.price = Some(field.text().await?),
                "images" => {
                    let filename = field.file_name().unwrap_or("").to_string();
                    let content = field.bytes().await?;
                    let images = form.images.get_or_insert_with(Vec::new);
                    // An unselected file input still sends an empty part.
                    if filename.is_empty() && content.is_empty() {
                        continue;
                    }
                    images.push(ImageUpload::new(filename, content));
                }
                _ => {}
            }
        }

        Ok(form)
    }

    fn into_parts(self) -> Result<(NewProduct, Option<Vec<ImageUpload>>), Error> {
        let name = required(self.name, "pname")?;
        let description = required(self.description, "p_desc")?;
        let price = required(self.price, "price")?;
        let product = NewProduct::parse(&name, &description, &price)?;
        Ok((product, self.images))
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, Error> {
    value.ok_or_else(|| Error::invalid_input(format!("Missing form field: {field}")))
}

// ============================================================================
// Response types
// ============================================================================

#[derive(Debug, Serialize)]
struct ProductWriteResponse {
    success: bool,
    message: &'static str,
    #[serde(flatten)]
    saved: SavedProduct,
}

impl ProductWriteResponse {
    fn new(message: &'static str, saved: SavedProduct) -> Self {
        Self {
            success: true,
            message,
            saved,
        }
    }
}

#[derive(Debug, Serialize)]
struct ProductListResponse {
    products: Vec<ProductView>,
}

#[derive(Debug, Serialize)]
struct ProductResponse {
    product: ProductDetail,
}

#[derive(Debug, Serialize)]
struct ProductDetail {
    id: ProductId,
    images: Vec<ImageUrl>,
    pname: String,
    p_desc: String,
    price: f64,
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    image_url: String,
}

impl From<ProductView> for ProductDetail {
    fn from(view: ProductView) -> Self {
        Self {
            id: view.id,
            images: view
                .images
                .into_iter()
                .map(|image_url| ImageUrl { image_url })
                .collect(),
            pname: view.name,
            p_desc: view.description,
            price: view.price,
        }
    }
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    message: &'static str,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /product/addProduct
async fn add_product(
    State(ctx): State<AppContext>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ProductWriteResponse>), AppError> {
    let (product, images) = ProductForm::read(multipart).await?.into_parts()?;
    let images = images.unwrap_or_default();

    let service = ctx.products.clone();
    let saved = tokio::task::spawn_blocking(move || service.add_product(product, &images)).await??;

    Ok((
        StatusCode::CREATED,
        Json(ProductWriteResponse::new("Product created successfully", saved)),
    ))
}

/// GET /product/getProducts
async fn list_products(
    State(ctx): State<AppContext>,
) -> Result<Json<ProductListResponse>, AppError> {
    let service = ctx.products.clone();
    let products = tokio::task::spawn_blocking(move || service.list_products()).await??;
    Ok(Json(ProductListResponse { products }))
}

/// GET /product/getProduct/:id
async fn get_product(
    State(ctx): State<AppContext>,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductResponse>, AppError> {
    let service = ctx.products.clone();
    let view = tokio::task::spawn_blocking(move || service.retrieve_product(id)).await??;
    Ok(Json(ProductResponse {
        product: view.into(),
    }))
}

/// PUT /product/updateProduct/:id
///
/// Sending no `images` field keeps the current images; sending any, even
/// an empty file input, replaces them.
async fn update_product(
    State(ctx): State<AppContext>,
    Path(id): Path<ProductId>,
    multipart: Multipart,
) -> Result<Json<ProductWriteResponse>, AppError> {
    let (product, images) = ProductForm::read(multipart).await?.into_parts()?;

    let service = ctx.products.clone();
    let saved = tokio::task::spawn_blocking(move || {
        service.update_product(id, product, images.as_deref())
    })
    .await??;

    Ok(Json(ProductWriteResponse::new(
        "Product updated successfully",
        saved,
    )))
}

/// DELETE /product/removeProduct/:id
async fn remove_product(
    State(ctx): State<AppContext>,
    Path(id): Path<ProductId>,
) -> Result<Json<MessageResponse>, AppError> {
    let service = ctx.products.clone();
    tokio::task::spawn_blocking(move || service.remove_product(id)).await??;
    Ok(Json(MessageResponse {
        message: "Product and associated images deleted successfully",
    }))
}
