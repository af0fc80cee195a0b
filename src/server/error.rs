//! Error-to-HTTP response conversion.
//!
//! Route handlers return `Result<T, AppError>`; any
//! [`storefront_common::Error`] converts into it with `?`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use storefront_common::Error;

/// Message shown to clients for every server-side failure.
const GENERIC_FAILURE: &str = "Internal server error";

/// Wrapper so we can implement `IntoResponse` for an external type.
#[derive(Debug)]
pub struct AppError {
    inner: Error,
}

impl AppError {
    pub fn new(inner: Error) -> Self {
        Self { inner }
    }
}

impl From<Error> for AppError {
    fn from(e: Error) -> Self {
        Self::new(e)
    }
}

impl From<axum::extract::multipart::MultipartError> for AppError {
    fn from(e: axum::extract::multipart::MultipartError) -> Self {
        Self::new(Error::invalid_input(format!("Malformed form data: {e}")))
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(e: tokio::task::JoinError) -> Self {
        Self::new(Error::internal_from("Request worker failed", e))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.inner.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let detail = if status.is_server_error() {
            tracing::error!(
                status = %status,
                error = ?self.inner,
                "Server error in API handler"
            );
            match &self.inner {
                Error::Internal { message, .. } => message.clone(),
                _ => GENERIC_FAILURE.to_string(),
            }
        } else {
            self.inner.to_string()
        };

        let body = json!({
            "detail": detail,
            "code": self.inner.code(),
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn invalid_input_produces_400() {
        let response = AppError::new(Error::invalid_input("Price must be a valid number"))
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["code"], "invalid_input");
        assert_eq!(body["detail"], "Invalid input: Price must be a valid number");
    }

    #[tokio::test]
    async fn not_found_produces_404() {
        let response = AppError::new(Error::not_found("product", 3)).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["code"], "not_found");
    }

    #[tokio::test]
    async fn internal_hides_cause() {
        let cause = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let response =
            AppError::new(Error::internal_from("Failed to create product", cause)).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["detail"], "Failed to create product");
        assert!(!body.to_string().contains("disk on fire"));
    }

    #[tokio::test]
    async fn raw_database_error_is_generic() {
        let response = AppError::new(Error::database("no such table: images")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["detail"], GENERIC_FAILURE);
    }
}
