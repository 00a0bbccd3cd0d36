//! REST API module.
//!
//! Contains all API routes and handlers serving the single-page editor.

mod categories;
mod document;
mod posts;

pub use categories::*;
pub use document::*;
pub use posts::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Success response envelope. `revision` is the last-known blob sha of the
/// remote document, null before the first successful load of an existing
/// file.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    pub revision: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T, revision: Option<String>) -> Self {
        Self {
            success: true,
            data,
            revision,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, crate::errors::AppErrorWithRevision>;

/// Create a successful API response.
pub fn success<T: Serialize>(data: T, revision: Option<String>) -> ApiResult<T> {
    Ok(ApiResponse::new(data, revision))
}

/// Create an error API response.
pub fn error<T: Serialize>(err: crate::errors::AppError, revision: Option<String>) -> ApiResult<T> {
    Err(crate::errors::AppErrorWithRevision {
        error: err,
        revision,
    })
}
