use axum::{
    http::Uri,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;
use crate::middleware::is_api_path;

/// Fallback for unknown routes: JSON under `/api`, an HTML page elsewhere
pub async fn not_found(uri: Uri) -> Response {
    let err = ApiError::not_found(format!("No route for {}", uri.path()));
    if is_api_path(uri.path()) {
        err.into_response()
    } else {
        err.into_page_response()
    }
}
