use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::auth::{session_from_request, AuthError};
use crate::error::ApiError;

/// Whether a request wants JSON errors rather than pages and redirects
pub fn is_api_path(path: &str) -> bool {
    path == "/api" || path.starts_with("/api/")
}

/// Session middleware: validates the `__session` cookie (or Bearer token) and
/// injects the [`AuthSession`](crate::auth::AuthSession) into request extensions.
///
/// Page requests without a valid session are sent to the login page with a
/// `redirectTo` back to where they came from; API requests get 401 JSON.
pub async fn session_middleware(
    headers: HeaderMap,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    match session_from_request(&headers, &jar) {
        Ok(session) => {
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        Err(err) => {
            let path = request.uri().path();
            if !matches!(err, AuthError::MissingSession) {
                tracing::warn!("Session rejected for {}: {}", path, err);
            }
            if is_api_path(path) {
                return ApiError::from(err).into_response();
            }
            let target = request
                .uri()
                .path_and_query()
                .map(|pq| pq.as_str())
                .unwrap_or(path);
            Redirect::to(&login_redirect(target)).into_response()
        }
    }
}

pub fn login_redirect(return_to: &str) -> String {
    format!("/login?redirectTo={}", urlencoding::encode(return_to))
}
