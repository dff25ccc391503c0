use axum::{
    extract::{RawQuery, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    Extension,
};
use axum_extra::extract::cookie::CookieJar;

use crate::auth::{commit_session, AuthSession, OrganizationContext};
use crate::bookings::client_hints::DateTimeFormat;
use crate::bookings::params::SearchParams;
use crate::bookings::{self, BookingsLoaderData, LoaderRequest};
use crate::config;
use crate::error::ApiError;
use crate::middleware::ApiResponse;
use crate::views;
use crate::AppState;

/// Runs the loader and collects the cookies every successful load re-sends:
/// user prefs, the refreshed session and the selected organization.
async fn run_loader(
    state: &AppState,
    session: &AuthSession,
    org: &OrganizationContext,
    headers: &HeaderMap,
    jar: CookieJar,
    params: &SearchParams,
) -> Result<(CookieJar, BookingsLoaderData), ApiError> {
    let request = LoaderRequest {
        params,
        cookies: &jar,
        format: DateTimeFormat::from_request(headers, &jar),
    };
    let loaded = bookings::load(state.store.as_ref(), org, request, &config::config().pagination).await?;

    let jar = jar
        .add(loaded.prefs.to_cookie())
        .add(commit_session(session)?)
        .add(org.to_cookie());
    Ok((jar, loaded.data))
}

/// GET /bookings - Bookings index page (HTML)
pub async fn index_page(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
    Extension(org): Extension<OrganizationContext>,
    headers: HeaderMap,
    jar: CookieJar,
    RawQuery(query): RawQuery,
) -> Response {
    let params = SearchParams::parse(query.as_deref());
    match run_loader(&state, &session, &org, &headers, jar, &params).await {
        Ok((jar, data)) => (jar, views::bookings_page(&data, &params)).into_response(),
        Err(e) => e.into_page_response(),
    }
}

/// GET /api/bookings - Bookings index data (JSON)
///
/// Accepts the same query parameters as the page: `page`, `per_page`, `s`, `status`.
///
/// Expected Output:
/// ```json
/// {
///   "success": true,
///   "data": {
///     "header": { "title": "Bookings" },
///     "items": [ { "id": "…", "name": "…", "status": "RESERVED", "display_from": { "date": "1/5/24", "time": "3:04 PM" }, … } ],
///     "page": 1, "total_items": 30, "total_pages": 2, "per_page": 20,
///     "prev": null, "next": "?page=2",
///     "model_name": { "singular": "booking", "plural": "bookings" }
///   }
/// }
/// ```
pub async fn index_data(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
    Extension(org): Extension<OrganizationContext>,
    headers: HeaderMap,
    jar: CookieJar,
    RawQuery(query): RawQuery,
) -> Result<(CookieJar, ApiResponse<BookingsLoaderData>), ApiError> {
    let params = SearchParams::parse(query.as_deref());
    let (jar, data) = run_loader(&state, &session, &org, &headers, jar, &params).await?;
    Ok((jar, ApiResponse::success(data)))
}
