use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;

use super::auth::is_api_path;
use crate::auth::{select_organization, selected_organization_id, AuthError, AuthSession};
use crate::error::ApiError;
use crate::AppState;

/// Resolves the [`OrganizationContext`](crate::auth::OrganizationContext) for an
/// authenticated request. Runs after [`session_middleware`](super::session_middleware).
pub async fn organization_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let is_api = is_api_path(request.uri().path());
    let reject = |err: ApiError| {
        if is_api {
            err.into_response()
        } else {
            err.into_page_response()
        }
    };

    let Some(session) = request.extensions().get::<AuthSession>().cloned() else {
        return reject(AuthError::MissingSession.into());
    };

    let memberships = match state.store.find_memberships(session.user_id).await {
        Ok(memberships) => memberships,
        Err(e) => return reject(e.into()),
    };

    match select_organization(session.user_id, &memberships, selected_organization_id(&jar)) {
        Ok(ctx) => {
            tracing::debug!(
                user = %session.user_id,
                organization = %ctx.organization_id,
                role = %ctx.role,
                "Selected organization"
            );
            request.extensions_mut().insert(ctx);
            next.run(request).await
        }
        Err(e) => reject(e.into()),
    }
}
