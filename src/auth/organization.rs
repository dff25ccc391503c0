use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;
use uuid::Uuid;

use super::{AuthError, PermissionAction, PermissionEntity, Role};
use crate::config::{self, SecurityConfig};
use crate::services::Membership;

pub const SELECTED_ORGANIZATION_COOKIE: &str = "selected-organization-id";

/// The organization a request acts in, and the user's role there
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrganizationContext {
    pub user_id: Uuid,
    pub organization_id: Uuid,
    pub organization_name: String,
    pub role: Role,
}

impl OrganizationContext {
    pub fn require(&self, entity: PermissionEntity, action: PermissionAction) -> Result<(), AuthError> {
        super::require_permission(self.role, entity, action)
    }

    pub fn is_self_service(&self) -> bool {
        self.role.is_self_service()
    }

    /// Re-sent on every successful load
    pub fn to_cookie(&self) -> Cookie<'static> {
        self.to_cookie_with(&config::config().security)
    }

    pub fn to_cookie_with(&self, security: &SecurityConfig) -> Cookie<'static> {
        Cookie::build((SELECTED_ORGANIZATION_COOKIE, self.organization_id.to_string()))
            .path("/")
            .http_only(true)
            .secure(security.secure_cookies)
            .same_site(SameSite::Lax)
            .max_age(time::Duration::days(365))
            .build()
    }
}

pub fn selected_organization_id(jar: &CookieJar) -> Option<Uuid> {
    jar.get(SELECTED_ORGANIZATION_COOKIE)
        .and_then(|c| Uuid::parse_str(c.value().trim()).ok())
}

/// Picks the cookie's organization when the user belongs to it, else the oldest membership.
/// `memberships` must be ordered oldest first.
pub fn select_organization(
    user_id: Uuid,
    memberships: &[Membership],
    requested: Option<Uuid>,
) -> Result<OrganizationContext, AuthError> {
    let requested_membership =
        requested.and_then(|id| memberships.iter().find(|m| m.organization_id == id));

    if let (Some(id), None) = (requested, requested_membership) {
        tracing::debug!("User {} is not a member of selected organization {}", user_id, id);
    }

    let membership = requested_membership
        .or_else(|| memberships.first())
        .ok_or_else(|| AuthError::Forbidden("You are not a member of any organization".to_string()))?;

    Ok(OrganizationContext {
        user_id,
        organization_id: membership.organization_id,
        organization_name: membership.organization_name.clone(),
        role: membership.role,
    })
}
