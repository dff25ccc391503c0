use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;

use super::availability::has_unavailable_assets;
use super::client_hints::{DateTimeFormat, DisplayDateTime};
use super::model::{BookingQuery, BookingWithRelations};
use super::pagination::{page_meta, total_pages};
use super::params::{params_values, SearchParams};
use super::status::BookingStatus;
use super::user_prefs::{update_with_per_page, UserPrefs};
use crate::auth::{AuthError, OrganizationContext, PermissionAction, PermissionEntity};
use crate::config::PaginationConfig;
use crate::database::DatabaseError;
use crate::services::BookingStore;

#[derive(Debug, Clone, Serialize)]
pub struct Header {
    pub title: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelName {
    pub singular: &'static str,
    pub plural: &'static str,
}

/// A booking ready for the table: dates already in the viewer's locale and zone
#[derive(Debug, Clone, Serialize)]
pub struct BookingListItem {
    #[serde(flatten)]
    pub booking: BookingWithRelations,
    pub display_from: Option<DisplayDateTime>,
    pub display_to: Option<DisplayDateTime>,
    pub has_unavailable_assets: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingsLoaderData {
    pub header: Header,
    pub items: Vec<BookingListItem>,
    pub search: Option<String>,
    pub status: Option<BookingStatus>,
    pub page: u32,
    pub total_items: u64,
    pub total_pages: u32,
    pub per_page: u32,
    pub prev: Option<String>,
    pub next: Option<String>,
    pub model_name: ModelName,
}

#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<LoaderError> for crate::error::ApiError {
    fn from(err: LoaderError) -> Self {
        match err {
            LoaderError::Auth(e) => e.into(),
            LoaderError::Database(e) => e.into(),
        }
    }
}

/// Everything the route needs from the request, already extracted
pub struct LoaderRequest<'a> {
    pub params: &'a SearchParams,
    pub cookies: &'a CookieJar,
    pub format: DateTimeFormat,
}

/// Loader result plus the updated prefs to write back
pub struct Loaded {
    pub data: BookingsLoaderData,
    pub prefs: UserPrefs,
}

pub async fn load(
    store: &dyn BookingStore,
    org: &OrganizationContext,
    request: LoaderRequest<'_>,
    pagination: &PaginationConfig,
) -> Result<Loaded, LoaderError> {
    org.require(PermissionEntity::Booking, PermissionAction::Read)?;

    let values = params_values(request.params);
    let prefs = update_with_per_page(request.cookies, values.per_page_param, pagination);

    let query = BookingQuery {
        organization_id: org.organization_id,
        page: values.page,
        per_page: prefs.per_page,
        search: values.search.clone(),
        statuses: values.status.into_iter().collect(),
        custodian_user_id: org.is_self_service().then_some(org.user_id),
    };
    tracing::debug!(
        organization = %org.organization_id,
        page = query.page,
        per_page = query.per_page,
        locale = request.format.locale.tag(),
        "Loading bookings"
    );

    let page = store.find_bookings(&query).await?;
    let pages = total_pages(page.total_count, prefs.per_page);
    let meta = page_meta(request.params, values.page, pages);

    let items = page
        .bookings
        .into_iter()
        .map(|booking| list_item(booking, &request.format))
        .collect();

    Ok(Loaded {
        data: BookingsLoaderData {
            header: Header {
                title: "Bookings".to_string(),
            },
            items,
            search: values.search,
            status: values.status,
            page: values.page,
            total_items: page.total_count,
            total_pages: pages,
            per_page: prefs.per_page,
            prev: meta.prev,
            next: meta.next,
            model_name: ModelName {
                singular: "booking",
                plural: "bookings",
            },
        },
        prefs,
    })
}

fn list_item(booking: BookingWithRelations, format: &DateTimeFormat) -> BookingListItem {
    // Drafts may carry only one end of the range; show nothing until both exist
    let (display_from, display_to) = match (booking.from, booking.to) {
        (Some(from), Some(to)) => (Some(format.format(from)), Some(format.format(to))),
        _ => (None, None),
    };
    BookingListItem {
        has_unavailable_assets: has_unavailable_assets(&booking),
        booking,
        display_from,
        display_to,
    }
}
