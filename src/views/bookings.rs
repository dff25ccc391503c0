use maud::{html, Markup, PreEscaped};

use super::layout::{breadcrumbs, page, Crumb};
use crate::bookings::client_hints::DisplayDateTime;
use crate::bookings::params::SearchParams;
use crate::bookings::{BookingListItem, BookingStatus, BookingsLoaderData};
use crate::database::models::user::DEFAULT_PROFILE_PICTURE;

pub const PER_PAGE_OPTIONS: [u32; 3] = [20, 50, 100];

const UNAVAILABLE_TOOLTIP_TITLE: &str = "Booking includes unavailable assets";
const UNAVAILABLE_TOOLTIP: &str = "There are some assets within this booking that are unavailable for \
     reservation because they are checked-out, have custody assigned or are marked as not allowed to book";

/// The full bookings index page
pub fn bookings_page(data: &BookingsLoaderData, params: &SearchParams) -> Markup {
    page(
        &data.header.title,
        html! {
            (breadcrumbs(&[Crumb { label: "Bookings", href: "/bookings" }]))
            header.page-header {
                h1 { (data.header.title) }
                a.button href="/bookings/new" role="link" aria-label="new booking" { "New booking" }
            }
            (filters(data, params))
            @if data.items.is_empty() {
                (empty_state(data))
            } @else {
                (table(&data.items))
            }
            (pagination(data, params))
        },
    )
}

fn filters(data: &BookingsLoaderData, params: &SearchParams) -> Markup {
    html! {
        form.filters method="get" action="/bookings" {
            input type="search" name="s" placeholder="Search bookings"
                value=(data.search.as_deref().unwrap_or(""));
            select name="status" {
                option value="ALL" selected[data.status.is_none()] { "All" }
                @for status in BookingStatus::ALL {
                    option value=(status.as_str()) selected[data.status == Some(status)] { (status.label()) }
                }
            }
            @if let Some(per_page) = params.get("per_page") {
                input type="hidden" name="per_page" value=(per_page);
            }
            button type="submit" { "Filter" }
        }
    }
}

fn table(items: &[BookingListItem]) -> Markup {
    html! {
        table.bookings {
            thead {
                tr {
                    th { "Name" }
                    th { (PreEscaped("&nbsp;")) }
                    th { "From" }
                    th { "To" }
                    th { "Custodian" }
                    th { "Created by" }
                }
            }
            tbody {
                @for item in items {
                    (row(item))
                }
            }
        }
    }
}

fn row(item: &BookingListItem) -> Markup {
    let booking = &item.booking;
    let href = format!("/bookings/{}", booking.id);
    html! {
        tr data-booking-id=(booking.id) {
            td.item {
                a href=(href) {
                    span.name { (booking.name) }
                    (status_badge(booking.status))
                }
            }
            td.availability {
                @if item.has_unavailable_assets {
                    span.badge.unavailable title=(UNAVAILABLE_TOOLTIP_TITLE) data-tooltip=(UNAVAILABLE_TOOLTIP) {
                        "Includes unavailable assets"
                    }
                }
            }
            td.from { (date_cell(item.display_from.as_ref())) }
            td.to { (date_cell(item.display_to.as_ref())) }
            td.custodian {
                @if let Some(user) = &booking.custodian_user {
                    (user_badge(Some(user.profile_picture_or_default()), &user.full_name()))
                } @else if let Some(member) = &booking.custodian_team_member {
                    (user_badge(None, &member.name))
                }
            }
            td.creator {
                @if let Some(creator) = &booking.creator {
                    (user_badge(Some(creator.profile_picture_or_default()), &creator.full_name()))
                }
            }
        }
    }
}

pub fn status_badge(status: BookingStatus) -> Markup {
    html! {
        span.badge.status data-status=(status.as_str()) style={ "color: " (status.color()) } {
            (status.label())
        }
    }
}

fn date_cell(value: Option<&DisplayDateTime>) -> Markup {
    html! {
        @if let Some(value) = value {
            span.date { (value.date) }
            span.time { (value.time) }
        }
    }
}

fn user_badge(img: Option<&str>, name: &str) -> Markup {
    html! {
        span.user-badge {
            img src=(img.unwrap_or(DEFAULT_PROFILE_PICTURE)) alt="";
            span { (name) }
        }
    }
}

fn empty_state(data: &BookingsLoaderData) -> Markup {
    let filtered = data.search.is_some() || data.status.is_some();
    html! {
        div.empty-state {
            h2 { "No " (data.model_name.plural) " found" }
            @if filtered {
                p { "Try changing your search or status filter." }
                a href="/bookings" { "Clear filters" }
            } @else {
                p { "Create your first booking to get started." }
            }
        }
    }
}

fn pagination(data: &BookingsLoaderData, params: &SearchParams) -> Markup {
    let mut keep = params.clone();
    keep.remove("per_page");
    keep.remove("page");
    // A custom size from the URL stays selectable so "Apply" keeps it
    let mut sizes = PER_PAGE_OPTIONS.to_vec();
    if !sizes.contains(&data.per_page) {
        sizes.push(data.per_page);
        sizes.sort_unstable();
    }
    html! {
        footer.pagination {
            span.page-info { "Page " (data.page) " of " (data.total_pages.max(1)) }
            span.total-items { (data.total_items) " " (data.model_name.plural) }
            nav {
                @if let Some(prev) = &data.prev {
                    a.prev href=(prev) rel="prev" { "Previous" }
                } @else {
                    span.prev.disabled { "Previous" }
                }
                @if let Some(next) = &data.next {
                    a.next href=(next) rel="next" { "Next" }
                } @else {
                    span.next.disabled { "Next" }
                }
            }
            form.per-page method="get" action="/bookings" {
                @for (key, value) in keep.iter() {
                    input type="hidden" name=(key) value=(value);
                }
                select name="per_page" {
                    @for option in sizes {
                        option value=(option) selected[option == data.per_page] { (option) " per page" }
                    }
                }
                button type="submit" { "Apply" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bookings::loader::{Header, ModelName};

    fn data(items: Vec<BookingListItem>) -> BookingsLoaderData {
        BookingsLoaderData {
            header: Header { title: "Bookings".into() },
            total_items: items.len() as u64,
            items,
            search: Some("<b>".into()),
            status: Some(BookingStatus::Overdue),
            page: 1,
            total_pages: 0,
            per_page: 50,
            prev: None,
            next: None,
            model_name: ModelName { singular: "booking", plural: "bookings" },
        }
    }

    #[test]
    fn empty_state_mentions_filters() {
        let html = bookings_page(&data(vec![]), &SearchParams::parse(Some("s=%3Cb%3E&status=OVERDUE"))).into_string();
        assert!(html.contains("No bookings found"));
        assert!(html.contains("Clear filters"));
        assert!(html.contains("Page 1 of 1"));
        assert!(html.contains("value=\"&lt;b&gt;\""));
        assert!(html.contains(r#"<option value="OVERDUE" selected>"#));
        assert!(html.contains(r#"<option value="50" selected>"#));
    }

    #[test]
    fn status_badge_uses_color_and_label() {
        let html = status_badge(BookingStatus::Reserved).into_string();
        assert!(html.contains("#175CD3"));
        assert!(html.contains(">Reserved<"));
    }

    #[test]
    fn keeps_custom_page_size_selected() {
        let mut custom = data(vec![]);
        custom.per_page = 5;
        let html = bookings_page(&custom, &SearchParams::parse(Some("per_page=5"))).into_string();
        assert!(html.contains(r#"<option value="5" selected>"#));
        assert!(html.contains(r#"<option value="20">"#));
        assert!(html.find(r#"value="5" selected"#) < html.find(r#"value="20""#));
    }
}
