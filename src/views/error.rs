use maud::{html, Markup};

use super::layout::page;
use crate::error::ApiError;

pub fn error_page(err: &ApiError) -> Markup {
    let heading = match err.status_code() {
        401 => "Please sign in",
        403 => "Access denied",
        404 => "Not found",
        503 => "Temporarily unavailable",
        _ => "Something went wrong",
    };
    page(
        heading,
        html! {
            section.error-page data-status=(err.status_code()) {
                h1 { (heading) }
                p { (err.message()) }
                a href="/bookings" { "Back to bookings" }
            }
        },
    )
}
