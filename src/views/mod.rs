//! Server-rendered HTML, built with maud

pub mod bookings;
pub mod error;
pub mod layout;

pub use bookings::bookings_page;
pub use error::error_page;
