// handlers/protected/mod.rs - Protected handlers
//
// Security Level: valid session, plus a membership in the selected organization
// Middleware: session_middleware → organization_middleware
//
// Handlers receive `AuthSession` and `OrganizationContext` as request extensions.
pub mod bookings;

pub use bookings::{index_data, index_page};
