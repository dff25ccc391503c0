// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Security Level: None
// Middleware: None
pub mod health;
pub mod not_found;

pub use health::{health, root};
pub use not_found::not_found;
