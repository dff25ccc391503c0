pub mod auth;
pub mod organization;
pub mod response;

pub use auth::{is_api_path, session_middleware};
pub use organization::organization_middleware;
pub use response::ApiResponse;
