pub mod auth;
pub mod bookings;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod middleware;
pub mod server;
pub mod services;
pub mod views;

use std::sync::Arc;

use axum::{http::HeaderValue, middleware::from_fn, middleware::from_fn_with_state, routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use services::BookingStore;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BookingStore>,
}

impl AppState {
    pub fn new(store: impl BookingStore + 'static) -> Self {
        Self { store: Arc::new(store) }
    }
}

/// The full router: public routes, then the session-protected page and API
pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(handlers::public::root))
        .route("/health", get(handlers::public::health))
        // Session + organization
        .merge(protected_routes(state.clone()))
        .fallback(handlers::public::not_found)
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use handlers::protected::bookings;

    // The last layer runs first, so the session is resolved before the organization
    Router::new()
        .route("/bookings", get(bookings::index_page))
        .route("/api/bookings", get(bookings::index_data))
        .route_layer(from_fn_with_state(state, middleware::organization_middleware))
        .route_layer(from_fn(middleware::session_middleware))
}

fn cors_layer() -> CorsLayer {
    let security = &config::config().security;
    if !security.enable_cors {
        return CorsLayer::new();
    }
    if security.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    CorsLayer::new().allow_origin(origins)
}
