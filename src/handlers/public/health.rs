use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::config;
use crate::AppState;

/// GET / - Service information
pub async fn root() -> Json<Value> {
    let config = config::config();
    Json(json!({
        "success": true,
        "data": {
            "name": config.app.name,
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Booking list for the shelf asset tracker",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "bookings": "/bookings (session, HTML)",
                "api": "/api/bookings (session, JSON)",
            }
        }
    }))
}

/// GET /health - Store connectivity
///
/// Expected Output:
/// ```json
/// { "success": true, "data": { "status": "ok", "timestamp": "…", "database": "ok" } }
/// ```
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                        "database_error": e.to_string()
                    }
                })),
            )
        }
    }
}
