mod common;

use anyhow::Result;
use async_trait::async_trait;
use axum::http::{header, StatusCode};
use uuid::Uuid;

use shelf_bookings::bookings::model::{BookingPage, BookingQuery};
use shelf_bookings::database::DatabaseError;
use shelf_bookings::services::{BookingStore, Membership};
use shelf_bookings::{app, AppState};

/// A store whose backend is down
struct UnreachableStore;

#[async_trait]
impl BookingStore for UnreachableStore {
    async fn find_bookings(&self, _query: &BookingQuery) -> Result<BookingPage, DatabaseError> {
        Err(DatabaseError::QueryError("connection refused".into()))
    }

    async fn find_memberships(&self, _user_id: Uuid) -> Result<Vec<Membership>, DatabaseError> {
        Err(DatabaseError::QueryError("connection refused".into()))
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Err(DatabaseError::Sqlx(sqlx::Error::PoolTimedOut))
    }
}

#[tokio::test]
async fn root_describes_service() -> Result<()> {
    let res = common::send(common::demo_app(), common::get("/", &[])).await;
    assert_eq!(res.status(), StatusCode::OK);

    let body = common::body_json(res).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["data"]["endpoints"]["bookings"].is_string());
    Ok(())
}

#[tokio::test]
async fn health_reports_store_ok() -> Result<()> {
    let res = common::send(common::demo_app(), common::get("/health", &[])).await;
    assert_eq!(res.status(), StatusCode::OK);

    let body = common::body_json(res).await;
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["database"], "ok");
    Ok(())
}

#[tokio::test]
async fn health_reports_unreachable_store() -> Result<()> {
    let app = app(AppState::new(UnreachableStore));
    let res = common::send(app, common::get("/health", &[])).await;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body = common::body_json(res).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["data"]["status"], "degraded");
    Ok(())
}

#[tokio::test]
async fn store_failure_hides_details_from_api_clients() -> Result<()> {
    let app = app(AppState::new(UnreachableStore));
    let cookie = common::session_cookie(Uuid::new_v4());
    let res = common::send(app, common::get("/api/bookings", &[&cookie])).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = common::body_json(res).await;
    assert_eq!(body["success"], false);
    assert!(!body["message"].as_str().unwrap_or_default().contains("connection refused"));
    Ok(())
}

#[tokio::test]
async fn unknown_api_route_is_json_404() -> Result<()> {
    let res = common::send(common::demo_app(), common::get("/api/nope", &[])).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let body = common::body_json(res).await;
    assert_eq!(body["code"], "NOT_FOUND");
    Ok(())
}

#[tokio::test]
async fn unknown_page_is_html_404() -> Result<()> {
    let res = common::send(common::demo_app(), common::get("/nope", &[])).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let content_type = res
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/html"));
    assert!(common::body_string(res).await.contains("/nope"));
    Ok(())
}
