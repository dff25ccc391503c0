use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::Role;
use crate::bookings::model::{BookingPage, BookingQuery};
use crate::database::DatabaseError;

/// A user's role inside one organization
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Membership {
    pub organization_id: Uuid,
    pub organization_name: String,
    pub role: Role,
    pub joined_at: DateTime<Utc>,
}

/// Read access to bookings and the memberships that scope them
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// One page of bookings matching `query`, relations attached, with the unpaged count
    async fn find_bookings(&self, query: &BookingQuery) -> Result<BookingPage, DatabaseError>;

    /// The user's memberships, oldest first
    async fn find_memberships(&self, user_id: Uuid) -> Result<Vec<Membership>, DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;
}

/// `%` and `_` in user input must match literally inside a LIKE pattern
pub fn like_contains_pattern(search: &str) -> String {
    let mut escaped = String::with_capacity(search.len() + 2);
    escaped.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
