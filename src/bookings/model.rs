use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::status::BookingStatus;
use crate::database::models::{BookingAssetRow, BookingRow, TeamMember, User};
use crate::database::DatabaseError;

/// Asset as seen from a booking row in the list
#[derive(Debug, Clone, Serialize)]
pub struct BookingAsset {
    pub id: Uuid,
    pub title: String,
    pub available_to_book: bool,
    pub in_custody: bool,
}

impl From<BookingAssetRow> for BookingAsset {
    fn from(row: BookingAssetRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            available_to_book: row.available_to_book,
            in_custody: row.in_custody,
        }
    }
}

/// A booking with everything the list page shows about it
#[derive(Debug, Clone, Serialize)]
pub struct BookingWithRelations {
    pub id: Uuid,
    pub name: String,
    pub status: BookingStatus,
    pub organization_id: Uuid,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub creator: Option<User>,
    pub custodian_user: Option<User>,
    pub custodian_team_member: Option<TeamMember>,
    pub assets: Vec<BookingAsset>,
}

impl BookingWithRelations {
    /// Builds the domain value from a row; relations are attached by the caller
    pub fn from_row(row: BookingRow) -> Result<Self, DatabaseError> {
        let status = row
            .status
            .parse::<BookingStatus>()
            .map_err(|e| DatabaseError::QueryError(format!("booking {}: {}", row.id, e)))?;
        Ok(Self {
            id: row.id,
            name: row.name,
            status,
            organization_id: row.organization_id,
            from: row.from_at,
            to: row.to_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
            creator: None,
            custodian_user: None,
            custodian_team_member: None,
            assets: vec![],
        })
    }
}

/// One page of bookings plus the count over all pages
#[derive(Debug, Clone, Default)]
pub struct BookingPage {
    pub bookings: Vec<BookingWithRelations>,
    pub total_count: u64,
}

/// What the list loader asks the store for
#[derive(Debug, Clone, PartialEq)]
pub struct BookingQuery {
    pub organization_id: Uuid,
    pub page: u32,
    pub per_page: u32,
    pub search: Option<String>,
    pub statuses: Vec<BookingStatus>,
    pub custodian_user_id: Option<Uuid>,
}

impl BookingQuery {
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(status: &str) -> BookingRow {
        BookingRow {
            id: Uuid::new_v4(),
            name: "Shoot".into(),
            status: status.into(),
            organization_id: Uuid::new_v4(),
            creator_id: Uuid::new_v4(),
            custodian_user_id: None,
            custodian_team_member_id: None,
            from_at: None,
            to_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn converts_known_status() {
        let booking = BookingWithRelations::from_row(row("ONGOING")).unwrap();
        assert_eq!(booking.status, BookingStatus::Ongoing);
        assert!(booking.assets.is_empty());
    }

    #[test]
    fn rejects_unknown_status() {
        assert!(BookingWithRelations::from_row(row("LOST")).is_err());
    }

    #[test]
    fn offset_from_page() {
        let query = BookingQuery {
            organization_id: Uuid::nil(),
            page: 3,
            per_page: 20,
            search: None,
            statuses: vec![],
            custodian_user_id: None,
        };
        assert_eq!(query.offset(), 40);
        assert_eq!(BookingQuery { page: 0, ..query }.offset(), 0);
    }
}
