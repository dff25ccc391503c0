use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use super::booking_store::{BookingStore, Membership};
use crate::auth::Role;
use crate::bookings::model::{BookingAsset, BookingPage, BookingQuery, BookingWithRelations};
use crate::database::models::{BookingRow, Organization, TeamMember, User};
use crate::database::DatabaseError;

/// Raw tables for the in-memory store, shaped like the Postgres schema
#[derive(Debug, Clone, Default)]
pub struct InMemoryData {
    pub users: Vec<User>,
    pub organizations: Vec<Organization>,
    pub memberships: Vec<InMemoryMembership>,
    pub team_members: Vec<TeamMember>,
    pub assets: Vec<InMemoryAsset>,
    /// Ids of assets currently held by a custodian
    pub custodies: Vec<Uuid>,
    pub bookings: Vec<BookingRow>,
    /// (booking_id, asset_id)
    pub booking_assets: Vec<(Uuid, Uuid)>,
}

/// A row of `user_organizations`
#[derive(Debug, Clone)]
pub struct InMemoryMembership {
    pub user_id: Uuid,
    pub organization_id: Uuid,
    pub role: Role,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct InMemoryAsset {
    pub id: Uuid,
    pub title: String,
    pub organization_id: Uuid,
    pub available_to_book: bool,
}

/// Store backed by process memory; serves demo mode and the HTTP tests
#[derive(Clone, Default)]
pub struct InMemoryBookingStore {
    data: Arc<RwLock<InMemoryData>>,
}

impl InMemoryBookingStore {
    pub fn new(data: InMemoryData) -> Self {
        Self {
            data: Arc::new(RwLock::new(data)),
        }
    }

    fn matches(query: &BookingQuery, row: &BookingRow, needle: Option<&str>) -> bool {
        if row.organization_id != query.organization_id {
            return false;
        }
        if !query.statuses.is_empty() && !query.statuses.iter().any(|s| s.as_str() == row.status) {
            return false;
        }
        if let Some(custodian) = query.custodian_user_id {
            if row.custodian_user_id != Some(custodian) {
                return false;
            }
        }
        match needle {
            Some(needle) => row.name.to_lowercase().contains(needle),
            None => true,
        }
    }

    /// `from_at asc nulls last, created_at desc`
    fn compare(a: &BookingRow, b: &BookingRow) -> Ordering {
        let by_from = match (a.from_at, b.from_at) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_from.then_with(|| b.created_at.cmp(&a.created_at))
    }

    fn attach(data: &InMemoryData, row: BookingRow) -> Result<BookingWithRelations, DatabaseError> {
        let creator_id = row.creator_id;
        let custodian_user_id = row.custodian_user_id;
        let custodian_team_member_id = row.custodian_team_member_id;

        let mut booking = BookingWithRelations::from_row(row)?;
        booking.creator = data.users.iter().find(|u| u.id == creator_id).cloned();
        booking.custodian_user =
            custodian_user_id.and_then(|id| data.users.iter().find(|u| u.id == id).cloned());
        booking.custodian_team_member =
            custodian_team_member_id.and_then(|id| data.team_members.iter().find(|m| m.id == id).cloned());

        let mut assets: Vec<BookingAsset> = data
            .booking_assets
            .iter()
            .filter(|(booking_id, _)| *booking_id == booking.id)
            .filter_map(|(_, asset_id)| data.assets.iter().find(|a| a.id == *asset_id))
            .map(|asset| BookingAsset {
                id: asset.id,
                title: asset.title.clone(),
                available_to_book: asset.available_to_book,
                in_custody: data.custodies.contains(&asset.id),
            })
            .collect();
        assets.sort_by(|a, b| a.title.cmp(&b.title));
        booking.assets = assets;
        Ok(booking)
    }
}

fn poisoned() -> DatabaseError {
    DatabaseError::QueryError("in-memory store lock poisoned".to_string())
}

#[async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn find_bookings(&self, query: &BookingQuery) -> Result<BookingPage, DatabaseError> {
        let data = self.data.read().map_err(|_| poisoned())?;
        let needle = query.search.as_deref().map(str::to_lowercase);

        let mut rows: Vec<&BookingRow> = data
            .bookings
            .iter()
            .filter(|row| Self::matches(query, row, needle.as_deref()))
            .collect();
        rows.sort_by(|a, b| Self::compare(a, b));

        let total_count = rows.len() as u64;
        let offset = usize::try_from(query.offset()).unwrap_or(usize::MAX);
        let bookings = rows
            .into_iter()
            .skip(offset)
            .take(query.per_page as usize)
            .map(|row| Self::attach(&data, row.clone()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(BookingPage { bookings, total_count })
    }

    async fn find_memberships(&self, user_id: Uuid) -> Result<Vec<Membership>, DatabaseError> {
        let data = self.data.read().map_err(|_| poisoned())?;
        // Inner join: memberships of a missing organization are skipped
        let mut memberships: Vec<Membership> = data
            .memberships
            .iter()
            .filter(|m| m.user_id == user_id)
            .filter_map(|m| {
                let org = data.organizations.iter().find(|o| o.id == m.organization_id)?;
                Some(Membership {
                    organization_id: org.id,
                    organization_name: org.name.clone(),
                    role: m.role,
                    joined_at: m.joined_at,
                })
            })
            .collect();
        memberships.sort_by_key(|m| m.joined_at);
        Ok(memberships)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        self.data.read().map(|_| ()).map_err(|_| poisoned())
    }
}
