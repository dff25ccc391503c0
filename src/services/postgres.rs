use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use super::booking_store::{like_contains_pattern, BookingStore, Membership};
use crate::auth::Role;
use crate::bookings::model::{BookingAsset, BookingPage, BookingQuery, BookingWithRelations};
use crate::database::models::{BookingAssetRow, BookingRow, MembershipRow, TeamMember, User};
use crate::database::{DatabaseError, DatabaseManager, Repository};
use crate::filter::FilterData;

/// Undated drafts sink to the end; among equal dates the newest booking comes first
const BOOKING_ORDER: &str = "from_at asc nulls last, created_at desc";

/// Postgres-backed store
#[derive(Clone)]
pub struct PgBookingStore {
    db: DatabaseManager,
}

impl PgBookingStore {
    pub fn new(db: DatabaseManager) -> Self {
        Self { db }
    }

    fn where_clause(query: &BookingQuery) -> Value {
        let mut conditions = json!({ "organization_id": query.organization_id });
        if !query.statuses.is_empty() {
            let statuses: Vec<&str> = query.statuses.iter().map(|s| s.as_str()).collect();
            conditions["status"] = json!({ "$in": statuses });
        }
        if let Some(custodian) = query.custodian_user_id {
            conditions["custodian_user_id"] = json!(custodian);
        }
        if let Some(search) = query.search.as_deref() {
            conditions["name"] = json!({ "$ilike": like_contains_pattern(search) });
        }
        conditions
    }

    async fn load_users(&self, rows: &[BookingRow]) -> Result<HashMap<Uuid, User>, DatabaseError> {
        let ids: HashSet<Uuid> = rows
            .iter()
            .flat_map(|r| std::iter::once(r.creator_id).chain(r.custodian_user_id))
            .collect();
        let ids: Vec<Uuid> = ids.into_iter().collect();
        let users = Repository::<User>::new("users", self.db.pool().clone())
            .select_ids(&ids)
            .await?;
        Ok(users.into_iter().map(|u| (u.id, u)).collect())
    }

    async fn load_team_members(&self, rows: &[BookingRow]) -> Result<HashMap<Uuid, TeamMember>, DatabaseError> {
        let ids: HashSet<Uuid> = rows.iter().filter_map(|r| r.custodian_team_member_id).collect();
        let ids: Vec<Uuid> = ids.into_iter().collect();
        let members = Repository::<TeamMember>::new("team_members", self.db.pool().clone())
            .select_ids(&ids)
            .await?;
        Ok(members.into_iter().map(|m| (m.id, m)).collect())
    }

    async fn load_assets(&self, rows: &[BookingRow]) -> Result<HashMap<Uuid, Vec<BookingAsset>>, DatabaseError> {
        if rows.is_empty() {
            return Ok(HashMap::new());
        }
        let booking_ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let asset_rows = sqlx::query_as::<_, BookingAssetRow>(
            r#"
            SELECT
                ba.booking_id,
                a.id,
                a.title,
                a.available_to_book,
                (c.id IS NOT NULL) AS in_custody
            FROM booking_assets ba
            JOIN assets a ON a.id = ba.asset_id
            LEFT JOIN custodies c ON c.asset_id = a.id
            WHERE ba.booking_id = ANY($1)
            ORDER BY a.title
            "#,
        )
        .bind(&booking_ids)
        .fetch_all(self.db.pool())
        .await?;

        let mut by_booking: HashMap<Uuid, Vec<BookingAsset>> = HashMap::new();
        for row in asset_rows {
            by_booking.entry(row.booking_id).or_default().push(row.into());
        }
        Ok(by_booking)
    }
}

#[async_trait]
impl BookingStore for PgBookingStore {
    async fn find_bookings(&self, query: &BookingQuery) -> Result<BookingPage, DatabaseError> {
        let repository = Repository::<BookingRow>::new("bookings", self.db.pool().clone());
        let conditions = Self::where_clause(query);

        let page_filter = FilterData {
            where_clause: Some(conditions.clone()),
            order: Some(json!(BOOKING_ORDER)),
            limit: Some(i64::from(query.per_page)),
            offset: Some(i64::try_from(query.offset()).unwrap_or(i64::MAX)),
        };
        let count_filter = FilterData {
            where_clause: Some(conditions),
            ..Default::default()
        };

        let (rows, total) = futures::try_join!(
            repository.select_any(page_filter),
            repository.count(count_filter)
        )?;

        let (users, team_members, mut assets) = futures::try_join!(
            self.load_users(&rows),
            self.load_team_members(&rows),
            self.load_assets(&rows)
        )?;

        let mut bookings = Vec::with_capacity(rows.len());
        for row in rows {
            let creator_id = row.creator_id;
            let custodian_user_id = row.custodian_user_id;
            let custodian_team_member_id = row.custodian_team_member_id;

            let mut booking = BookingWithRelations::from_row(row)?;
            booking.creator = users.get(&creator_id).cloned();
            booking.custodian_user = custodian_user_id.and_then(|id| users.get(&id).cloned());
            booking.custodian_team_member = custodian_team_member_id.and_then(|id| team_members.get(&id).cloned());
            booking.assets = assets.remove(&booking.id).unwrap_or_default();
            bookings.push(booking);
        }

        Ok(BookingPage {
            bookings,
            total_count: u64::try_from(total).unwrap_or_default(),
        })
    }

    async fn find_memberships(&self, user_id: Uuid) -> Result<Vec<Membership>, DatabaseError> {
        let rows = sqlx::query_as::<_, MembershipRow>(
            r#"
            SELECT
                uo.organization_id,
                o.name AS organization_name,
                uo.role,
                uo.created_at
            FROM user_organizations uo
            JOIN organizations o ON o.id = uo.organization_id
            WHERE uo.user_id = $1
            ORDER BY uo.created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        let memberships = rows
            .into_iter()
            .filter_map(|row| match row.role.parse::<Role>() {
                Ok(role) => Some(Membership {
                    organization_id: row.organization_id,
                    organization_name: row.organization_name,
                    role,
                    joined_at: row.created_at,
                }),
                Err(e) => {
                    tracing::warn!("Skipping membership in {}: {}", row.organization_id, e);
                    None
                }
            })
            .collect();
        Ok(memberships)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        self.db.health_check().await
    }
}
