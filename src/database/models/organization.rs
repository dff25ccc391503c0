use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Organization {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// user_organizations joined with the organization name
#[derive(Debug, Clone, FromRow)]
pub struct MembershipRow {
    pub organization_id: Uuid,
    pub organization_name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}
