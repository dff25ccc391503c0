//! Deterministic demo data for `--demo` and the HTTP tests.
//!
//! Ids are fixed so that tokens minted with `shelf auth token` keep working
//! across restarts.

use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use super::memory::{InMemoryAsset, InMemoryBookingStore, InMemoryData, InMemoryMembership};
use crate::auth::Role;
use crate::bookings::status::BookingStatus;
use crate::database::models::{BookingRow, Organization, TeamMember, User};

pub const DEMO_ORG_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_4000_8000_0000_0000_0001);
pub const DEMO_OTHER_ORG_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_4000_8000_0000_0000_0002);

pub const DEMO_OWNER_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_4000_8000_0000_0000_0101);
pub const DEMO_SELF_SERVICE_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_4000_8000_0000_0000_0102);
pub const DEMO_BASE_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_4000_8000_0000_0000_0103);
/// Authenticates fine but belongs to no organization
pub const DEMO_OUTSIDER_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_4000_8000_0000_0000_0104);

pub const DEMO_TEAM_MEMBER_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_4000_8000_0000_0000_0201);

/// Number of bookings seeded into [`DEMO_ORG_ID`]
pub const DEMO_BOOKING_COUNT: usize = 30;

const ASSET_TITLES: [&str; 6] = [
    "Canon EOS R5",
    "DJI Ronin RS3",
    "Sennheiser MKE 600",
    "Aputure 300d",
    "Manfrotto tripod",
    "MacBook Pro 16",
];

fn at(month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, month, day, hour, 0, 0)
        .single()
        .unwrap_or_default()
}

fn demo_id(base: u128, n: usize) -> Uuid {
    Uuid::from_u128(base + n as u128)
}

fn user(id: Uuid, email: &str, first: &str, last: &str) -> User {
    User {
        id,
        email: email.to_string(),
        first_name: Some(first.to_string()),
        last_name: Some(last.to_string()),
        profile_picture: None,
        created_at: at(1, 1, 8),
    }
}

fn membership(user_id: Uuid, org: &Organization, role: Role, joined_at: DateTime<Utc>) -> InMemoryMembership {
    InMemoryMembership {
        user_id,
        organization_id: org.id,
        role,
        joined_at,
    }
}

/// Tables for the demo workspace
pub fn demo_data() -> InMemoryData {
    let org = Organization {
        id: DEMO_ORG_ID,
        name: "Shelf Demo Studio".to_string(),
        created_at: at(1, 1, 8),
    };
    let other_org = Organization {
        id: DEMO_OTHER_ORG_ID,
        name: "Side Project".to_string(),
        created_at: at(1, 2, 8),
    };

    let users = vec![
        user(DEMO_OWNER_ID, "owner@shelf.local", "Olivia", "Owner"),
        user(DEMO_SELF_SERVICE_ID, "sam@shelf.local", "Sam", "Selfservice"),
        user(DEMO_BASE_ID, "bea@shelf.local", "Bea", "Base"),
        user(DEMO_OUTSIDER_ID, "outsider@shelf.local", "Otto", "Outsider"),
    ];

    let memberships = vec![
        membership(DEMO_OWNER_ID, &org, Role::Owner, at(1, 1, 8)),
        membership(DEMO_OWNER_ID, &other_org, Role::Admin, at(1, 2, 8)),
        membership(DEMO_SELF_SERVICE_ID, &org, Role::SelfService, at(1, 3, 8)),
        membership(DEMO_BASE_ID, &org, Role::Base, at(1, 3, 9)),
    ];

    let team_members = vec![TeamMember {
        id: DEMO_TEAM_MEMBER_ID,
        name: "Freelance crew".to_string(),
        organization_id: DEMO_ORG_ID,
        user_id: None,
        created_at: at(1, 1, 8),
    }];

    let assets: Vec<InMemoryAsset> = ASSET_TITLES
        .iter()
        .enumerate()
        .map(|(i, title)| InMemoryAsset {
            id: demo_id(0x0000_0000_0000_4000_8000_0000_0000_0300, i),
            title: title.to_string(),
            organization_id: DEMO_ORG_ID,
            // The laptop is never bookable
            available_to_book: i != 5,
        })
        .collect();
    // The gimbal is out with someone
    let custodies = vec![assets[1].id];

    let statuses = BookingStatus::ALL;
    let mut bookings = Vec::with_capacity(DEMO_BOOKING_COUNT + 1);
    let mut booking_assets = Vec::new();
    for i in 0..DEMO_BOOKING_COUNT {
        let status = statuses[i % statuses.len()];
        let id = demo_id(0x0000_0000_0000_4000_8000_0000_0000_1000, i);
        let created_at = at(1, 10, 8) + Duration::hours(i as i64);
        // Every seventh booking is an undated draft
        let from_at = (status != BookingStatus::Draft).then(|| at(2, 1, 9) + Duration::days(i as i64));
        let to_at = from_at.map(|from| from + Duration::hours(8 + (i as i64 % 3) * 24));

        let (custodian_user_id, custodian_team_member_id) = match i % 3 {
            0 => (Some(DEMO_SELF_SERVICE_ID), None),
            1 => (Some(DEMO_OWNER_ID), None),
            _ => (None, Some(DEMO_TEAM_MEMBER_ID)),
        };

        bookings.push(BookingRow {
            id,
            name: format!("{} #{:02}", ["Studio shoot", "Location scout", "Podcast session"][i % 3], i + 1),
            status: status.as_str().to_string(),
            organization_id: DEMO_ORG_ID,
            creator_id: DEMO_OWNER_ID,
            custodian_user_id,
            custodian_team_member_id,
            from_at,
            to_at,
            created_at,
            updated_at: created_at,
        });

        for offset in 0..(i % 3 + 1) {
            booking_assets.push((id, assets[(i + offset) % assets.len()].id));
        }
    }

    // Belongs to the second organization; must never leak into the first
    bookings.push(BookingRow {
        id: demo_id(0x0000_0000_0000_4000_8000_0000_0000_2000, 0),
        name: "Side project kickoff".to_string(),
        status: BookingStatus::Reserved.as_str().to_string(),
        organization_id: DEMO_OTHER_ORG_ID,
        creator_id: DEMO_OWNER_ID,
        custodian_user_id: Some(DEMO_OWNER_ID),
        custodian_team_member_id: None,
        from_at: Some(at(3, 1, 9)),
        to_at: Some(at(3, 1, 17)),
        created_at: at(2, 1, 8),
        updated_at: at(2, 1, 8),
    });

    InMemoryData {
        users,
        organizations: vec![org, other_org],
        memberships,
        team_members,
        assets,
        custodies,
        bookings,
        booking_assets,
    }
}

pub fn demo() -> InMemoryBookingStore {
    InMemoryBookingStore::new(demo_data())
}
