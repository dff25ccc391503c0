pub mod booking_store;
pub mod fixtures;
pub mod memory;
pub mod postgres;

pub use booking_store::{BookingStore, Membership};
pub use memory::{InMemoryAsset, InMemoryBookingStore, InMemoryData, InMemoryMembership};
pub use postgres::PgBookingStore;
