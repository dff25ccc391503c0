pub mod asset;
pub mod booking;
pub mod organization;
pub mod team_member;
pub mod user;

pub use asset::BookingAssetRow;
pub use booking::BookingRow;
pub use organization::{MembershipRow, Organization};
pub use team_member::TeamMember;
pub use user::User;
