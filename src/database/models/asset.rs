use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// An asset attached to a booking, with its custody flag resolved
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BookingAssetRow {
    pub booking_id: Uuid,
    pub id: Uuid,
    pub title: String,
    pub available_to_book: bool,
    pub in_custody: bool,
}
