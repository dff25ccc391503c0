use super::model::{BookingAsset, BookingWithRelations};

/// An asset cannot be reserved when it is flagged unbookable or someone holds it in custody
pub fn is_asset_unavailable(asset: &BookingAsset) -> bool {
    !asset.available_to_book || asset.in_custody
}

/// Whether the list should warn that this booking includes unavailable assets.
/// Finished bookings never warn.
pub fn has_unavailable_assets(booking: &BookingWithRelations) -> bool {
    !booking.status.is_finished() && booking.assets.iter().any(is_asset_unavailable)
}
