pub mod availability;
pub mod client_hints;
pub mod loader;
pub mod model;
pub mod pagination;
pub mod params;
pub mod status;
pub mod user_prefs;

pub use loader::{load, BookingListItem, BookingsLoaderData, Loaded, LoaderError, LoaderRequest};
pub use model::{BookingAsset, BookingPage, BookingQuery, BookingWithRelations};
pub use status::BookingStatus;
