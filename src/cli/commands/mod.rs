pub mod auth;
pub mod bookings;
pub mod db;
pub mod serve;
