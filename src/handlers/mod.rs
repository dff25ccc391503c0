// handlers/mod.rs - two handler tiers
//
// Public (no session) → Protected (session + selected organization)
pub mod protected; // Session and organization required (/bookings, /api/*)
pub mod public; // No authentication (/, /health)
