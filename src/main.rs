use shelf_bookings::server::{self, ServeOptions};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    server::init_tracing();

    let config = shelf_bookings::config::config();
    tracing::info!("Starting {} in {:?} mode", config.app.name, config.environment);

    server::serve(ServeOptions::default()).await
}
