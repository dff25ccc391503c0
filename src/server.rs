use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::config;
use crate::database::DatabaseManager;
use crate::services::{fixtures, PgBookingStore};
use crate::AppState;

/// How to run the HTTP server; defaults come from config
#[derive(Debug, Clone)]
pub struct ServeOptions {
    pub port: u16,
    /// Serve the built-in demo workspace instead of Postgres
    pub demo: bool,
}

impl Default for ServeOptions {
    fn default() -> Self {
        let config = config::config();
        Self {
            port: config.server.port,
            demo: config.app.demo,
        }
    }
}

/// `RUST_LOG` wins; otherwise info for this crate and request traces
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("shelf_bookings=info,tower_http=info"));
    // A second init (CLI after main, tests) is harmless
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

pub async fn build_state(demo: bool) -> anyhow::Result<AppState> {
    if demo {
        tracing::info!("Serving the in-memory demo workspace");
        return Ok(AppState::new(fixtures::demo()));
    }

    let config = config::config();
    let db = DatabaseManager::connect(&config.database)
        .await
        .context("connecting to Postgres (set DATABASE_URL, or use --demo)")?;
    if config.database.auto_migrate {
        db.migrate().await.context("applying migrations")?;
    }
    Ok(AppState::new(PgBookingStore::new(db)))
}

pub async fn serve(options: ServeOptions) -> anyhow::Result<()> {
    let config = config::config();
    if config.security.jwt_secret.is_empty() {
        anyhow::bail!("JWT_SECRET must be set in {:?}", config.environment);
    }

    let state = build_state(options.demo).await?;
    let app = crate::app(state);

    let bind_addr = format!("0.0.0.0:{}", options.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!(
        "{} bookings listening on http://{} ({:?})",
        config.app.name,
        bind_addr,
        config.environment
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
