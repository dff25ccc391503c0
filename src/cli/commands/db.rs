use anyhow::Context;
use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config;
use crate::database::DatabaseManager;

#[derive(Subcommand)]
pub enum DbCommands {
    #[command(about = "Apply pending schema migrations")]
    Migrate,

    #[command(about = "Check that the database is reachable")]
    Ping,
}

async fn connect() -> anyhow::Result<DatabaseManager> {
    DatabaseManager::connect(&config::config().database)
        .await
        .context("connecting to Postgres (is DATABASE_URL set?)")
}

pub async fn handle(cmd: DbCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let db = connect().await?;
    let result = match cmd {
        DbCommands::Migrate => {
            db.migrate().await.context("applying migrations")?;
            output_success(output_format, "Migrations applied", None)
        }
        DbCommands::Ping => {
            let started = std::time::Instant::now();
            db.health_check().await.context("database ping")?;
            let elapsed_ms = started.elapsed().as_millis();
            output_success(
                output_format,
                &format!("Database reachable ({} ms)", elapsed_ms),
                Some(json!({ "elapsed_ms": elapsed_ms })),
            )
        }
    };
    db.close().await;
    result
}
