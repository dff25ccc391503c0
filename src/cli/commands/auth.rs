use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use crate::auth::{generate_session_token, SESSION_COOKIE};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Mint a session token for a user (signed with JWT_SECRET)")]
    Token {
        #[arg(help = "User id")]
        user_id: Uuid,
        #[arg(help = "User email")]
        email: String,
    },
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Token { user_id, email } => {
            let token = generate_session_token(user_id, &email)?;
            match output_format {
                OutputFormat::Json => output_success(
                    output_format,
                    "Session token created",
                    Some(json!({ "token": token, "cookie": SESSION_COOKIE })),
                ),
                // Bare token so it can be captured by scripts
                OutputFormat::Text => {
                    println!("{}", token);
                    Ok(())
                }
            }
        }
    }
}
