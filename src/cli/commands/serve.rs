use clap::Args;

use crate::server::{self, ServeOptions};

#[derive(Args)]
pub struct ServeArgs {
    #[arg(long, help = "Serve the built-in demo workspace instead of Postgres")]
    pub demo: bool,

    #[arg(long, help = "Port to listen on (defaults to SHELF_PORT/PORT or 3000)")]
    pub port: Option<u16>,
}

pub async fn handle(args: ServeArgs) -> anyhow::Result<()> {
    let defaults = ServeOptions::default();
    server::serve(ServeOptions {
        port: args.port.unwrap_or(defaults.port),
        demo: args.demo || defaults.demo,
    })
    .await
}
