use anyhow::Result;
use clap::Parser;

use quote_watch_cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    quote_watch_cli::app_init()?;
    quote_watch_cli::run(cli).await
}
