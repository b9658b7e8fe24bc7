use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use freshwire::app::AppContext;
use freshwire::cli::{commands, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let mut ctx = AppContext::load(cli.config.as_deref())?;
    cli.apply(&mut ctx.config);

    match cli.command {
        Commands::Scrape { .. } => {
            commands::scrape(&ctx).await?;
        }
        Commands::Analyze { .. } => {
            commands::analyze(&ctx).await?;
        }
        Commands::Run => {
            commands::run(&ctx).await?;
        }
    }

    Ok(())
}
