use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use whoami_probe::app::AppContext;
use whoami_probe::cli::{commands, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.command() == Commands::DefaultConfig {
        commands::print_default_config();
        return Ok(());
    }

    let config = cli.resolve_config()?;
    let ctx = AppContext::new(&config)?;

    match cli.command() {
        Commands::Serve => {
            commands::serve(ctx, &config).await?;
        }
        Commands::Probe => {
            commands::probe(&ctx).await?;
        }
        Commands::DefaultConfig => {}
    }

    Ok(())
}
