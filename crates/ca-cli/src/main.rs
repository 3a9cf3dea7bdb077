use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ca_cli::commands::{check, notices, remove};
use ca_cli::{Cli, Commands, Config};

fn api_client(config: &Config) -> Result<ca_api::Client> {
    let client = ca_api::Client::new(config.retry_policy())
        .context("failed to build API client")?
        .with_roster_base(config.roster_base_url.clone())
        .with_sessions_base(config.sessions_base_url.clone());
    Ok(client)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let Some(command) = cli.command else {
        // No subcommand, show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let client = api_client(&config)?;
    let runtime = tokio::runtime::Runtime::new().context("failed to initialize tokio runtime")?;

    match command {
        Commands::Check { json } => runtime.block_on(check::run(&client, &config, json))?,
        Commands::SendNotices => runtime.block_on(notices::run(&client, &config))?,
        Commands::Remove => runtime.block_on(remove::run(&client, &config))?,
    }

    Ok(())
}
