mod config;
mod logging;
mod server;
mod shutdown;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use susu::SusuModule;
use susu_security::SecurityContext;

use crate::config::{AppConfig, CliOverrides};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Susu Server - savings collection backend
#[derive(Parser)]
#[command(name = "susu-server")]
#[command(about = "Susu Server - savings collection backend")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port override for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print effective configuration (YAML) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use an in-memory SQLite database
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Validate configuration and exit
    Check,
    /// Apply pending migrations and exit
    Migrate,
    /// Unlink every super admin from every business
    DetachSuperAdmins,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_cli_overrides(CliOverrides {
        port: cli.port,
        verbose: cli.verbose,
        mock: cli.mock,
    })?;

    logging::init(&config.logging);

    if cli.print_config {
        println!("{}", config.to_redacted_yaml()?);
        return Ok(());
    }

    config.validate()?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => server::run(config).await,
        Commands::Check => check_config(&config),
        Commands::Migrate => migrate(&config).await,
        Commands::DetachSuperAdmins => detach_super_admins(config).await,
    }
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("checking configuration");
    println!("Configuration is valid");
    println!("{}", config.to_redacted_yaml()?);
    Ok(())
}

async fn migrate(config: &AppConfig) -> Result<()> {
    let db = susu_db::connect(&config.database)
        .await
        .context("failed to connect to the database")?;
    let result = SusuModule::migrate(&db).await?;
    println!(
        "Applied {} migration(s), {} already up to date",
        result.applied, result.skipped
    );
    for name in &result.applied_names {
        println!("  {name}");
    }
    Ok(())
}

async fn detach_super_admins(config: AppConfig) -> Result<()> {
    let db = susu_db::connect(&config.database)
        .await
        .context("failed to connect to the database")?;
    SusuModule::migrate(&db).await?;
    let module = SusuModule::new(db, config.susu)?;
    let report = module
        .services()
        .memberships
        .detach_super_admins(&SecurityContext::system())
        .await?;
    println!(
        "Detached {} super admin(s), removed {} link(s)",
        report.users.len(),
        report.links_removed
    );
    Ok(())
}
