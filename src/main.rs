use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use configuration::Config;
use database::{DbRepository, JournalStore, MemoryStore};
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

mod display;

/// The main entry point for the Tradebook application.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; DATABASE_URL may come from the environment.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = configuration::load_config_from(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    // Keep the guard alive so buffered file logs are flushed on exit.
    let _log_guard = configuration::init_tracing(&config.logging)?;

    match cli.command {
        Commands::Serve(args) => handle_serve(config, args).await,
        Commands::Stats(args) => handle_stats(config, args).await,
        Commands::Export(args) => handle_export(config, args).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A trading journal: record trades, review performance, keep notes.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file.
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the JSON API.
    Serve(ServeArgs),
    /// Print a user's dashboard metrics.
    Stats(UserArgs),
    /// Write a user's trades, playbooks and journal entries as JSON.
    Export(ExportArgs),
}

#[derive(Args)]
struct ServeArgs {
    /// Keep all data in memory instead of PostgreSQL. Nothing survives a restart.
    #[arg(long)]
    in_memory: bool,
}

#[derive(Args)]
struct UserArgs {
    /// The user's id as issued by the authentication provider.
    #[arg(long)]
    user: Uuid,
}

#[derive(Args)]
struct ExportArgs {
    #[arg(long)]
    user: Uuid,

    /// Output file; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn open_database(config: &Config) -> anyhow::Result<Arc<dyn JournalStore>> {
    let pool = database::connect(&config.database).await?;
    database::run_migrations(&pool).await?;
    Ok(Arc::new(DbRepository::new(pool)))
}

async fn handle_serve(config: Config, args: ServeArgs) -> anyhow::Result<()> {
    let store: Arc<dyn JournalStore> = if args.in_memory {
        tracing::warn!("Running with the in-memory store; data is lost on shutdown.");
        Arc::new(MemoryStore::new())
    } else {
        open_database(&config).await?
    };
    web_server::run_server(config, store).await
}

async fn handle_stats(config: Config, args: UserArgs) -> anyhow::Result<()> {
    let store = open_database(&config).await?;
    let trades = store.list_trades(args.user).await?;
    let metrics = analytics::compute_dashboard_metrics(&trades);

    println!("{}", display::metrics_table(&metrics));
    Ok(())
}

async fn handle_export(config: Config, args: ExportArgs) -> anyhow::Result<()> {
    let store = open_database(&config).await?;
    let bundle = web_server::handlers::account::ExportBundle {
        trades: store.list_trades(args.user).await?,
        playbooks: store.list_playbooks(args.user).await?,
        journal: store.list_journal(args.user).await?,
    };
    let json = serde_json::to_string_pretty(&bundle)?;

    match args.out {
        Some(path) => {
            std::fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(
                path = %path.display(),
                trades = bundle.trades.len(),
                "Export written."
            );
        }
        None => println!("{json}"),
    }
    Ok(())
}
