use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use league_tracker::agents::create_backend;
use league_tracker::api::{build_router, state::AppState};
use league_tracker::calculate::{compute_all_stats, StatsContext};
use league_tracker::config::AppConfig;
use league_tracker::export::{export_league, write_export};
use league_tracker::season::resolve_season;
use league_tracker::storage::{Database, StorageConfig};
use league_tracker::summary::DailySummaryCache;

#[derive(Parser)]
#[command(name = "league-tracker")]
#[command(about = "Volleyball league tracker with seasonal statistics")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Database file (overrides the config file)
    #[arg(long)]
    database: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,
    },

    /// Create the database schema and exit
    InitDb,

    /// Print the standings table
    Stats {
        /// "lifetime", "current" or a season id
        #[arg(long, default_value = "current")]
        season: String,
    },

    /// List seasons
    Seasons,

    /// Print today's summary, generating it if needed
    Summary,

    /// Write players, seasons and matches to a JSON file
    Export {
        #[arg(long)]
        out: PathBuf,
    },
}

fn init_tracing(level: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    if let Some(path) = cli.database {
        config.database_path = path;
    }

    let level = cli.log_level.clone().unwrap_or_else(|| config.log_level.clone());
    init_tracing(&level, cli.json_logs);

    tracing::info!("Starting league-tracker v{}", env!("CARGO_PKG_VERSION"));

    let storage = StorageConfig::new(config.database_path.clone());
    let db = Database::from_config(&storage).context("opening database")?;
    let today = Utc::now().date_naive();

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            config.validate()?;

            let backend = create_backend(&config.ai)?;
            let addr = format!("{}:{}", config.server.host, config.server.port);
            let state = AppState::new(db, backend, Arc::new(config));
            let app = build_router(state);

            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("API listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::InitDb => {
            println!("Database ready at {}", storage.database_path.display());
        }
        Commands::Stats { season } => {
            let filter = resolve_season(&db, Some(season.as_str()), today).await?;
            let players = db.list_players().await?;
            let matches = db.load_matches(filter.season_id()).await?;
            let ctx = StatsContext::new(
                filter.window(),
                today,
                config.stats.inactivity_policy(),
            );
            let stats = compute_all_stats(&players, &matches, &ctx);

            println!(
                "{:<4} {:<24} {:>4} {:>4} {:>4} {:>6} {:>5} {:>8}",
                "#", "Player", "W", "L", "T", "Games", "Win%", "Streak"
            );
            for (rank, s) in stats.iter().enumerate() {
                println!(
                    "{:<4} {:<24} {:>4} {:>4} {:>4} {:>6} {:>4}% {:>8}",
                    rank + 1,
                    s.name,
                    s.record.wins,
                    s.record.losses,
                    s.record.ties,
                    s.record.total_games,
                    s.win_percentage,
                    format!("{}w {}", s.streak.count, s.streak.kind),
                );
            }
        }
        Commands::Seasons => {
            let seasons = db.list_seasons().await?;
            if seasons.is_empty() {
                println!("No seasons yet.");
            }
            for s in seasons {
                println!(
                    "{:>4}  {:<20} {} to {}{}",
                    s.id,
                    s.name,
                    s.start_date,
                    s.end_date,
                    if s.is_active { "  (active)" } else { "" }
                );
            }
        }
        Commands::Summary => {
            let backend = create_backend(&config.ai)?;
            let cache = DailySummaryCache::new(
                db,
                backend,
                config.stats.inactivity_policy(),
                config.stats.summary_recent_matches,
            );
            let outcome = cache.get_or_generate(today).await?;
            println!("=== {} ===", outcome.date);
            println!("{}", outcome.summary);
            if outcome.cached {
                println!("\n(cached)");
            }
        }
        Commands::Export { out } => {
            let export = export_league(&db).await?;
            write_export(&export, &out)?;
            println!(
                "Exported {} players, {} seasons, {} matches to {}",
                export.players.len(),
                export.seasons.len(),
                export.matches.len(),
                out.display()
            );
        }
    }

    Ok(())
}
