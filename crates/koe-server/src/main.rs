use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;

use koe_api::anilist::AniListClient;
use koe_core::config::AppConfig;
use koe_server::logging::init_logging;
use koe_server::{AppState, DbHandle};

const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Parser)]
#[command(name = "koe", version, about = "Anime watch tracker with shared voice-actor highlighting")]
struct Cli {
    /// Config file (defaults to the platform config dir, then built-in defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on, overrides `server.bind`
    #[arg(short, long)]
    bind: Option<String>,

    /// SQLite database file
    #[arg(long)]
    db: Option<PathBuf>,

    /// -v for debug, -vv for trace
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("koe: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };
    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }

    init_logging(&config.logging, cli.verbose)?;

    let db_path = cli.db.unwrap_or_else(AppConfig::db_path);
    AppConfig::ensure_parent(&db_path)?;
    let db = DbHandle::open(&db_path)?;
    tracing::info!(path = %db_path.display(), "database ready");

    let catalog = AniListClient::with_endpoint(
        config.catalog.endpoint.clone(),
        config.catalog.search_limit,
        Duration::from_secs(config.catalog.timeout_secs),
    )?;

    spawn_session_purge(db.clone());

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");

    let state = AppState::new(db, catalog, config.auth);
    koe_server::serve(state, listener, shutdown_signal()).await?;

    tracing::info!("shut down");
    Ok(())
}

fn spawn_session_purge(db: DbHandle) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_PURGE_INTERVAL);
        loop {
            interval.tick().await;
            match db.purge_expired_sessions().await {
                Ok(0) => {}
                Ok(n) => tracing::info!(purged = n, "expired sessions removed"),
                Err(e) => tracing::warn!("session purge failed: {e}"),
            }
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("cannot listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
