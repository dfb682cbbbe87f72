//! # smarthomed — smarthome daemon
//!
//! Composition root that wires the storage backend, services, and HTTP
//! adapter together.
//!
//! ## Responsibilities
//! - Parse configuration (CLI args, env vars, config file)
//! - Select the storage backend (`SQLite` or single JSON file)
//! - Seed the schema, optionally resetting it first (`migrate`)
//! - Construct application services, injecting adapters via port traits
//! - Build the axum router, bind to a TCP port and serve
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use anyhow::Context;
use clap::{Parser, Subcommand};

use smarthome_adapter_http_axum::router;
use smarthome_adapter_http_axum::state::AppState;
use smarthome_adapter_storage_file::JsonFileStore;
use smarthome_adapter_storage_sqlite_sqlx::{
    Database, SqliteDeviceStateRepository, SqliteHealthProbe, SqliteSeeder,
};
use smarthome_app::auth::SkillTokenGuard;
use smarthome_app::ports::{DeviceStateRepository, HealthProbe, SchemaSeeder};
use smarthome_app::services::device_state_service::DeviceStateService;
use smarthome_app::services::health_service::HealthService;
use smarthome_app::services::seed_service::SeedService;

use crate::config::{Backend, Config};

#[derive(Parser)]
#[command(name = "smarthomed", version, about = "Smart-home device state daemon")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Seed the storage backend and serve the HTTP API (default).
    Serve,
    /// Create the schema and default rows, then exit.
    Migrate {
        /// Drop every managed table first, regardless of environment.
        #[arg(long)]
        reset: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load().context("failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&config.logging.filter))
        .init();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => run(&config, None).await,
        Command::Migrate { reset } => run(&config, Some(config.migrate_resets(reset))).await,
    }
}

/// Open the configured backend and either serve (`migrate == None`) or seed
/// once and exit (`migrate == Some(reset)`).
async fn run(config: &Config, migrate: Option<bool>) -> anyhow::Result<()> {
    match config.backend() {
        Backend::File(path) => {
            tracing::info!(path = %path.display(), "using json file backend");
            let store = JsonFileStore::new(path, config.device.default_id);
            match migrate {
                Some(reset) => migrate_with(config, store, reset).await,
                None => serve(config, store.clone(), store.clone(), store).await,
            }
        }
        Backend::Sqlite(url) => {
            tracing::info!(url, "using sqlite backend");
            let db = smarthome_adapter_storage_sqlite_sqlx::Config {
                database_url: url.to_string(),
            }
            .build()
            .await
            .context("failed to open sqlite database")?;
            match migrate {
                Some(reset) => {
                    migrate_with(config, SqliteSeeder::new(db.pool().clone()), reset).await
                }
                None => serve_sqlite(config, &db).await,
            }
        }
    }
}

async fn serve_sqlite(config: &Config, db: &Database) -> anyhow::Result<()> {
    let pool = db.pool();
    serve(
        config,
        SqliteDeviceStateRepository::new(pool.clone()),
        SqliteHealthProbe::new(pool.clone()),
        SqliteSeeder::new(pool.clone()),
    )
    .await
}

async fn migrate_with<S: SchemaSeeder>(
    config: &Config,
    seeder: S,
    reset: bool,
) -> anyhow::Result<()> {
    let report = SeedService::new(seeder, config.seed_options())
        .run(reset)
        .await
        .context("migration failed")?;
    tracing::info!(
        status = report.status,
        tables = ?report.tables,
        inserted = report.inserted,
        reset,
        "migration complete"
    );
    Ok(())
}

async fn serve<R, H, S>(config: &Config, repo: R, probe: H, seeder: S) -> anyhow::Result<()>
where
    R: DeviceStateRepository + Send + Sync + 'static,
    H: HealthProbe + Send + Sync + 'static,
    S: SchemaSeeder,
{
    SeedService::new(seeder, config.seed_options())
        .run(false)
        .await
        .context("failed to seed storage")?;

    let guard = SkillTokenGuard::new(config.auth.skill_token.clone());
    if !guard.is_configured() {
        tracing::warn!("ALEXA_SKILL_TOKEN is not set, device routes will answer 500");
    }

    let state = AppState::new(
        DeviceStateService::new(repo),
        HealthService::new(probe),
        guard,
        config.device.default_id,
    );
    let app = router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(addr = %bind_addr, "smarthomed listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("smarthomed stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
        tracing::info!("received ctrl-c, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
                tracing::info!("received terminate signal, shutting down");
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
