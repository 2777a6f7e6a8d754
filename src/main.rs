//! Blog API server entry point.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use blog_api::api::{serve, AppState};
use blog_api::config::Config;
use blog_api::db::{bootstrap, Storage};
use blog_api::metrics;
use blog_api::monitor::SysinfoSampler;
use blog_api::BlogError;

/// How often the Prometheus recorder drains its histogram buckets.
const PROMETHEUS_UPKEEP_INTERVAL: Duration = Duration::from_secs(5);

/// Blog articles REST API.
#[derive(Parser, Debug)]
#[command(name = "blog-api")]
#[command(about = "REST API for blog articles with health and metrics endpoints")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// HTTP listen port (overrides PORT).
    #[arg(short, long, global = true)]
    port: Option<u16>,

    /// SQLite database file (overrides DATABASE_PATH).
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Serve,

    /// Check configuration validity.
    CheckConfig,

    /// Create the articles table and seed demo rows, then exit.
    InitDb,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration, CLI flags win over the environment
    let mut config = Config::load()?;
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(database) = args.database {
        config.database_path = database;
    }

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("blog_api=debug,tower_http=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.rust_log))
    };

    tracing_subscriber::registry()
        .with(config.log_json.then(|| fmt::layer().json()))
        .with((!config.log_json).then(fmt::layer))
        .with(filter)
        .init();

    match args.command {
        Some(Command::CheckConfig) => cmd_check_config(&config),
        Some(Command::InitDb) => cmd_init_db(&config).await,
        Some(Command::Serve) | None => cmd_serve(config).await,
    }
}

/// Check configuration validity.
fn cmd_check_config(config: &Config) -> anyhow::Result<()> {
    println!("======================================================================");
    println!("BLOG API - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Bind Address: {}", config.bind_addr());
    println!("  Database: {}", config.database_path.display());
    println!("  CPU Sample Window: {}ms", config.cpu_sample_ms);
    println!("  CORS: {}", if config.cors_permissive { "Permissive" } else { "Disabled" });
    println!("  Log Format: {}", if config.log_json { "JSON" } else { "Text" });
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Create the table and seed demo rows.
async fn cmd_init_db(config: &Config) -> anyhow::Result<()> {
    config.validate().map_err(BlogError::InvalidConfig)?;

    let storage = Storage::new(config.database_path.clone());
    let seeded = bootstrap(&storage).await?;
    println!(
        "Database {} ready ({} demo articles inserted)",
        config.database_path.display(),
        seeded
    );

    Ok(())
}

/// Run the HTTP server until a shutdown signal arrives.
async fn cmd_serve(config: Config) -> anyhow::Result<()> {
    config.validate().map_err(BlogError::InvalidConfig)?;

    let storage = Storage::new(config.database_path.clone());
    bootstrap(&storage).await?;

    let sampler = Arc::new(SysinfoSampler::new(config.cpu_sample_window()));
    let mut app_state = AppState::new(storage, sampler).with_cors(config.cors_permissive);

    // Initialize metrics
    if let Some(handle) = metrics::install_prometheus() {
        metrics::spawn_upkeep(handle.clone(), PROMETHEUS_UPKEEP_INTERVAL);
        app_state = app_state.with_prometheus(handle);
    }
    metrics::init_metrics();

    let listener = TcpListener::bind(config.bind_addr()).await?;
    info!(addr = %listener.local_addr()?, database = %config.database_path.display(), "HTTP server listening");

    serve(listener, app_state).await?;

    info!("Server stopped");
    Ok(())
}
