use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use clap::Parser;
use recordbox_api::config::{Config, LoggingConfig};
use recordbox_api::routes::configure_routes;
use recordbox_api::{PgStore, SharedStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "recordbox-api", version, about = "File and message API over PostgreSQL")]
struct Cli {
    /// Path to a TOML configuration file (defaults to ./recordbox.toml if present)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration first to get logging settings
    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    init_logging(&config.logging);

    info!(
        database = %config.database.redacted_connection_string(),
        "Connecting to database"
    );
    let store = PgStore::connect(&config.database)
        .await
        .context("Error connecting to database")?;
    info!("Database connected successfully");

    if config.database.create_schema {
        store
            .create_schema()
            .await
            .context("Failed to create database schema")?;
        info!("Database schema ensured");
    }

    let store: SharedStore = Arc::new(store);
    let limits = config.limits.clone();

    info!(
        "Starting recordbox-api on {}:{}",
        config.server.host, config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(store.clone()))
            .wrap(Logger::default())
            .configure(|cfg| configure_routes(cfg, &limits))
    })
    .bind((config.server.host.as_str(), config.server.port))
    .with_context(|| {
        format!(
            "Failed to bind {}:{}",
            config.server.host, config.server.port
        )
    })?
    .run()
    .await?;

    Ok(())
}

fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
