//! Catalog server binary

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalog_server::{
    api,
    config::{AppConfig, LoggingConfig, StorageBackend},
    repository::{BookStore, MemoryBookStore, PgBookStore},
    services::seed,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    init_tracing(&config.logging);

    tracing::info!("Starting catalog server v{}", env!("CARGO_PKG_VERSION"));

    let store = connect_store(&config).await?;

    let addr = SocketAddr::new(
        config.server.host.parse::<IpAddr>().context("Invalid host address")?,
        config.server.port,
    );
    let seed_sample_data = config.catalog.seed_sample_data;

    let state = AppState::new(config, store);

    if seed_sample_data {
        seed::seed_if_empty(&state.services.catalog)
            .await
            .context("Failed to seed sample data")?;
    }

    let app = api::router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await.context("HTTP server failed")?;

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("catalog_server={},tower_http=debug", logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn connect_store(config: &AppConfig) -> anyhow::Result<Arc<dyn BookStore>> {
    match config.database.backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory book store; data is lost on restart");
            Ok(Arc::new(MemoryBookStore::new()))
        }
        StorageBackend::Postgres => {
            let pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .min_connections(config.database.min_connections)
                .connect(&config.database.url)
                .await
                .context("Failed to connect to database")?;

            tracing::info!("Connected to database");

            if config.database.run_migrations {
                sqlx::migrate!("./migrations")
                    .run(&pool)
                    .await
                    .context("Failed to run database migrations")?;
                tracing::info!("Database migrations completed");
            }

            Ok(Arc::new(PgBookStore::new(pool)))
        }
    }
}
