//! Runs the taskdesk web server.
//!
//! Configuration is read from the environment (see [`taskdesk::config`]).
//! Without `DATABASE_URL` the server keeps its data in memory.

use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use mockable::DefaultClock;
use std::sync::Arc;
use taskdesk::{
    config::{AppConfig, ConfigError},
    task::{
        adapters::{memory::InMemoryTaskRepository, postgres::PostgresTaskRepository},
        ports::{TaskRepositoryError, TaskStore},
        services::TaskServiceError,
    },
    telemetry::{self, TelemetryError},
    web::{self, AppState},
};
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Errors that stop the server from starting or running.
#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error("failed to build connection pool: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
    #[error("failed to prepare database schema: {0}")]
    Schema(#[source] TaskRepositoryError),
    #[error("failed to seed default category: {0}")]
    Seed(#[source] TaskServiceError),
    #[error("failed to load templates: {0}")]
    Templates(#[from] minijinja::Error),
    #[error("server I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let config = AppConfig::from_env()?;
    telemetry::init(&config.log)?;

    match config.database_url.as_deref() {
        Some(url) => {
            let manager = ConnectionManager::<PgConnection>::new(url);
            let pool = Pool::builder().max_size(config.pool_size).build(manager)?;
            let repository = PostgresTaskRepository::new(pool);
            repository
                .ensure_schema()
                .await
                .map_err(StartupError::Schema)?;
            info!(pool_size = config.pool_size, "using PostgreSQL store");
            serve(&config, Arc::new(repository)).await
        }
        None => {
            warn!("DATABASE_URL not set; tasks are kept in memory only");
            serve(&config, Arc::new(InMemoryTaskRepository::new())).await
        }
    }
}

async fn serve<R>(config: &AppConfig, repository: Arc<R>) -> Result<(), StartupError>
where
    R: TaskStore + 'static,
{
    let state = AppState::new(repository, Arc::new(DefaultClock))?;
    if let Some(category) = state
        .categories()
        .ensure_default()
        .await
        .map_err(StartupError::Seed)?
    {
        info!(category_id = %category.id(), "seeded default category");
    }

    let listener = TcpListener::bind(config.bind).await?;
    info!(address = %config.bind, "listening");
    axum::serve(listener, web::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
    }
}
