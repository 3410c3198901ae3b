//! Builders choosing the store adapters behind the HTTP state.

use std::sync::Arc;

use mockable::DefaultClock;
use tracing::{info, warn};

use portfolio::domain::ports::{ContactMessageRepository, ProjectRepository, UserRepository};
use portfolio::inbound::http::state::{HttpState, HttpStatePorts};
use portfolio::outbound::memory::InMemoryStore;
use portfolio::outbound::password::Argon2PasswordHasher;
use portfolio::outbound::persistence::{
    DbPool, DieselContactMessageRepository, DieselProjectRepository, DieselUserRepository,
    MigrationError, PoolConfig, PoolError, run_pending_migrations,
};

use super::ServerConfig;

/// Failures while preparing the database-backed store.
#[derive(Debug, thiserror::Error)]
pub enum StoreSetupError {
    #[error(transparent)]
    Migration(#[from] MigrationError),
    #[error("migration task failed: {0}")]
    MigrationTask(#[from] tokio::task::JoinError),
    #[error("failed to build connection pool: {0}")]
    Pool(String),
}

impl From<PoolError> for StoreSetupError {
    fn from(error: PoolError) -> Self {
        Self::Pool(error.into_message())
    }
}

/// Apply bundled migrations and open the pool.
async fn connect(database_url: &str, max_size: u32) -> Result<DbPool, StoreSetupError> {
    let url = database_url.to_owned();
    let applied = tokio::task::spawn_blocking(move || run_pending_migrations(&url)).await??;
    info!(applied, "database migrations up to date");
    let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(max_size)).await?;
    Ok(pool)
}

fn ports_over(
    users: Arc<dyn UserRepository>,
    projects: Arc<dyn ProjectRepository>,
    contact_messages: Arc<dyn ContactMessageRepository>,
) -> HttpStatePorts {
    HttpStatePorts {
        users,
        projects,
        contact_messages,
        hasher: Arc::new(Argon2PasswordHasher::default()),
        clock: Arc::new(DefaultClock),
    }
}

/// PostgreSQL adapters when a database URL is configured, otherwise the
/// in-memory store.
pub(crate) async fn build_http_state(config: &ServerConfig) -> Result<HttpState, StoreSetupError> {
    let ports = match config.database_url.as_deref() {
        Some(url) => {
            let pool = connect(url, config.pool_max_size).await?;
            ports_over(
                Arc::new(DieselUserRepository::new(pool.clone())),
                Arc::new(DieselProjectRepository::new(pool.clone())),
                Arc::new(DieselContactMessageRepository::new(pool)),
            )
        }
        None => {
            warn!("no database configured; data is kept in memory and lost on restart");
            let store = Arc::new(InMemoryStore::default());
            ports_over(store.clone(), store.clone(), store)
        }
    };
    Ok(HttpState::new(ports, config.resume.clone()))
}
