pub mod memory;
pub mod pool;
pub mod postgres;
pub mod store;

use std::sync::Arc;

use crate::config::{Config, StorageBackend};
use crate::error::{Error, Result};

pub use memory::MemStore;
pub use postgres::PgStore;
pub use store::Store;

/// Builds the store selected by configuration. Postgres pools are migrated before use.
pub async fn connect(config: &Config) -> Result<Arc<dyn Store>> {
    match config.storage_backend {
        StorageBackend::Memory => {
            tracing::info!("Using in-memory store");
            Ok(Arc::new(MemStore::new()))
        }
        StorageBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .ok_or_else(|| Error::Config("DATABASE_URL is not set".to_string()))?;
            let pool = pool::create_pool(url).await?;
            pool::run_migrations(&pool).await?;
            tracing::info!("Using PostgreSQL store");
            Ok(Arc::new(PgStore::new(pool)))
        }
    }
}
