//! Store bundle selected from configuration.

use std::sync::Arc;

use tracing::info;

use notice_core::config::{DatabaseConfig, StoreProvider};
use notice_core::result::AppResult;

use crate::connection::DatabasePool;
use crate::memory::MemoryStore;
use crate::migration::run_migrations;
use crate::repositories::{
    NoticeRepository, NoticeTypeRepository, ObservationRepository, QueueRepository,
    SettingRepository, UserRepository,
};
use crate::store::{
    NoticeStore, NoticeTypeStore, ObservationStore, QueueStore, SettingStore, UserStore,
};

/// Every store the services need, behind trait objects.
#[derive(Debug, Clone)]
pub struct Stores {
    /// Mirrored users.
    pub users: Arc<dyn UserStore>,
    /// Notice types.
    pub notice_types: Arc<dyn NoticeTypeStore>,
    /// Notice settings.
    pub settings: Arc<dyn SettingStore>,
    /// Website notices.
    pub notices: Arc<dyn NoticeStore>,
    /// Observations.
    pub observations: Arc<dyn ObservationStore>,
    /// Batch queue.
    pub queue: Arc<dyn QueueStore>,
    /// The PostgreSQL pool, when that provider is in use.
    pub pool: Option<DatabasePool>,
}

impl Stores {
    /// Build the stores for the configured provider.
    ///
    /// With `migrate`, pending PostgreSQL migrations run first.
    pub async fn connect(config: &DatabaseConfig, migrate: bool) -> AppResult<Self> {
        match config.provider {
            StoreProvider::Postgres => {
                let pool = DatabasePool::connect(config).await?;
                if migrate {
                    run_migrations(pool.pool()).await?;
                }
                Ok(Self::postgres(pool))
            }
            StoreProvider::Memory => {
                info!("Using in-memory store; data is lost on restart");
                Ok(Self::memory())
            }
        }
    }

    /// Stores backed by PostgreSQL repositories.
    pub fn postgres(pool: DatabasePool) -> Self {
        let pg = pool.pool().clone();
        Self {
            users: Arc::new(UserRepository::new(pg.clone())),
            notice_types: Arc::new(NoticeTypeRepository::new(pg.clone())),
            settings: Arc::new(SettingRepository::new(pg.clone())),
            notices: Arc::new(NoticeRepository::new(pg.clone())),
            observations: Arc::new(ObservationRepository::new(pg.clone())),
            queue: Arc::new(QueueRepository::new(pg)),
            pool: Some(pool),
        }
    }

    /// Stores sharing one in-memory table set.
    pub fn memory() -> Self {
        let store = MemoryStore::new();
        Self {
            users: Arc::new(store.clone()),
            notice_types: Arc::new(store.clone()),
            settings: Arc::new(store.clone()),
            notices: Arc::new(store.clone()),
            observations: Arc::new(store.clone()),
            queue: Arc::new(store),
            pool: None,
        }
    }

    /// Check the backing database. The memory store is always healthy.
    pub async fn health_check(&self) -> AppResult<bool> {
        match &self.pool {
            Some(pool) => pool.health_check().await,
            None => Ok(true),
        }
    }

    /// Release database connections.
    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}
