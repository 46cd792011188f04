//! Entity repositories
//!
//! One store per entity type. Writes return a [`PersistenceResult`] that is
//! already in reply shape; reads return `Ok(None)` for an absent id and keep
//! store faults as a separate error.

pub mod memory;
pub mod mongo;
pub mod result;

use async_trait::async_trait;
use std::sync::Arc;

use crate::entity::{Device, InformationModel, Platform, RegistryEntity, Resource, SmartSpace};
use crate::shared::error::Result;

pub use memory::MemoryStore;
pub use mongo::{initialize_indexes, MongoStore};
pub use result::PersistenceResult;

/// Persistence operations for one entity type
#[async_trait]
pub trait EntityStore<E: RegistryEntity>: Send + Sync {
    /// Insert the entity under a freshly assigned id. Any id it carries is replaced.
    async fn create(&self, entity: E) -> PersistenceResult<E>;

    /// Replace the stored entity with the same id
    async fn update(&self, entity: E) -> PersistenceResult<E>;

    /// Delete by id, returning the removed entity
    async fn delete(&self, id: &str) -> PersistenceResult<E>;

    async fn find_by_id(&self, id: &str) -> Result<Option<E>>;
}

/// One store per entity type, shared by every consumer and the authorization gate
#[derive(Clone)]
pub struct RegistryStores {
    pub platforms: Arc<dyn EntityStore<Platform>>,
    pub resources: Arc<dyn EntityStore<Resource>>,
    pub smart_spaces: Arc<dyn EntityStore<SmartSpace>>,
    pub devices: Arc<dyn EntityStore<Device>>,
    pub information_models: Arc<dyn EntityStore<InformationModel>>,
}

impl RegistryStores {
    pub fn mongo(db: &mongodb::Database) -> Self {
        Self {
            platforms: Arc::new(MongoStore::<Platform>::new(db)),
            resources: Arc::new(MongoStore::<Resource>::new(db)),
            smart_spaces: Arc::new(MongoStore::<SmartSpace>::new(db)),
            devices: Arc::new(MongoStore::<Device>::new(db)),
            information_models: Arc::new(MongoStore::<InformationModel>::new(db)),
        }
    }

    pub fn memory() -> Self {
        Self {
            platforms: Arc::new(MemoryStore::<Platform>::new()),
            resources: Arc::new(MemoryStore::<Resource>::new()),
            smart_spaces: Arc::new(MemoryStore::<SmartSpace>::new()),
            devices: Arc::new(MemoryStore::<Device>::new()),
            information_models: Arc::new(MemoryStore::<InformationModel>::new()),
        }
    }
}
