//! In-memory repositories for embedded mode and tests

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use super::{EntityStore, PersistenceResult};
use crate::entity::RegistryEntity;
use crate::shared::error::{RegistryError, Result};
use crate::shared::tsid::TsidGenerator;

pub struct MemoryStore<E: RegistryEntity> {
    entities: RwLock<HashMap<String, E>>,
    unavailable: AtomicBool,
}

impl<E: RegistryEntity> MemoryStore<E> {
    pub fn new() -> Self {
        Self {
            entities: RwLock::new(HashMap::new()),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Make every operation fail as if the backing store were unreachable
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.entities.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.read().is_empty()
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(RegistryError::store(format!("{} store unavailable", E::KIND.label())))
        } else {
            Ok(())
        }
    }
}

impl<E: RegistryEntity> Default for MemoryStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: RegistryEntity> EntityStore<E> for MemoryStore<E> {
    async fn create(&self, mut entity: E) -> PersistenceResult<E> {
        if let Err(e) = self.check_available() {
            return e.into();
        }
        let id = TsidGenerator::generate();
        entity.set_id(id.clone());
        self.entities.write().insert(id, entity.clone());
        PersistenceResult::success(entity, format!("{} created", E::KIND.label()))
    }

    async fn update(&self, entity: E) -> PersistenceResult<E> {
        if let Err(e) = self.check_available() {
            return e.into();
        }
        let Some(id) = entity.id().map(str::to_string) else {
            return RegistryError::validation(E::KIND.label(), vec!["id"]).into();
        };

        let mut entities = self.entities.write();
        match entities.get_mut(&id) {
            Some(stored) => {
                *stored = entity.clone();
                PersistenceResult::success(entity, format!("{} modified", E::KIND.label()))
            }
            None => PersistenceResult::not_found(&id),
        }
    }

    async fn delete(&self, id: &str) -> PersistenceResult<E> {
        if let Err(e) = self.check_available() {
            return e.into();
        }
        match self.entities.write().remove(id) {
            Some(removed) => PersistenceResult::success(removed, format!("{} removed", E::KIND.label())),
            None => PersistenceResult::not_found(id),
        }
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<E>> {
        self.check_available()?;
        Ok(self.entities.read().get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{InterworkingService, Platform};

    fn platform() -> Platform {
        Platform::new("Lab")
            .with_description("test lab")
            .with_service(InterworkingService::new("https://lab.example.org", "IM1"))
    }

    #[tokio::test]
    async fn test_create_then_find() {
        let store = MemoryStore::<Platform>::new();
        let created = store.create(platform()).await.into_entity().unwrap();
        let id = created.id.clone().unwrap();

        let found = store.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn test_create_replaces_client_id() {
        let store = MemoryStore::<Platform>::new();
        let mut entity = platform();
        entity.id = Some("client-chosen".to_string());

        let created = store.create(entity).await.into_entity().unwrap();
        assert_ne!(created.id.as_deref(), Some("client-chosen"));
        assert!(store.find_by_id("client-chosen").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = MemoryStore::<Platform>::new();
        let mut entity = platform();
        entity.id = Some("P404".to_string());

        let result = store.update(entity).await;
        assert_eq!(result.status(), 404);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_update_replaces_entity() {
        let store = MemoryStore::<Platform>::new();
        let mut created = store.create(platform()).await.into_entity().unwrap();
        created.name = Some("Renamed".to_string());

        let result = store.update(created.clone()).await;
        assert_eq!(result.status(), 200);

        let found = store.find_by_id(created.id.as_deref().unwrap()).await.unwrap().unwrap();
        assert_eq!(found.name.as_deref(), Some("Renamed"));
    }

    #[tokio::test]
    async fn test_repeated_delete() {
        let store = MemoryStore::<Platform>::new();
        let created = store.create(platform()).await.into_entity().unwrap();
        let id = created.id.unwrap();

        assert_eq!(store.delete(&id).await.status(), 200);
        assert_eq!(store.delete(&id).await.status(), 404);
        assert_eq!(store.delete(&id).await.status(), 404);
    }

    #[tokio::test]
    async fn test_unavailable_store() {
        let store = MemoryStore::<Platform>::new();
        store.set_unavailable(true);

        assert_eq!(store.create(platform()).await.status(), 500);
        assert!(store.find_by_id("P1").await.is_err());
        assert!(store.is_empty());
    }
}
