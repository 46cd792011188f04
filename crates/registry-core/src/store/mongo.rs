//! MongoDB repositories

use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::options::{IndexOptions, ReturnDocument};
use mongodb::{Collection, Database, IndexModel};
use tracing::{error, info};

use super::{EntityStore, PersistenceResult};
use crate::entity::{EntityKind, RegistryEntity};
use crate::shared::error::{RegistryError, Result};
use crate::shared::tsid::TsidGenerator;

/// Store for one entity type, backed by its own collection.
/// Documents are addressed by their `id` field.
pub struct MongoStore<E: RegistryEntity> {
    collection: Collection<E>,
}

impl<E: RegistryEntity> MongoStore<E> {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(E::KIND.collection_name()),
        }
    }

    fn store_failure(operation: &str, id: Option<&str>, e: mongodb::error::Error) -> PersistenceResult<E> {
        error!(
            entity = E::KIND.as_str(),
            operation,
            id = ?id,
            error = %e,
            "Store operation failed"
        );
        PersistenceResult::failure(RegistryError::from(e))
    }
}

#[async_trait]
impl<E: RegistryEntity> EntityStore<E> for MongoStore<E> {
    async fn create(&self, mut entity: E) -> PersistenceResult<E> {
        let id = TsidGenerator::generate();
        entity.set_id(id.clone());

        match self.collection.insert_one(&entity).await {
            Ok(_) => PersistenceResult::success(entity, format!("{} created", E::KIND.label())),
            Err(e) => Self::store_failure("create", Some(&id), e),
        }
    }

    async fn update(&self, entity: E) -> PersistenceResult<E> {
        let Some(id) = entity.id().map(str::to_string) else {
            return PersistenceResult::failure(RegistryError::validation(E::KIND.label(), vec!["id"]));
        };

        let replaced = self
            .collection
            .find_one_and_replace(doc! { "id": id.as_str() }, &entity)
            .return_document(ReturnDocument::After)
            .await;

        match replaced {
            Ok(Some(updated)) => PersistenceResult::success(updated, format!("{} modified", E::KIND.label())),
            Ok(None) => PersistenceResult::not_found(&id),
            Err(e) => Self::store_failure("update", Some(&id), e),
        }
    }

    async fn delete(&self, id: &str) -> PersistenceResult<E> {
        match self.collection.find_one_and_delete(doc! { "id": id }).await {
            Ok(Some(removed)) => PersistenceResult::success(removed, format!("{} removed", E::KIND.label())),
            Ok(None) => PersistenceResult::not_found(id),
            Err(e) => Self::store_failure("delete", Some(id), e),
        }
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<E>> {
        Ok(self.collection.find_one(doc! { "id": id }).await?)
    }
}

/// Create the unique `id` index of every entity collection
pub async fn initialize_indexes(db: &Database) -> std::result::Result<(), mongodb::error::Error> {
    info!("Initializing MongoDB indexes...");

    for kind in EntityKind::ALL {
        let collection = db.collection::<mongodb::bson::Document>(kind.collection_name());
        collection
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "id": 1 })
                    .options(IndexOptions::builder().unique(true).background(true).build())
                    .build(),
            )
            .await?;
    }

    info!("MongoDB indexes initialized successfully");
    Ok(())
}
