//! Request Consumer
//!
//! Handles the deliveries of one request queue.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error, info, info_span, warn, Instrument};

use registry_common::{Delivery, Disposition};
use registry_queue::{DeliveryHandler, QueuePublisher};

use super::operation::Operation;
use super::response::RegistryResponse;
use crate::auth::AuthorizationGate;
use crate::entity::RegistryEntity;
use crate::notification::NotificationPublisher;
use crate::shared::error::{RegistryError, Result};
use crate::store::result::STATUS_OK;
use crate::store::{EntityStore, PersistenceResult};
use crate::validation;

pub struct RequestConsumer<E: RegistryEntity> {
    operation: Operation,
    store: Arc<dyn EntityStore<E>>,
    gate: Arc<AuthorizationGate>,
    publisher: Arc<dyn QueuePublisher>,
    notifier: Arc<NotificationPublisher>,
}

impl<E: RegistryEntity> RequestConsumer<E> {
    pub fn new(
        operation: Operation,
        store: Arc<dyn EntityStore<E>>,
        gate: Arc<AuthorizationGate>,
        publisher: Arc<dyn QueuePublisher>,
        notifier: Arc<NotificationPublisher>,
    ) -> Self {
        Self {
            operation,
            store,
            gate,
            publisher,
            notifier,
        }
    }

    /// Run a delivery through decode, validate, authorize and persist.
    ///
    /// Never fails: every error becomes a result carrying its status code.
    pub async fn process(&self, delivery: &Delivery) -> PersistenceResult<E> {
        let (id, result) = match self.decode(&delivery.payload) {
            Ok(entity) => {
                entity.log_summary("decoded");
                // A client-supplied id on create is discarded, so it is not logged
                let id = match self.operation {
                    Operation::Create => None,
                    _ => entity.id().map(str::to_string),
                };
                let result = self
                    .execute(entity, delivery.bearer_token())
                    .await
                    .unwrap_or_else(PersistenceResult::failure);
                (id, result)
            }
            Err(e) => (None, PersistenceResult::failure(e)),
        };

        let status = result.status();
        if status >= 500 {
            error!(status, id = ?id, error = %result.message(), "Request failed");
        } else if status != STATUS_OK {
            info!(status, id = ?id, error = %result.message(), "Request rejected");
        }
        result
    }

    async fn execute(&self, entity: E, token: Option<&str>) -> Result<PersistenceResult<E>> {
        self.validate(&entity)?;

        if self.operation.requires_authorization(E::KIND) {
            let stored = self.load_target(&entity).await?;
            self.authorize(&entity, stored.as_ref(), token).await?;
        }

        Ok(self.persist(entity).await)
    }

    /// Stored entity a modify or remove acts on. An absent target ends the
    /// request with 404 before any authorization check.
    async fn load_target(&self, entity: &E) -> Result<Option<E>> {
        if !matches!(self.operation, Operation::Modify | Operation::Remove) {
            return Ok(None);
        }
        let id = entity
            .id()
            .ok_or_else(|| RegistryError::validation(E::KIND.label(), vec!["id"]))?;

        match self.store.find_by_id(id).await? {
            Some(stored) => Ok(Some(stored)),
            None => Err(RegistryError::not_found(E::KIND.label(), id)),
        }
    }

    fn decode(&self, payload: &[u8]) -> Result<E> {
        serde_json::from_slice(payload).map_err(|e| {
            debug!(error = %e, "Payload could not be decoded");
            RegistryError::decode(e.to_string())
        })
    }

    fn validate(&self, entity: &E) -> Result<()> {
        if self.operation != Operation::Create && entity.id().is_none() {
            return Err(RegistryError::validation(E::KIND.label(), vec!["id"]));
        }

        match self.operation {
            Operation::Create | Operation::Modify => validation::ensure_complete(entity),
            Operation::Remove if self.operation.requires_authorization(E::KIND) => {
                match E::GOVERNING_FIELD {
                    Some(field) if entity.governing_platform().is_none() => {
                        Err(RegistryError::validation(E::KIND.label(), vec![field]))
                    }
                    _ => Ok(()),
                }
            }
            Operation::Remove | Operation::Lookup => Ok(()),
        }
    }

    /// Every platform governing the request must grant access: the one named
    /// in the payload and, for modify and remove, the one of the stored entity.
    async fn authorize(&self, entity: &E, stored: Option<&E>, token: Option<&str>) -> Result<()> {
        let token = token.ok_or_else(|| RegistryError::forbidden("missing bearer token"))?;

        let mut targets: Vec<String> = entity.governing_platform().map(str::to_string).into_iter().collect();
        if let Some(platform_id) = stored.and_then(|s| s.governing_platform()) {
            if !targets.iter().any(|t| t == platform_id) {
                targets.push(platform_id.to_string());
            }
        }

        if targets.is_empty() {
            return Err(RegistryError::forbidden("no governing platform"));
        }

        for platform_id in &targets {
            if !self.gate.check_access(token, platform_id).await {
                return Err(RegistryError::forbidden(format!(
                    "access to platform {} denied",
                    platform_id
                )));
            }
        }
        Ok(())
    }

    async fn persist(&self, entity: E) -> PersistenceResult<E> {
        let id = entity.id().map(str::to_string);
        match (self.operation, id) {
            (Operation::Create, _) => self.store.create(entity).await,
            (Operation::Modify, _) => self.store.update(entity).await,
            (Operation::Remove, Some(id)) => self.store.delete(&id).await,
            (Operation::Lookup, Some(id)) => match self.store.find_by_id(&id).await {
                Ok(Some(found)) => PersistenceResult::success(found, format!("{} found", E::KIND.label())),
                Ok(None) => PersistenceResult::not_found(&id),
                Err(e) => e.into(),
            },
            (Operation::Remove | Operation::Lookup, None) => {
                RegistryError::validation(E::KIND.label(), vec!["id"]).into()
            }
        }
    }

    async fn respond(&self, delivery: &Delivery) -> Disposition {
        let Some(address) = delivery.reply_address() else {
            warn!("Delivery cannot be answered: missing reply destination or correlation id");
            return Disposition::Nack { requeue: false };
        };

        let result = self.process(delivery).await;
        let status = result.status();
        metrics::counter!(
            "registry.requests_total",
            "entity" => E::KIND.as_str(),
            "operation" => self.operation.as_str(),
            "status" => status.to_string()
        )
        .increment(1);

        let body = match RegistryResponse::from_result(&result).to_bytes() {
            Ok(body) => body,
            Err(e) => {
                error!(error = %e, "Failed to encode response");
                return Disposition::Nack { requeue: false };
            }
        };

        let replied = match self.publisher.reply(&address, &body).await {
            Ok(()) => true,
            Err(e) => {
                error!(error = %e, reply_to = %address.reply_to, "Failed to send reply");
                false
            }
        };

        // The change is committed even when the reply was lost
        if let (Some(operation_type), Some(entity)) = (self.operation.notification_type(), result.entity()) {
            if let Err(e) = self.notifier.notify(entity, operation_type).await {
                warn!(error = %e, "Failed to publish change notification");
            }
        }

        if !replied {
            return Disposition::Nack { requeue: false };
        }

        let entity = result.entity();
        info!(
            status,
            id = ?entity.and_then(|e| e.id()),
            owner = ?entity.and_then(|e| e.owner()),
            "Request processed"
        );
        Disposition::Ack
    }
}

#[async_trait]
impl<E: RegistryEntity> DeliveryHandler for RequestConsumer<E> {
    async fn handle(&self, delivery: &Delivery) -> Disposition {
        let span = info_span!(
            "request",
            queue = %delivery.queue_identifier,
            correlation_id = ?delivery.correlation_id,
            entity = E::KIND.as_str(),
            operation = self.operation.as_str(),
        );
        self.respond(delivery).instrument(span).await
    }
}
