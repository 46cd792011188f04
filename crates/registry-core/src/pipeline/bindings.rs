//! Binding table from (entity type, operation) to request consumer

use std::sync::Arc;

use registry_queue::{DeliveryHandler, QueuePublisher};

use super::consumer::RequestConsumer;
use super::operation::Operation;
use crate::auth::AuthorizationGate;
use crate::entity::{EntityKind, RegistryEntity};
use crate::notification::NotificationPublisher;
use crate::store::{EntityStore, RegistryStores};

/// A request queue and the handler consuming it
pub struct ConsumerBinding {
    pub kind: EntityKind,
    pub operation: Operation,
    pub queue: String,
    pub handler: Arc<dyn DeliveryHandler>,
}

/// Build one consumer per entity type and operation
pub fn build_bindings(
    queue_prefix: &str,
    stores: &RegistryStores,
    gate: Arc<AuthorizationGate>,
    publisher: Arc<dyn QueuePublisher>,
) -> Vec<ConsumerBinding> {
    let mut binder = Binder {
        queue_prefix,
        gate,
        notifier: Arc::new(NotificationPublisher::new(publisher.clone())),
        publisher,
        bindings: Vec::with_capacity(EntityKind::ALL.len() * Operation::ALL.len()),
    };

    binder.bind(stores.platforms.clone());
    binder.bind(stores.resources.clone());
    binder.bind(stores.smart_spaces.clone());
    binder.bind(stores.devices.clone());
    binder.bind(stores.information_models.clone());

    binder.bindings
}

struct Binder<'a> {
    queue_prefix: &'a str,
    gate: Arc<AuthorizationGate>,
    publisher: Arc<dyn QueuePublisher>,
    notifier: Arc<NotificationPublisher>,
    bindings: Vec<ConsumerBinding>,
}

impl Binder<'_> {
    fn bind<E: RegistryEntity>(&mut self, store: Arc<dyn EntityStore<E>>) {
        for operation in Operation::ALL {
            let consumer = RequestConsumer::new(
                operation,
                store.clone(),
                self.gate.clone(),
                self.publisher.clone(),
                self.notifier.clone(),
            );
            self.bindings.push(ConsumerBinding {
                kind: E::KIND,
                operation,
                queue: operation.queue_name(self.queue_prefix, E::KIND),
                handler: Arc::new(consumer),
            });
        }
    }
}
