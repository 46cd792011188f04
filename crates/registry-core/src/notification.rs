//! Change notifications
//!
//! Broadcast after a committed create, modify or remove. Subscribers bind to
//! routing keys of the form `<entity>.<created|modified|removed>`.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use registry_queue::QueuePublisher;

use crate::entity::{EntityKind, RegistryEntity};
use crate::shared::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationType {
    Creation,
    Modification,
    Removal,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Creation => "CREATION",
            Self::Modification => "MODIFICATION",
            Self::Removal => "REMOVAL",
        }
    }

    fn routing_suffix(&self) -> &'static str {
        match self {
            Self::Creation => "created",
            Self::Modification => "modified",
            Self::Removal => "removed",
        }
    }
}

/// Notification payload: the committed entity state and what happened to it
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification<'a, E> {
    pub entity: &'a E,
    pub operation_type: OperationType,
}

pub struct NotificationPublisher {
    publisher: Arc<dyn QueuePublisher>,
}

impl NotificationPublisher {
    pub fn new(publisher: Arc<dyn QueuePublisher>) -> Self {
        Self { publisher }
    }

    /// Routing key for a change of the given kind
    pub fn destination(kind: EntityKind, operation_type: OperationType) -> String {
        format!("{}.{}", kind.as_str(), operation_type.routing_suffix())
    }

    pub async fn notify<E: RegistryEntity>(&self, entity: &E, operation_type: OperationType) -> Result<()> {
        let destination = Self::destination(E::KIND, operation_type);
        let payload = serde_json::to_vec(&Notification { entity, operation_type })?;

        self.publisher.publish(&destination, &payload).await?;

        metrics::counter!(
            "registry.notifications_total",
            "entity" => E::KIND.as_str(),
            "operation" => operation_type.as_str()
        )
        .increment(1);
        debug!(destination = %destination, id = ?entity.id(), "Notification published");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Device;
    use registry_queue::MemoryBroker;

    #[test]
    fn test_destination() {
        assert_eq!(
            NotificationPublisher::destination(EntityKind::SmartSpace, OperationType::Creation),
            "smart_space.created"
        );
        assert_eq!(
            NotificationPublisher::destination(EntityKind::Platform, OperationType::Removal),
            "platform.removed"
        );
    }

    #[tokio::test]
    async fn test_notify_publishes_payload() {
        let broker = MemoryBroker::new();
        let notifier = NotificationPublisher::new(Arc::new(broker.clone()));
        let device = Device {
            id: Some("D1".to_string()),
            name: Some("Hub".to_string()),
            ..Default::default()
        };

        notifier.notify(&device, OperationType::Modification).await.unwrap();

        let published = broker.published();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].destination, "device.modified");
        let body: serde_json::Value = serde_json::from_slice(&published[0].payload).unwrap();
        assert_eq!(body["operationType"], "MODIFICATION");
        assert_eq!(body["entity"]["id"], "D1");
    }
}
