use async_trait::async_trait;
use registry_common::{Delivery, Disposition, ReplyAddress};

pub mod consume;
pub mod error;
pub mod memory;

#[cfg(feature = "amqp")]
pub mod amqp;

pub use consume::consume;
pub use error::QueueError;
pub use memory::MemoryBroker;

pub type Result<T> = std::result::Result<T, QueueError>;

/// Trait for consuming request messages from one queue
#[async_trait]
pub trait QueueConsumer: Send + Sync {
    /// Get the unique identifier (queue name) for this consumer
    fn identifier(&self) -> &str;

    /// Poll for messages from the queue
    async fn poll(&self, max_messages: u32) -> Result<Vec<Delivery>>;

    /// Acknowledge a message (remove from queue)
    async fn ack(&self, receipt_handle: &str) -> Result<()>;

    /// Negative acknowledge a message.
    /// With `requeue = false` the broker dead-letters or drops it.
    async fn nack(&self, receipt_handle: &str, requeue: bool) -> Result<()>;

    /// Check if the consumer is healthy
    fn is_healthy(&self) -> bool;

    /// Stop the consumer
    async fn stop(&self);
}

/// Trait for sending replies and notifications
#[async_trait]
pub trait QueuePublisher: Send + Sync {
    /// Send a response to the caller's reply destination, tagged with its correlation id
    async fn reply(&self, address: &ReplyAddress, payload: &[u8]) -> Result<()>;

    /// Publish a notification to a destination (routing key)
    async fn publish(&self, destination: &str, payload: &[u8]) -> Result<()>;
}

/// Handler invoked by the consume loop for every delivery
#[async_trait]
pub trait DeliveryHandler: Send + Sync {
    async fn handle(&self, delivery: &Delivery) -> Disposition;
}
