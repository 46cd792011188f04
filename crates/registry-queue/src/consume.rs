//! Consume Loop
//!
//! Drives one queue consumer: poll a single delivery, hand it to the handler,
//! settle it, repeat. Deliveries of the same queue are therefore never
//! processed concurrently; separate queues run in separate tasks.

use std::sync::Arc;
use std::time::Duration;

use registry_common::Disposition;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::{DeliveryHandler, QueueConsumer, QueueError};

/// Pause after an empty poll
const IDLE_BACKOFF: Duration = Duration::from_millis(50);

/// Pause after a broker error before polling again
const ERROR_BACKOFF: Duration = Duration::from_secs(1);

/// Run the consume loop until `shutdown` flips to `true` (or its sender is
/// dropped) or the consumer reports that it was stopped.
pub async fn consume<H>(
    consumer: Arc<dyn QueueConsumer>,
    handler: Arc<H>,
    mut shutdown: watch::Receiver<bool>,
) where
    H: DeliveryHandler + ?Sized,
{
    let queue = consumer.identifier().to_string();
    info!(queue = %queue, "Consumer started");

    loop {
        if *shutdown.borrow() {
            break;
        }

        let polled = tokio::select! {
            _ = shutdown.changed() => break,
            polled = consumer.poll(1) => polled,
        };

        let deliveries = match polled {
            Ok(deliveries) => deliveries,
            Err(QueueError::Stopped) => {
                warn!(queue = %queue, "Consumer stopped by broker");
                break;
            }
            Err(e) => {
                error!(queue = %queue, error = %e, "Failed to poll queue");
                tokio::time::sleep(ERROR_BACKOFF).await;
                continue;
            }
        };

        if deliveries.is_empty() {
            tokio::time::sleep(IDLE_BACKOFF).await;
            continue;
        }

        for delivery in deliveries {
            let disposition = handler.handle(&delivery).await;
            let settled = match disposition {
                Disposition::Ack => consumer.ack(&delivery.receipt_handle).await,
                Disposition::Nack { requeue } => {
                    consumer.nack(&delivery.receipt_handle, requeue).await
                }
            };

            match settled {
                Ok(()) => debug!(
                    queue = %queue,
                    receipt_handle = %delivery.receipt_handle,
                    ?disposition,
                    "Delivery settled"
                ),
                Err(e) => error!(
                    queue = %queue,
                    receipt_handle = %delivery.receipt_handle,
                    error = %e,
                    "Failed to settle delivery"
                ),
            }
        }
    }

    consumer.stop().await;
    info!(queue = %queue, "Consumer stopped");
}
