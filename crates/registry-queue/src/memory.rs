//! Embedded in-process broker
//!
//! Queues, replies and published notifications live in memory. Used as the
//! broker double in tests and when the registry is embedded as a library.
//! Nothing survives a restart.
//!
//! Captured replies, notifications and dead letters are kept up to a capture
//! limit; past it the oldest entries are dropped.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use registry_common::{Delivery, ReplyAddress};
use tracing::debug;

use crate::{QueueConsumer, QueueError, QueuePublisher, Result};

/// Captured entries kept per kind unless configured otherwise
pub const DEFAULT_CAPTURE_LIMIT: usize = 10_000;

/// A reply captured by the broker
#[derive(Debug, Clone)]
pub struct SentReply {
    pub address: ReplyAddress,
    pub payload: Vec<u8>,
}

/// A notification captured by the broker
#[derive(Debug, Clone)]
pub struct PublishedMessage {
    pub destination: String,
    pub payload: Vec<u8>,
}

#[derive(Default)]
struct BrokerState {
    queues: HashMap<String, VecDeque<Delivery>>,
    in_flight: HashMap<String, Delivery>,
    dead_letters: VecDeque<Delivery>,
    replies: VecDeque<SentReply>,
    published: VecDeque<PublishedMessage>,
}

/// Append to a capture buffer, dropping the oldest entries beyond `limit`
fn capture<T>(buffer: &mut VecDeque<T>, item: T, limit: usize) {
    buffer.push_back(item);
    while buffer.len() > limit {
        buffer.pop_front();
    }
}

/// In-memory broker shared by its consumers and used as the publisher
#[derive(Clone)]
pub struct MemoryBroker {
    state: Arc<Mutex<BrokerState>>,
    receipt_counter: Arc<AtomicU64>,
    fail_replies: Arc<AtomicBool>,
    capture_limit: usize,
}

impl Default for MemoryBroker {
    fn default() -> Self {
        Self::with_capture_limit(DEFAULT_CAPTURE_LIMIT)
    }
}

impl MemoryBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Broker keeping at most `limit` replies, notifications and dead
    /// letters each
    pub fn with_capture_limit(limit: usize) -> Self {
        Self {
            state: Arc::default(),
            receipt_counter: Arc::default(),
            fail_replies: Arc::default(),
            capture_limit: limit,
        }
    }

    /// Enqueue a request on `queue`. Receipt handle and queue identifier are
    /// assigned by the broker.
    pub fn submit(&self, queue: &str, mut delivery: Delivery) {
        let n = self.receipt_counter.fetch_add(1, Ordering::SeqCst);
        delivery.receipt_handle = format!("{}:{}", queue, n);
        delivery.queue_identifier = queue.to_string();

        self.state
            .lock()
            .queues
            .entry(queue.to_string())
            .or_default()
            .push_back(delivery);
    }

    /// Create a consumer for `queue`
    pub fn consumer(&self, queue: &str) -> MemoryConsumer {
        MemoryConsumer {
            broker: self.clone(),
            queue_name: queue.to_string(),
            running: AtomicBool::new(true),
        }
    }

    /// Make every subsequent `reply` fail, simulating a broker outage
    pub fn set_fail_replies(&self, fail: bool) {
        self.fail_replies.store(fail, Ordering::SeqCst);
    }

    /// Number of requests still waiting on `queue`
    pub fn pending(&self, queue: &str) -> usize {
        self.state.lock().queues.get(queue).map_or(0, VecDeque::len)
    }

    /// Number of polled but unsettled deliveries
    pub fn in_flight(&self) -> usize {
        self.state.lock().in_flight.len()
    }

    pub fn dead_letters(&self) -> Vec<Delivery> {
        self.state.lock().dead_letters.iter().cloned().collect()
    }

    pub fn replies(&self) -> Vec<SentReply> {
        self.state.lock().replies.iter().cloned().collect()
    }

    pub fn published(&self) -> Vec<PublishedMessage> {
        self.state.lock().published.iter().cloned().collect()
    }
}

#[async_trait]
impl QueuePublisher for MemoryBroker {
    async fn reply(&self, address: &ReplyAddress, payload: &[u8]) -> Result<()> {
        if self.fail_replies.load(Ordering::SeqCst) {
            return Err(QueueError::Broker("reply channel unavailable".to_string()));
        }

        debug!(
            correlation_id = %address.correlation_id,
            reply_to = %address.reply_to,
            "Reply captured by memory broker"
        );
        let reply = SentReply {
            address: address.clone(),
            payload: payload.to_vec(),
        };
        capture(&mut self.state.lock().replies, reply, self.capture_limit);
        Ok(())
    }

    async fn publish(&self, destination: &str, payload: &[u8]) -> Result<()> {
        let message = PublishedMessage {
            destination: destination.to_string(),
            payload: payload.to_vec(),
        };
        capture(&mut self.state.lock().published, message, self.capture_limit);
        Ok(())
    }
}

/// Consumer of one in-memory queue
pub struct MemoryConsumer {
    broker: MemoryBroker,
    queue_name: String,
    running: AtomicBool,
}

#[async_trait]
impl QueueConsumer for MemoryConsumer {
    fn identifier(&self) -> &str {
        &self.queue_name
    }

    async fn poll(&self, max_messages: u32) -> Result<Vec<Delivery>> {
        if !self.running.load(Ordering::SeqCst) {
            return Err(QueueError::Stopped);
        }

        let mut state = self.broker.state.lock();
        let mut polled = Vec::new();
        for _ in 0..max_messages {
            let next = state
                .queues
                .get_mut(&self.queue_name)
                .and_then(VecDeque::pop_front);
            match next {
                Some(delivery) => {
                    state
                        .in_flight
                        .insert(delivery.receipt_handle.clone(), delivery.clone());
                    polled.push(delivery);
                }
                None => break,
            }
        }
        Ok(polled)
    }

    async fn ack(&self, receipt_handle: &str) -> Result<()> {
        self.broker
            .state
            .lock()
            .in_flight
            .remove(receipt_handle)
            .map(|_| ())
            .ok_or_else(|| QueueError::NotFound(receipt_handle.to_string()))
    }

    async fn nack(&self, receipt_handle: &str, requeue: bool) -> Result<()> {
        let mut state = self.broker.state.lock();
        let delivery = state
            .in_flight
            .remove(receipt_handle)
            .ok_or_else(|| QueueError::NotFound(receipt_handle.to_string()))?;

        if requeue {
            state
                .queues
                .entry(self.queue_name.clone())
                .or_default()
                .push_front(delivery);
        } else {
            let limit = self.broker.capture_limit;
            capture(&mut state.dead_letters, delivery, limit);
        }
        Ok(())
    }

    fn is_healthy(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    async fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }
}
