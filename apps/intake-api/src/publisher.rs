//! # Order Publisher
//!
//! Hands accepted orders to a background forwarder that pushes them onto the
//! downstream queue.
//!
//! ## Hand-off Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Publisher Hand-off                               │
//! │                                                                         │
//! │  HTTP handler                                                           │
//! │     │ OrderIntake::receive                                              │
//! │     ▼                                                                   │
//! │  QueuePublisher::publish ── try_send ──► mpsc (bounded)                 │
//! │     │  Full   ──► PublishError::Backpressure                            │
//! │     │  Closed ──► PublishError::Closed                                  │
//! │     ▼                                                                   │
//! │  QueueForwarder::run (spawned)                                          │
//! │     │ serialize order (camelCase JSON)                                  │
//! │     ▼                                                                   │
//! │  QueueSink::push ── RPUSH received-orders ──► Redis                     │
//! │     │  error ──► exponential backoff, retry up to max_attempts          │
//! │     │  exhausted ──► logged and dropped                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The handler never waits on Redis. The forwarder exits once every
//! publisher handle is dropped and the channel is drained.

use std::future::Future;
use std::time::Duration;

use backoff::backoff::Backoff;
use backoff::ExponentialBackoff;
use intake_core::{OrderPublisher, OrderRequest, PublishError};
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, error, info, warn};

use crate::error::QueueError;

// =============================================================================
// Publisher (handler side)
// =============================================================================

/// Non-blocking [`OrderPublisher`] backed by a bounded channel.
#[derive(Debug, Clone)]
pub struct QueuePublisher {
    tx: mpsc::Sender<OrderRequest>,
    capacity: usize,
}

impl QueuePublisher {
    /// Creates a publisher and the receiver its forwarder drains.
    ///
    /// `capacity` must be non-zero.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<OrderRequest>) {
        let (tx, rx) = mpsc::channel(capacity);
        (QueuePublisher { tx, capacity }, rx)
    }
}

impl OrderPublisher for QueuePublisher {
    fn publish(&self, order: &OrderRequest) -> Result<(), PublishError> {
        self.tx.try_send(order.clone()).map_err(|e| match e {
            TrySendError::Full(_) => PublishError::Backpressure {
                capacity: self.capacity,
            },
            TrySendError::Closed(_) => PublishError::Closed,
        })
    }
}

// =============================================================================
// Queue Sinks
// =============================================================================

/// Destination the forwarder pushes serialized orders to.
pub trait QueueSink: Send {
    fn push(&mut self, payload: &str) -> impl Future<Output = Result<(), QueueError>> + Send;
}

/// Redis list, appended with RPUSH.
pub struct RedisQueue {
    conn: ConnectionManager,
    queue: String,
}

impl RedisQueue {
    /// Connects to Redis. The connection manager reconnects on its own after
    /// this first connection succeeds.
    pub async fn connect(url: &str, queue: impl Into<String>) -> Result<Self, QueueError> {
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(RedisQueue {
            conn,
            queue: queue.into(),
        })
    }
}

impl QueueSink for RedisQueue {
    async fn push(&mut self, payload: &str) -> Result<(), QueueError> {
        let _: () = self.conn.rpush(&self.queue, payload).await?;
        Ok(())
    }
}

/// Sink used when no Redis is configured. Logs each order and accepts it.
#[derive(Debug, Clone)]
pub struct LogOnlyQueue {
    queue: String,
}

impl LogOnlyQueue {
    pub fn new(queue: impl Into<String>) -> Self {
        LogOnlyQueue {
            queue: queue.into(),
        }
    }
}

impl QueueSink for LogOnlyQueue {
    async fn push(&mut self, payload: &str) -> Result<(), QueueError> {
        info!(
            queue = %self.queue,
            bytes = payload.len(),
            "No queue configured; order logged only"
        );
        Ok(())
    }
}

// =============================================================================
// Forwarder (background side)
// =============================================================================

/// Retry settings for a single order push.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Attempts per order, including the first.
    pub max_attempts: u32,

    /// Delay before the first retry.
    pub initial_backoff: Duration,

    /// Upper bound on any single delay.
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: 5,
            initial_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            current_interval: self.initial_backoff,
            initial_interval: self.initial_backoff,
            max_interval: self.max_backoff,
            multiplier: 2.0,
            max_elapsed_time: None,
            ..Default::default()
        }
    }
}

/// Totals reported when the forwarder stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForwarderStats {
    pub delivered: u64,
    pub dropped: u64,
}

/// Drains the publisher channel into a [`QueueSink`].
pub struct QueueForwarder<S> {
    rx: mpsc::Receiver<OrderRequest>,
    sink: S,
    policy: RetryPolicy,
}

impl<S: QueueSink> QueueForwarder<S> {
    pub fn new(rx: mpsc::Receiver<OrderRequest>, sink: S, policy: RetryPolicy) -> Self {
        QueueForwarder { rx, sink, policy }
    }

    /// Runs until every [`QueuePublisher`] is dropped and the channel is empty.
    ///
    /// This should be spawned as a background task.
    pub async fn run(mut self) -> ForwarderStats {
        info!(max_attempts = self.policy.max_attempts, "Order forwarder starting");

        let mut stats = ForwarderStats::default();
        while let Some(order) = self.rx.recv().await {
            if self.forward(&order).await {
                stats.delivered += 1;
            } else {
                stats.dropped += 1;
            }
        }

        info!(
            delivered = stats.delivered,
            dropped = stats.dropped,
            "Order forwarder stopped"
        );
        stats
    }

    async fn forward(&mut self, order: &OrderRequest) -> bool {
        let order_id = order.order_id.as_deref().unwrap_or("<missing>");

        let payload = match serde_json::to_string(order) {
            Ok(payload) => payload,
            Err(e) => {
                error!(order_id, error = %QueueError::from(e), "Order dropped; cannot serialize");
                return false;
            }
        };

        let max_attempts = self.policy.max_attempts.max(1);
        let mut backoff = self.policy.backoff();

        for attempt in 1..=max_attempts {
            match self.sink.push(&payload).await {
                Ok(()) => {
                    debug!(order_id, attempt, "Order pushed to queue");
                    return true;
                }
                Err(e) if attempt < max_attempts => {
                    let delay = backoff.next_backoff().unwrap_or(self.policy.max_backoff);
                    warn!(order_id, attempt, error = %e, ?delay, "Queue push failed, retrying");
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    error!(
                        order_id,
                        attempts = max_attempts,
                        error = %e,
                        "Order dropped after exhausting queue push attempts"
                    );
                }
            }
        }

        false
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
