//! EventBus (C13): single-process typed pub/sub.
//!
//! `on(event_type)` and `on("*")` (wildcard, fires for every emitted event)
//! both return a subscription id usable with `off`; `once` auto-unsubscribes
//! after its first delivery. Handler errors are isolated — one handler
//! failing never stops the rest of `emit`'s fan-out, it's only logged. Once
//! `close`d, every `on`/`once`/`emit` call is refused.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

pub const WILDCARD: &str = "*";

/// One event delivered through the bus.
#[derive(Debug, Clone)]
pub struct BusEvent {
    pub event_type: String,
    pub payload: serde_json::Value,
}

#[derive(Debug, Error)]
pub enum EventBusError {
    #[error("event bus is closed")]
    Closed,
    #[error("unknown subscription {0}")]
    UnknownSubscription(Uuid),
}

type Handler = dyn Fn(&BusEvent) -> Result<(), String> + Send + Sync;

struct Subscription {
    event_type: String,
    handler: Arc<Handler>,
    once: bool,
}

/// Thread-safe typed pub/sub bus.
pub struct EventBus {
    subscriptions: RwLock<HashMap<Uuid, Subscription>>,
    closed: AtomicBool,
    total_emitted: AtomicU64,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            subscriptions: RwLock::new(HashMap::new()),
            closed: AtomicBool::new(false),
            total_emitted: AtomicU64::new(0),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }

    pub fn total_emitted(&self) -> u64 {
        self.total_emitted.load(Ordering::Acquire)
    }

    pub async fn handler_count(&self) -> usize {
        self.subscriptions.read().await.len()
    }

    /// Subscribes to `event_type`, or every event if `event_type == "*"`.
    pub async fn on<F>(&self, event_type: impl Into<String>, handler: F) -> Result<Uuid, EventBusError>
    where
        F: Fn(&BusEvent) -> Result<(), String> + Send + Sync + 'static,
    {
        self.subscribe(event_type.into(), Arc::new(handler), false).await
    }

    /// Subscribes to `event_type`, auto-unsubscribing after the first delivery.
    pub async fn once<F>(&self, event_type: impl Into<String>, handler: F) -> Result<Uuid, EventBusError>
    where
        F: Fn(&BusEvent) -> Result<(), String> + Send + Sync + 'static,
    {
        self.subscribe(event_type.into(), Arc::new(handler), true).await
    }

    async fn subscribe(
        &self,
        event_type: String,
        handler: Arc<Handler>,
        once: bool,
    ) -> Result<Uuid, EventBusError> {
        if self.is_closed() {
            return Err(EventBusError::Closed);
        }
        let id = Uuid::new_v4();
        self.subscriptions
            .write()
            .await
            .insert(id, Subscription { event_type, handler, once });
        Ok(id)
    }

    pub async fn off(&self, subscription_id: Uuid) -> Result<(), EventBusError> {
        self.subscriptions
            .write()
            .await
            .remove(&subscription_id)
            .map(|_| ())
            .ok_or(EventBusError::UnknownSubscription(subscription_id))
    }

    /// Delivers `event` to every matching subscriber. A handler returning
    /// `Err` is logged and skipped; it never aborts the remaining fan-out.
    pub async fn emit(&self, event_type: impl Into<String>, payload: serde_json::Value) -> Result<usize, EventBusError> {
        if self.is_closed() {
            return Err(EventBusError::Closed);
        }
        let event = BusEvent { event_type: event_type.into(), payload };

        let matching: Vec<(Uuid, Arc<Handler>)> = {
            let subscriptions = self.subscriptions.read().await;
            subscriptions
                .iter()
                .filter(|(_, sub)| sub.event_type == event.event_type || sub.event_type == WILDCARD)
                .map(|(id, sub)| (*id, sub.handler.clone()))
                .collect()
        };

        let mut delivered = 0usize;
        let mut fired_once = Vec::new();
        for (id, handler) in &matching {
            if let Err(err) = handler(&event) {
                tracing::warn!(subscription_id = %id, event_type = %event.event_type, error = %err, "event handler failed");
            }
            delivered += 1;
            if self
                .subscriptions
                .read()
                .await
                .get(id)
                .map(|sub| sub.once)
                .unwrap_or(false)
            {
                fired_once.push(*id);
            }
        }

        if !fired_once.is_empty() {
            let mut subscriptions = self.subscriptions.write().await;
            for id in fired_once {
                subscriptions.remove(&id);
            }
        }

        self.total_emitted.fetch_add(1, Ordering::AcqRel);
        Ok(delivered)
    }
}
