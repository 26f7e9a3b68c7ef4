//! Event bus
//!
//! Typed pub/sub decoupling the simulation from anything that renders or
//! logs it. Delivery is synchronous and in subscription order; a bounded
//! ring buffer keeps recent events for replay. A panicking subscriber is
//! contained: it is reported and delivery continues.

use crate::events::event::{CombatEvent, EventKind, EventPayload};
use ahash::AHashMap;
use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::{SystemTime, UNIX_EPOCH};

/// Callback invoked for each matching event
pub type Handler = Box<dyn FnMut(&CombatEvent)>;

/// What a handler listens to: one event kind, or everything
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    All,
    Kind(EventKind),
}

/// Token returned by subscribe, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscriber {
    id: SubscriptionId,
    handler: Handler,
}

/// Synchronous pub/sub hub with bounded history
pub struct EventBus {
    next_event_id: u64,
    next_subscription_id: u64,
    max_log_size: usize,
    debug: bool,
    log: VecDeque<CombatEvent>,
    by_kind: AHashMap<EventKind, Vec<Subscriber>>,
    wildcard: Vec<Subscriber>,
}

impl EventBus {
    pub fn new(max_log_size: usize, debug: bool) -> Self {
        Self {
            next_event_id: 1,
            next_subscription_id: 1,
            max_log_size: max_log_size.max(1),
            debug,
            log: VecDeque::new(),
            by_kind: AHashMap::new(),
            wildcard: Vec::new(),
        }
    }

    /// Register a handler; handlers for the same topic run in
    /// subscription order
    pub fn subscribe(&mut self, topic: Topic, handler: Handler) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription_id);
        self.next_subscription_id += 1;
        let subscriber = Subscriber { id, handler };
        match topic {
            Topic::All => self.wildcard.push(subscriber),
            Topic::Kind(kind) => self.by_kind.entry(kind).or_default().push(subscriber),
        }
        id
    }

    /// Register several handlers at once
    pub fn subscribe_many(
        &mut self,
        handlers: impl IntoIterator<Item = (Topic, Handler)>,
    ) -> Vec<SubscriptionId> {
        handlers
            .into_iter()
            .map(|(topic, handler)| self.subscribe(topic, handler))
            .collect()
    }

    /// Remove a handler; unknown ids are ignored
    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.wildcard.retain(|sub| sub.id != id);
        for subscribers in self.by_kind.values_mut() {
            subscribers.retain(|sub| sub.id != id);
        }
    }

    pub fn unsubscribe_many(&mut self, ids: &[SubscriptionId]) {
        for id in ids {
            self.unsubscribe(*id);
        }
    }

    /// Publish an event: assign its id, log it, deliver to exact-kind
    /// handlers then wildcard handlers
    ///
    /// Each handler runs isolated; a panic inside one is reported and
    /// never stops delivery to the rest or aborts the publish.
    pub fn publish(&mut self, payload: EventPayload) -> CombatEvent {
        let event = CombatEvent {
            id: self.next_event_id,
            payload,
            timestamp_ms: now_ms(),
        };
        self.next_event_id += 1;

        if self.debug {
            tracing::debug!(event_id = event.id, "publish: {:?}", event.payload);
        }

        self.log.push_back(event.clone());
        while self.log.len() > self.max_log_size {
            self.log.pop_front();
        }

        let kind = event.kind();
        if let Some(subscribers) = self.by_kind.get_mut(&kind) {
            for subscriber in subscribers.iter_mut() {
                deliver(subscriber, &event);
            }
        }
        for subscriber in self.wildcard.iter_mut() {
            deliver(subscriber, &event);
        }

        event
    }

    /// Events with `id >= from_id` in ascending id order, optionally
    /// filtered by kind
    pub fn replay(&self, from_id: u64, kind: Option<EventKind>) -> Vec<CombatEvent> {
        self.log
            .iter()
            .filter(|event| event.id >= from_id)
            .filter(|event| kind.map_or(true, |k| event.kind() == k))
            .cloned()
            .collect()
    }

    /// Number of retained events
    pub fn log_len(&self) -> usize {
        self.log.len()
    }

    /// Full lifecycle reset: log, subscribers and counters
    ///
    /// Only for reuse across independent simulations, never mid-combat.
    pub fn reset(&mut self) {
        self.log.clear();
        self.by_kind.clear();
        self.wildcard.clear();
        self.next_event_id = 1;
        self.next_subscription_id = 1;
    }
}

fn deliver(subscriber: &mut Subscriber, event: &CombatEvent) {
    let result = catch_unwind(AssertUnwindSafe(|| (subscriber.handler)(event)));
    if result.is_err() {
        tracing::error!(
            event_id = event.id,
            "event handler panicked; continuing delivery"
        );
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
