//! EventBus - Synchronous Publish/Subscribe
//!
//! Delivers events to subscribers in registration order. A publish issued
//! from inside a handler is queued and drained breadth-first after the
//! current dispatch returns, so cyclic event chains (A triggers B
//! triggers A) flatten into bounded iteration instead of unbounded
//! call-stack recursion. Queue overflow drops the incoming event and
//! counts it; subscriber failures are logged and never reach the
//! publisher.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use ahash::AHashMap;

use crate::error::Result;
use crate::eventing::app_event::{AppEvent, Event, EventKind};
use crate::helpers::bounded::BoundedQueue;

type Handler = Box<dyn FnMut(&Event) -> Result<()>>;

struct Subscription {
    id: u64,
    kind: EventKind,
    handler: RefCell<Handler>,
    active: Cell<bool>,
}

/// Capability to remove one subscription
///
/// `unsubscribe` is idempotent and takes effect immediately, including
/// from inside a dispatch of the same event kind. Dropping the handle
/// does NOT unsubscribe; the handle is a capability, not a guard.
pub struct SubscriptionHandle {
    bus: Weak<EventBus>,
    sub: Rc<Subscription>,
}

impl SubscriptionHandle {
    /// Remove exactly this subscription
    pub fn unsubscribe(&self) {
        if !self.sub.active.replace(false) {
            return;
        }
        if let Some(bus) = self.bus.upgrade() {
            bus.remove_subscription(self.sub.kind, self.sub.id);
        }
    }

    /// Check whether the subscription is still delivering
    pub fn is_active(&self) -> bool {
        self.sub.active.get()
    }
}

/// Read-only bus introspection
#[derive(Clone, Debug)]
pub struct BusDiagnostics {
    /// Events currently awaiting breadth-first dispatch
    pub queue_length: usize,
    /// Total events dropped to queue overflow since construction
    pub dropped_count: u64,
    /// Live subscriber count per event kind
    pub subscriber_counts: AHashMap<EventKind, usize>,
}

/// Synchronous in-process publish/subscribe bus
///
/// Single-threaded by design: handlers run on the publisher's call stack
/// and the bus never suspends, so no locking is needed.
pub struct EventBus {
    subscribers: RefCell<AHashMap<EventKind, Vec<Rc<Subscription>>>>,
    queue: RefCell<BoundedQueue<Event>>,
    dispatching: Cell<bool>,
    next_subscription_id: Cell<u64>,
    next_seq: Cell<u64>,
}

impl EventBus {
    /// Create a bus whose re-entrancy queue accepts `queue_capacity`
    /// events per dispatch cycle
    pub fn new(queue_capacity: usize) -> Result<Self> {
        Ok(Self {
            subscribers: RefCell::new(AHashMap::new()),
            queue: RefCell::new(BoundedQueue::new(queue_capacity)?),
            dispatching: Cell::new(false),
            next_subscription_id: Cell::new(0),
            next_seq: Cell::new(0),
        })
    }

    /// Subscribe a handler to one event kind
    ///
    /// Handlers of the same kind are invoked in registration order. A
    /// handler's `Err` return is logged and does not affect delivery to
    /// the remaining subscribers.
    pub fn subscribe<F>(self: &Rc<Self>, kind: EventKind, handler: F) -> SubscriptionHandle
    where
        F: FnMut(&Event) -> Result<()> + 'static,
    {
        let id = self.next_subscription_id.get();
        self.next_subscription_id.set(id + 1);

        let sub = Rc::new(Subscription {
            id,
            kind,
            handler: RefCell::new(Box::new(handler)),
            active: Cell::new(true),
        });
        self.subscribers
            .borrow_mut()
            .entry(kind)
            .or_default()
            .push(sub.clone());

        SubscriptionHandle {
            bus: Rc::downgrade(self),
            sub,
        }
    }

    /// Publish an event
    ///
    /// Outside a dispatch, the event is delivered synchronously and any
    /// events its handlers publish are drained afterwards, breadth-first.
    /// Inside a dispatch (re-entrant publish), the event is queued; once
    /// the cycle's queue budget is exhausted further events are dropped
    /// and counted, with no control-flow effect on the publisher.
    pub fn publish(&self, payload: AppEvent) {
        let seq = self.next_seq.get();
        self.next_seq.set(seq + 1);
        let event = Event {
            seq,
            at: chrono::Utc::now(),
            payload,
        };

        if self.dispatching.get() {
            let mut queue = self.queue.borrow_mut();
            if !queue.push(event) {
                tracing::warn!(
                    dropped_total = queue.dropped(),
                    "event queue budget exhausted, dropping re-entrant event"
                );
            }
            return;
        }

        self.dispatching.set(true);
        self.dispatch(&event);
        loop {
            let queued = self.queue.borrow_mut().pop_front();
            let Some(queued) = queued else { break };
            self.dispatch(&queued);
        }
        self.queue.borrow_mut().reset_cycle();
        self.dispatching.set(false);
    }

    /// Read-only introspection, no side effects
    pub fn diagnostics(&self) -> BusDiagnostics {
        let queue = self.queue.borrow();
        let subscriber_counts = self
            .subscribers
            .borrow()
            .iter()
            .map(|(kind, subs)| (*kind, subs.len()))
            .collect();
        BusDiagnostics {
            queue_length: queue.len(),
            dropped_count: queue.dropped(),
            subscriber_counts,
        }
    }

    /// Deliver one event to a snapshot of its current subscribers
    ///
    /// The snapshot keeps the subscriber map free for re-entrant
    /// subscribe/unsubscribe calls; the per-subscription `active` flag is
    /// re-checked before each invocation so a handler removed mid-cycle
    /// is skipped.
    fn dispatch(&self, event: &Event) {
        let snapshot: Vec<Rc<Subscription>> = self
            .subscribers
            .borrow()
            .get(&event.kind())
            .cloned()
            .unwrap_or_default();

        for sub in snapshot {
            if !sub.active.get() {
                continue;
            }
            let outcome = (sub.handler.borrow_mut())(event);
            if let Err(error) = outcome {
                tracing::warn!(kind = ?event.kind(), %error, "subscriber failed, continuing delivery");
            }
        }
    }

    fn remove_subscription(&self, kind: EventKind, id: u64) {
        let mut subscribers = self.subscribers.borrow_mut();
        if let Some(subs) = subscribers.get_mut(&kind) {
            subs.retain(|sub| sub.id != id);
            if subs.is_empty() {
                subscribers.remove(&kind);
            }
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let diag = self.diagnostics();
        f.debug_struct("EventBus")
            .field("queue_length", &diag.queue_length)
            .field("dropped_count", &diag.dropped_count)
            .field("subscriptions", &diag.subscriber_counts.len())
            .finish()
    }
}
