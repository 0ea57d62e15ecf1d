//! Event system for panel lifecycle notifications
//! Key principles:
//! - Registration system (only notify interested handlers)
//! - Broadcast delivery (every registered handler sees every event)
//! - Queued dispatch (events raised by a handler are delivered after the
//!   current one, to the live handler set)

use crate::foundation::collections::IdAllocator;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

static SUBSCRIPTION_IDS: IdAllocator = IdAllocator::new();

/// Event type identification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    /// A panel was pushed on the stack and shown
    PanelShown,
    /// The top panel was popped and hidden
    PanelHidden,
}

/// Event with type ID
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    /// Type of event
    pub event_type: EventType,
    /// Panel stack depth after the change
    pub stack_depth: usize,
}

impl Event {
    /// Create a new event
    pub fn new(event_type: EventType, stack_depth: usize) -> Self {
        Self {
            event_type,
            stack_depth,
        }
    }
}

/// Event handler trait
pub trait EventHandler {
    /// Handle an event
    fn on_event(&mut self, event: &Event);
}

impl<F: FnMut(&Event)> EventHandler for F {
    fn on_event(&mut self, event: &Event) {
        self(event);
    }
}

/// Token returned by [`EventSystem::subscribe`], used to unsubscribe.
/// Unique across all event systems in the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type SharedHandler = Rc<RefCell<dyn EventHandler>>;

/// Event system with registration.
///
/// All methods take `&self`, so handlers may subscribe, unsubscribe and emit
/// while a dispatch is running. No borrow of the handler table is held while
/// a handler runs.
#[derive(Default)]
pub struct EventSystem {
    handlers: RefCell<HashMap<EventType, Vec<(SubscriptionId, SharedHandler)>>>,
    pending: RefCell<VecDeque<Event>>,
    dispatching: Cell<bool>,
}

/// Clears the dispatching flag even if a handler panics
struct DispatchGuard<'a>(&'a Cell<bool>);

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl EventSystem {
    /// Create a new empty event system
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for a specific event type
    /// Only handlers registered for this type will be notified
    pub fn subscribe(&self, event_type: EventType, handler: impl EventHandler + 'static) -> SubscriptionId {
        let id = SubscriptionId(SUBSCRIPTION_IDS.next_id());
        let handler: SharedHandler = Rc::new(RefCell::new(handler));
        self.handlers
            .borrow_mut()
            .entry(event_type)
            .or_default()
            .push((id, handler));
        id
    }

    /// Remove a handler. Returns false if the id was unknown.
    ///
    /// Takes effect immediately, including for the event being dispatched.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        for handlers in self.handlers.borrow_mut().values_mut() {
            if let Some(index) = handlers.iter().position(|(handler_id, _)| *handler_id == id) {
                handlers.remove(index);
                return true;
            }
        }
        false
    }

    /// Whether `id` is still registered
    pub fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.handlers
            .borrow()
            .values()
            .any(|handlers| handlers.iter().any(|(handler_id, _)| *handler_id == id))
    }

    /// Dispatch an event to every handler registered for its type, in
    /// registration order.
    ///
    /// Called from inside a handler, the event is queued and delivered once
    /// the current event has reached all of its handlers.
    pub fn emit(&self, event: Event) {
        self.pending.borrow_mut().push_back(event);
        if self.dispatching.replace(true) {
            return;
        }
        let _guard = DispatchGuard(&self.dispatching);

        loop {
            let next = self.pending.borrow_mut().pop_front();
            let Some(event) = next else { break };
            for (id, handler) in self.snapshot(event.event_type) {
                if self.is_subscribed(id) {
                    handler.borrow_mut().on_event(&event);
                }
            }
        }
    }

    fn snapshot(&self, event_type: EventType) -> Vec<(SubscriptionId, SharedHandler)> {
        let handlers = self.handlers.borrow();
        let Some(registered) = handlers.get(&event_type) else {
            return Vec::new();
        };
        log::trace!("Dispatching {:?} to {} handler(s)", event_type, registered.len());
        registered
            .iter()
            .map(|(id, handler)| (*id, Rc::clone(handler)))
            .collect()
    }
}
