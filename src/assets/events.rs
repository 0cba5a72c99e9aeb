use std::cell::{Cell, RefCell};
use std::rc::Rc;

use smallvec::SmallVec;

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<E> = Rc<dyn Fn(&E)>;

/// Synchronous publish/subscribe channel.
///
/// Dispatch works on a snapshot of the listener list taken when `emit` starts, so listeners
/// may subscribe or unsubscribe (themselves or others) while being called. Changes apply to
/// the next emission.
pub struct EventBus<E> {
    listeners: RefCell<Vec<(SubscriptionId, Listener<E>)>>,
    next_id: Cell<u64>,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self {
            listeners: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }
}

impl<E> std::fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.borrow().len())
            .finish()
    }
}

impl<E> EventBus<E> {
    /// Empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener; it receives every subsequent event.
    pub fn subscribe(&self, listener: impl Fn(&E) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(lid, _)| *lid != id);
        listeners.len() != before
    }

    /// Number of subscribed listeners.
    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// `true` when nobody listens.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deliver `event` to every listener subscribed at call time, in subscription order.
    pub fn emit(&self, event: &E) {
        let snapshot: SmallVec<[Listener<E>; 4]> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in snapshot {
            listener(event);
        }
    }
}

/// Stage of a load batch a progress event reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LoadPhase {
    /// `load()` found pending resources and is about to fetch.
    BatchStarted,
    /// A fetch for one resource began.
    ResourceStarted,
    /// One resource reached a terminal state.
    ResourceFinished,
    /// Every queued resource reached a terminal state.
    BatchFinished,
}

/// Outcome carried by a progress event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LoadStatus {
    /// Work still running.
    InProgress,
    /// The resource (or batch) succeeded.
    Succeeded,
    /// The resource (or batch) failed.
    Failed,
}

/// Progress notification emitted on every loader state change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadProgress {
    /// Resources that reached a terminal state in this batch.
    pub number_loaded: usize,
    /// Resources queued in this batch so far.
    pub total_resources: usize,
    /// Which stage this event reports.
    pub phase: LoadPhase,
    /// Outcome so far.
    pub status: LoadStatus,
    /// Key of the resource concerned, for per-resource phases.
    pub key: Option<String>,
}

/// Terminal notification fired once per `load()` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadCompleted {
    /// `true` when every resource in the batch loaded.
    pub success: bool,
}

#[cfg(test)]
#[path = "../../tests/unit/assets/events.rs"]
mod tests;
