//=========================================================================
// Event System
//=========================================================================
//
// Named publish/subscribe for loosely coupled notifications.
//
// Architecture:
//   subscribe(name, callback) → HashMap<name, Vec<Subscription>>
//                                         ↓
//   fire_event(name, args) ──→ callbacks in subscription order
//                              (stops at the first that returns true)
//
// Event names are case-insensitive. Callbacks run synchronously on the
// caller's thread and must not fire events themselves.
//
//=========================================================================

//=== Module Declarations =================================================

mod event_args;

//=== Public API ==========================================================

pub use event_args::EventArgs;

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::{debug, trace};

//=== Well-Known Event Names ==============================================

/// Fired when the user closes any window (X button, Alt+F4, ...).
pub const EVENT_CLOSE_BUTTON_CLICKED: &str = "OnCloseButtonClicked";

/// Generic quit request.
pub const EVENT_QUIT: &str = "quit";

/// Fired after the game switches state; args carry the new state label.
pub const EVENT_GAME_STATE_CHANGED: &str = "OnGameStateChanged";

/// Fired when a window's client area changes size (`newWidth`, `newHeight`).
pub const EVENT_WINDOW_SIZE_CHANGED: &str = "OnWindowSizeChanged";

//=== Types ===============================================================

/// Event handler. Returns `true` when it consumed the event.
pub type EventCallback = Box<dyn FnMut(&mut EventArgs) -> bool>;

/// Identifies one subscription for [`EventSystem::unsubscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscription {
    id: SubscriptionId,
    callback: EventCallback,
}

//=== EventSystem =========================================================

/// Named-event registry and dispatcher.
pub struct EventSystem {
    subscriptions: HashMap<String, Vec<Subscription>>,
    next_id: u64,
}

impl EventSystem {
    pub fn new() -> Self {
        Self {
            subscriptions: HashMap::new(),
            next_id: 0,
        }
    }

    //--- Lifecycle --------------------------------------------------------

    pub fn startup(&mut self) {
        debug!(target: "events", "Event system started");
    }

    /// Drops every subscription (and whatever the callbacks captured).
    pub fn shutdown(&mut self) {
        let count: usize = self.subscriptions.values().map(Vec::len).sum();
        self.subscriptions.clear();
        debug!(target: "events", "Event system shut down ({} subscriptions dropped)", count);
    }

    //--- Subscription -----------------------------------------------------

    /// Registers `callback` for `event_name`.
    ///
    /// Callbacks for the same event run in subscription order.
    pub fn subscribe<F>(&mut self, event_name: &str, callback: F) -> SubscriptionId
    where
        F: FnMut(&mut EventArgs) -> bool + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;

        self.subscriptions
            .entry(normalize(event_name))
            .or_default()
            .push(Subscription {
                id,
                callback: Box::new(callback),
            });

        trace!(target: "events", "Subscribed {:?} to '{}'", id, event_name);
        id
    }

    /// Removes a subscription. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        for list in self.subscriptions.values_mut() {
            if let Some(index) = list.iter().position(|s| s.id == id) {
                list.remove(index);
                return true;
            }
        }
        false
    }

    //--- Dispatch ---------------------------------------------------------

    /// Invokes subscribers of `event_name` until one consumes the event.
    ///
    /// Returns `true` if a subscriber consumed it. Unknown events are not
    /// an error; they simply have no subscribers.
    pub fn fire_event(&mut self, event_name: &str, args: &mut EventArgs) -> bool {
        let Some(list) = self.subscriptions.get_mut(&normalize(event_name)) else {
            trace!(target: "events", "'{}' fired with no subscribers", event_name);
            return false;
        };

        for subscription in list.iter_mut() {
            if (subscription.callback)(args) {
                return true;
            }
        }
        false
    }

    /// [`fire_event`](Self::fire_event) with empty arguments.
    pub fn fire(&mut self, event_name: &str) -> bool {
        self.fire_event(event_name, &mut EventArgs::new())
    }

    //--- Queries ----------------------------------------------------------

    pub fn subscriber_count(&self, event_name: &str) -> usize {
        self.subscriptions
            .get(&normalize(event_name))
            .map(Vec::len)
            .unwrap_or(0)
    }
}

impl Default for EventSystem {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize(event_name: &str) -> String {
    event_name.to_ascii_lowercase()
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[test]
    fn fire_without_subscribers_is_unhandled() {
        let mut events = EventSystem::new();
        assert!(!events.fire("nobody"));
    }

    #[test]
    fn subscriber_receives_args() {
        let mut events = EventSystem::new();
        let seen = Rc::new(RefCell::new(None));
        let sink = seen.clone();

        events.subscribe(EVENT_WINDOW_SIZE_CHANGED, move |args| {
            *sink.borrow_mut() = Some(args.get_value("newWidth", -1));
            true
        });

        let mut args = EventArgs::new().with_value("newWidth", 640);
        assert!(events.fire_event(EVENT_WINDOW_SIZE_CHANGED, &mut args));
        assert_eq!(*seen.borrow(), Some(640));
    }

    #[test]
    fn consumed_event_stops_propagation() {
        let mut events = EventSystem::new();
        let second_called = Rc::new(Cell::new(false));
        let flag = second_called.clone();

        events.subscribe("ping", |_| true);
        events.subscribe("ping", move |_| {
            flag.set(true);
            true
        });

        assert!(events.fire("ping"));
        assert!(!second_called.get());
    }

    #[test]
    fn unhandled_event_reaches_every_subscriber() {
        let mut events = EventSystem::new();
        let calls = Rc::new(Cell::new(0));

        for _ in 0..3 {
            let counter = calls.clone();
            events.subscribe("ping", move |_| {
                counter.set(counter.get() + 1);
                false
            });
        }

        assert!(!events.fire("ping"));
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn names_are_case_insensitive() {
        let mut events = EventSystem::new();
        events.subscribe("OnCloseButtonClicked", |_| true);
        assert!(events.fire("oncloseButtonclicked"));
        assert_eq!(events.subscriber_count("ONCLOSEBUTTONCLICKED"), 1);
    }

    #[test]
    fn unsubscribe_removes_callback() {
        let mut events = EventSystem::new();
        let id = events.subscribe("ping", |_| true);

        assert!(events.unsubscribe(id));
        assert!(!events.unsubscribe(id));
        assert!(!events.fire("ping"));
    }

    #[test]
    fn shutdown_clears_subscriptions() {
        let mut events = EventSystem::new();
        events.subscribe("ping", |_| true);
        events.shutdown();
        assert_eq!(events.subscriber_count("ping"), 0);
    }
}
