//! Change notifications broadcast to observers.
//!
//! Events are delivered synchronously in emission order to whoever is
//! subscribed at the moment of emission. Nothing is buffered, so a late
//! subscriber never sees earlier events.

use crate::types::Cell;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::trace;

/// A state delta reported by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeEvent {
    CellChanged { x: usize, y: usize, state: Cell },
    /// The grid was replaced; every cell is dead until told otherwise
    SizeChanged { size: usize },
    GenerationChanged { generation: u64 },
    LoadComplete,
}

/// Handle returned by [`ChangeNotifier::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Handler = Arc<dyn Fn(&ChangeEvent) + Send + Sync>;

struct Subscribers {
    next_id: AtomicU64,
    handlers: RwLock<Vec<(SubscriptionId, Handler)>>,
}

/// Shared subscriber list; clones refer to the same observers
#[derive(Clone)]
pub struct ChangeNotifier {
    inner: Arc<Subscribers>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Subscribers {
                next_id: AtomicU64::new(0),
                handlers: RwLock::new(Vec::new()),
            }),
        }
    }

    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&ChangeEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        self.inner.handlers.write().push((id, Arc::new(handler)));
        trace!(subscription = id.0, "Observer subscribed");
        id
    }

    /// Returns false if the id was not subscribed
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.inner.handlers.write();
        let before = handlers.len();
        handlers.retain(|(existing, _)| *existing != id);
        let removed = handlers.len() != before;
        if removed {
            trace!(subscription = id.0, "Observer unsubscribed");
        }
        removed
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.handlers.read().len()
    }

    /// Deliver an event to every current subscriber.
    ///
    /// The list is snapshotted first, so handlers may subscribe or
    /// unsubscribe while being called. Changes take effect from the next event.
    pub fn emit(&self, event: ChangeEvent) {
        let snapshot: Vec<Handler> = self
            .inner
            .handlers
            .read()
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect();

        for handler in snapshot {
            handler(&event);
        }
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn recorder(notifier: &ChangeNotifier) -> (SubscriptionId, Arc<Mutex<Vec<ChangeEvent>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        let id = notifier.subscribe(move |event| sink.lock().push(*event));
        (id, log)
    }

    #[test]
    fn test_emit_without_subscribers() {
        let notifier = ChangeNotifier::new();
        notifier.emit(ChangeEvent::LoadComplete);
        assert_eq!(notifier.subscriber_count(), 0);
    }

    #[test]
    fn test_events_arrive_in_order() {
        let notifier = ChangeNotifier::new();
        let (_, log) = recorder(&notifier);

        notifier.emit(ChangeEvent::SizeChanged { size: 3 });
        notifier.emit(ChangeEvent::GenerationChanged { generation: 1 });
        notifier.emit(ChangeEvent::LoadComplete);

        assert_eq!(
            *log.lock(),
            vec![
                ChangeEvent::SizeChanged { size: 3 },
                ChangeEvent::GenerationChanged { generation: 1 },
                ChangeEvent::LoadComplete,
            ]
        );
    }

    #[test]
    fn test_unsubscribe() {
        let notifier = ChangeNotifier::new();
        let (id, log) = recorder(&notifier);

        notifier.emit(ChangeEvent::LoadComplete);
        assert!(notifier.unsubscribe(id));
        assert!(!notifier.unsubscribe(id));
        notifier.emit(ChangeEvent::LoadComplete);

        assert_eq!(log.lock().len(), 1);
    }

    #[test]
    fn test_late_subscriber_gets_no_replay() {
        let notifier = ChangeNotifier::new();
        notifier.emit(ChangeEvent::LoadComplete);
        let (_, log) = recorder(&notifier);
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_subscribe_during_dispatch() {
        let notifier = ChangeNotifier::new();
        let late_log = Arc::new(Mutex::new(Vec::new()));

        let handle = notifier.clone();
        let sink = Arc::clone(&late_log);
        notifier.subscribe(move |event| {
            if *event == ChangeEvent::LoadComplete {
                let sink = Arc::clone(&sink);
                handle.subscribe(move |event| sink.lock().push(*event));
            }
        });

        notifier.emit(ChangeEvent::LoadComplete);
        // Added mid-dispatch, so it only sees later events
        assert!(late_log.lock().is_empty());

        notifier.emit(ChangeEvent::SizeChanged { size: 1 });
        assert_eq!(*late_log.lock(), vec![ChangeEvent::SizeChanged { size: 1 }]);
    }

    #[test]
    fn test_unsubscribe_self_during_dispatch() {
        let notifier = ChangeNotifier::new();
        let calls = Arc::new(Mutex::new(0));
        let own_id: Arc<Mutex<Option<SubscriptionId>>> = Arc::new(Mutex::new(None));

        let handle = notifier.clone();
        let counter = Arc::clone(&calls);
        let slot = Arc::clone(&own_id);
        let id = notifier.subscribe(move |_| {
            *counter.lock() += 1;
            if let Some(id) = *slot.lock() {
                handle.unsubscribe(id);
            }
        });
        *own_id.lock() = Some(id);

        let (_, other_log) = recorder(&notifier);

        notifier.emit(ChangeEvent::LoadComplete);
        notifier.emit(ChangeEvent::LoadComplete);

        assert_eq!(*calls.lock(), 1);
        assert_eq!(other_log.lock().len(), 2);
        assert_eq!(notifier.subscriber_count(), 1);
    }
}
