//! Snapshot subscribers.

use std::sync::Arc;

use parking_lot::Mutex;

use super::LedgerSnapshot;

/// Receives the full ledger state after every successful mutation.
///
/// Callbacks run on the mutating thread with no state or registry lock held,
/// so reading from the store and (un)subscribing inside a callback are fine.
/// Mutating the store from a callback deadlocks.
pub trait LedgerObserver: Send + Sync {
    fn on_snapshot(&self, snapshot: Arc<LedgerSnapshot>);
}

impl<F> LedgerObserver for F
where
    F: Fn(Arc<LedgerSnapshot>) + Send + Sync,
{
    fn on_snapshot(&self, snapshot: Arc<LedgerSnapshot>) {
        self(snapshot)
    }
}

/// Handle returned by `subscribe`, used to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(pub(crate) u64);

/// Observer that keeps every snapshot it receives.
#[derive(Clone, Default)]
pub struct RecordingObserver {
    snapshots: Arc<Mutex<Vec<Arc<LedgerSnapshot>>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshots(&self) -> Vec<Arc<LedgerSnapshot>> {
        self.snapshots.lock().clone()
    }

    pub fn latest(&self) -> Option<Arc<LedgerSnapshot>> {
        self.snapshots.lock().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.snapshots.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.lock().is_empty()
    }
}

impl LedgerObserver for RecordingObserver {
    fn on_snapshot(&self, snapshot: Arc<LedgerSnapshot>) {
        self.snapshots.lock().push(snapshot);
    }
}

#[derive(Default)]
pub(crate) struct ObserverRegistry {
    next_id: u64,
    entries: Vec<(Subscription, Arc<dyn LedgerObserver>)>,
}

impl ObserverRegistry {
    pub(crate) fn insert(&mut self, observer: Arc<dyn LedgerObserver>) -> Subscription {
        self.next_id += 1;
        let subscription = Subscription(self.next_id);
        self.entries.push((subscription, observer));
        subscription
    }

    pub(crate) fn remove(&mut self, subscription: Subscription) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(id, _)| *id != subscription);
        self.entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Current subscribers, detached from the registry so its lock can be dropped.
    pub(crate) fn observers(&self) -> Vec<Arc<dyn LedgerObserver>> {
        self.entries
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect()
    }
}

pub(crate) fn publish(observers: &[Arc<dyn LedgerObserver>], snapshot: &Arc<LedgerSnapshot>) {
    for observer in observers {
        observer.on_snapshot(Arc::clone(snapshot));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removed_observers_stop_receiving() {
        let mut registry = ObserverRegistry::default();
        let recorder = RecordingObserver::new();
        let first = registry.insert(Arc::new(recorder.clone()));
        registry.insert(Arc::new(|_: Arc<LedgerSnapshot>| {}));

        publish(&registry.observers(), &Arc::new(LedgerSnapshot::default()));
        assert!(registry.remove(first));
        assert!(!registry.remove(first));
        publish(&registry.observers(), &Arc::new(LedgerSnapshot::default()));

        assert_eq!(recorder.len(), 1);
        assert_eq!(registry.len(), 1);
    }
}
