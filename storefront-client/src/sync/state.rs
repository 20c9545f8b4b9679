use std::sync::Arc;

use serde::Serialize;
use shared::models::{Collection, LoadingFlags, Record};
use tokio::sync::watch;

/// Everything the sync exposes to consumers
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SyncState {
    pub loading: LoadingFlags,
    pub products: Vec<Record>,
    pub orders: Vec<Record>,
    pub users: Vec<Record>,
}

impl SyncState {
    pub fn mirror(&self, collection: Collection) -> &[Record] {
        match collection {
            Collection::Products => &self.products,
            Collection::Orders => &self.orders,
            Collection::Users => &self.users,
        }
    }

    fn mirror_mut(&mut self, collection: Collection) -> &mut Vec<Record> {
        match collection {
            Collection::Products => &mut self.products,
            Collection::Orders => &mut self.orders,
            Collection::Users => &mut self.users,
        }
    }
}

/// Observable holder of [`SyncState`]
///
/// Cloning shares the same state. Writes are serialized by the watch
/// channel; observers see each committed state.
#[derive(Debug, Clone)]
pub struct SyncStore {
    tx: Arc<watch::Sender<SyncState>>,
}

impl SyncStore {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(SyncState::default());
        Self { tx: Arc::new(tx) }
    }

    pub fn snapshot(&self) -> SyncState {
        self.tx.borrow().clone()
    }

    pub fn loading(&self) -> LoadingFlags {
        self.tx.borrow().loading
    }

    pub fn mirror(&self, collection: Collection) -> Vec<Record> {
        self.tx.borrow().mirror(collection).to_vec()
    }

    /// Set one loading flag; observers are only woken on an actual change
    pub fn set_loading(&self, collection: Collection, value: bool) {
        self.tx.send_if_modified(|state| {
            if state.loading.get(collection) == value {
                return false;
            }
            state.loading.set(collection, value);
            true
        });
    }

    /// Replace all loading flags at once
    pub fn set_loading_flags(&self, flags: LoadingFlags) {
        self.tx.send_if_modified(|state| {
            if state.loading == flags {
                return false;
            }
            state.loading = flags;
            true
        });
    }

    /// Replace a mirror wholesale and clear its flag in one write
    pub fn deliver(&self, collection: Collection, records: Vec<Record>) {
        self.tx.send_modify(|state| {
            *state.mirror_mut(collection) = records;
            state.loading.set(collection, false);
        });
    }

    pub fn subscribe(&self) -> watch::Receiver<SyncState> {
        self.tx.subscribe()
    }
}

impl Default for SyncStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unchanged_flag_does_not_wake_observers() {
        let store = SyncStore::new();
        let mut rx = store.subscribe();

        store.set_loading(Collection::Users, false);
        assert!(!rx.has_changed().unwrap());

        store.set_loading(Collection::Users, true);
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().loading.users);
    }

    #[test]
    fn test_deliver_replaces_mirror_wholesale() {
        let store = SyncStore::new();
        store.deliver(
            Collection::Orders,
            vec![
                Record::new("o1", Default::default()),
                Record::new("o2", Default::default()),
            ],
        );
        store.deliver(Collection::Orders, vec![Record::new("o3", Default::default())]);

        let ids: Vec<String> = store
            .mirror(Collection::Orders)
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["o3"]);
        assert!(store.mirror(Collection::Products).is_empty());
    }

    #[tokio::test]
    async fn test_deliver_wakes_observers_once() {
        let store = SyncStore::new();
        store.set_loading(Collection::Products, true);
        let mut rx = store.subscribe();
        rx.borrow_and_update();

        store.deliver(Collection::Products, vec![Record::new("p1", Default::default())]);
        let state = rx.borrow_and_update().clone();
        assert_eq!(state.products.len(), 1);
        assert!(!state.loading.products);

        store.set_loading(Collection::Products, false);
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_set_loading_flags_replaces_all() {
        let store = SyncStore::new();
        store.set_loading(Collection::Orders, true);
        store.set_loading_flags(LoadingFlags {
            products: true,
            orders: false,
            users: true,
        });

        let flags = store.loading();
        assert!(flags.products && flags.users);
        assert!(!flags.orders);
    }
}
