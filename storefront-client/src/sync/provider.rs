use std::sync::Arc;

use shared::models::{Collection, LoadingFlags, Record};
use tokio::sync::watch;

use super::cancel::CancelHandle;
use super::collection::CollectionSync;
use super::state::{SyncState, SyncStore};
use crate::notify::Notifier;
use crate::remote::RemoteDatabase;

/// Owner of the three collection subscriptions
///
/// Mounting opens the products, orders and users subscriptions together;
/// unmounting (or dropping) cancels them together. Consumers never hold the
/// provider, only the [`SyncContext`] it hands out.
///
/// ```no_run
/// # use std::sync::Arc;
/// # use storefront_client::{MemoryDatabase, SyncProvider, ToastCenter};
/// # async fn demo() {
/// let provider = SyncProvider::mount(Arc::new(MemoryDatabase::new()), Arc::new(ToastCenter::default()));
/// let ctx = provider.context();
/// ctx.delete_order("o1").await;
/// provider.unmount();
/// # }
/// ```
#[derive(Debug)]
pub struct SyncProvider {
    sync: CollectionSync,
    handles: Vec<(Collection, CancelHandle)>,
}

impl SyncProvider {
    /// Create empty mirrors and subscribe to all three collections
    ///
    /// Must be called from within a tokio runtime.
    pub fn mount(remote: Arc<dyn RemoteDatabase>, notifier: Arc<dyn Notifier>) -> Self {
        let sync = CollectionSync::new(remote, notifier, SyncStore::new());

        let handles = vec![
            (Collection::Products, sync.get_all_products()),
            (Collection::Orders, sync.get_all_orders()),
            (Collection::Users, sync.get_all_users()),
        ];
        tracing::info!(
            active = handles.iter().filter(|(_, h)| h.is_active()).count(),
            "Sync provider mounted"
        );

        Self { sync, handles }
    }

    pub fn context(&self) -> SyncContext {
        SyncContext {
            sync: self.sync.clone(),
        }
    }

    pub fn is_mounted(&self) -> bool {
        !self.sync.is_stopped()
    }

    /// Cancel every subscription
    pub fn unmount(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.sync.is_stopped() {
            return;
        }
        for (collection, handle) in self.handles.drain(..) {
            if handle.is_active() {
                handle.cancel();
            } else {
                tracing::debug!(%collection, "No active subscription to cancel");
            }
        }
        // Also ends subscriptions consumers opened through the context
        self.sync.stop();
        tracing::info!("Sync provider unmounted");
    }
}

impl Drop for SyncProvider {
    fn drop(&mut self) {
        self.release();
    }
}

/// Consumer view of the synced state
///
/// Mirrors are read-only; the only writes available are `delete_order`,
/// new subscriptions and the `set_loading` escape hatch.
#[derive(Debug, Clone)]
pub struct SyncContext {
    sync: CollectionSync,
}

impl SyncContext {
    pub fn loading(&self) -> LoadingFlags {
        self.sync.store().loading()
    }

    /// Raw loading flag setter
    pub fn set_loading(&self, collection: Collection, value: bool) {
        self.sync.store().set_loading(collection, value);
    }

    /// Raw setter for the whole flags object
    pub fn set_loading_flags(&self, flags: LoadingFlags) {
        self.sync.store().set_loading_flags(flags);
    }

    pub fn products(&self) -> Vec<Record> {
        self.sync.store().mirror(Collection::Products)
    }

    pub fn get_all_products(&self) -> CancelHandle {
        self.sync.get_all_products()
    }

    pub fn orders(&self) -> Vec<Record> {
        self.sync.store().mirror(Collection::Orders)
    }

    pub async fn delete_order(&self, id: &str) {
        self.sync.delete_record(Collection::Orders, id).await;
    }

    pub fn users(&self) -> Vec<Record> {
        self.sync.store().mirror(Collection::Users)
    }

    pub fn get_all_users(&self) -> CancelHandle {
        self.sync.get_all_users()
    }

    /// Current state, all mirrors and flags at once
    pub fn state(&self) -> SyncState {
        self.sync.store().snapshot()
    }

    /// Observe state changes
    pub fn subscribe(&self) -> watch::Receiver<SyncState> {
        self.sync.store().subscribe()
    }
}
