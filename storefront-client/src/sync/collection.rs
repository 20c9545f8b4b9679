use std::fmt;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::{Stream, StreamExt};
use shared::message::Toast;
use shared::models::{Collection, Record};
use tokio_util::sync::CancellationToken;

use super::cancel::CancelHandle;
use super::state::SyncStore;
use crate::error::{SyncError, SyncResult};
use crate::notify::Notifier;
use crate::remote::{Query, RemoteDatabase, SnapshotStream};

/// Live sync of remote collections into a [`SyncStore`]
///
/// Cloning shares the backend, the notifier and the store. All
/// subscriptions opened through one instance stop when its root token is
/// cancelled, even if their handles were never cancelled.
#[derive(Clone)]
pub struct CollectionSync {
    remote: Arc<dyn RemoteDatabase>,
    notifier: Arc<dyn Notifier>,
    store: SyncStore,
    root: CancellationToken,
}

impl fmt::Debug for CollectionSync {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionSync")
            .field("store", &self.store)
            .field("stopped", &self.root.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl CollectionSync {
    pub fn new(
        remote: Arc<dyn RemoteDatabase>,
        notifier: Arc<dyn Notifier>,
        store: SyncStore,
    ) -> Self {
        Self {
            remote,
            notifier,
            store,
            root: CancellationToken::new(),
        }
    }

    pub fn store(&self) -> &SyncStore {
        &self.store
    }

    /// Stop every subscription opened through this instance
    pub(crate) fn stop(&self) {
        self.root.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.root.is_cancelled()
    }

    fn query(path: &str) -> Query {
        Query::collection(path).order_by(Record::TIME_FIELD)
    }

    /// Mirror the remote collection `path` through `on_update`
    ///
    /// Sets the `flag` loading flag, then opens a live query ordered by
    /// `time`. Each snapshot is decoded in full and handed to `on_update`,
    /// after which the flag is cleared. Setup failures are logged, toasted
    /// and swallowed: the flag is cleared and a no-op handle returned.
    /// Once the sync is stopped nothing is opened and the flag is left alone.
    ///
    /// Must be called from within a tokio runtime.
    pub fn subscribe<F>(&self, path: &str, on_update: F, flag: Collection) -> CancelHandle
    where
        F: Fn(Vec<Record>) + Send + 'static,
    {
        if self.is_stopped() {
            tracing::debug!(collection = %path, "Sync stopped, subscription skipped");
            return CancelHandle::noop();
        }
        self.store.set_loading(flag, true);

        let listener = match self.remote.listen(Self::query(path)) {
            Ok(listener) => listener,
            Err(e) => {
                tracing::error!(collection = %path, error = %e, "Error fetching {}", path);
                self.notifier
                    .notify(Toast::error(format!("Failed to load {}", path)));
                self.store.set_loading(flag, false);
                return CancelHandle::noop();
            }
        };

        let token = self.root.child_token();
        tokio::spawn(pump(
            listener.stream,
            token.clone(),
            path.to_string(),
            flag,
            self.store.clone(),
            self.notifier.clone(),
            on_update,
        ));
        tracing::debug!(collection = %path, flag = %flag, "Subscribed");

        CancelHandle::new(path, token, listener.registration)
    }

    /// Live query as a stream of full record sets
    ///
    /// Unlike [`subscribe`](Self::subscribe) this reports setup and stream
    /// errors to the caller and touches neither flags nor toasts.
    pub fn watch(&self, path: &str) -> SyncResult<(RecordStream, CancelHandle)> {
        if self.is_stopped() {
            return Err(SyncError::Unavailable(format!(
                "Sync stopped, cannot watch '{}'",
                path
            )));
        }
        let listener = self.remote.listen(Self::query(path))?;
        let token = self.root.child_token();
        let stream = RecordStream {
            inner: listener.stream,
            token: token.clone(),
        };
        Ok((stream, CancelHandle::new(path, token, listener.registration)))
    }

    pub fn get_all_products(&self) -> CancelHandle {
        self.bind(Collection::Products)
    }

    pub fn get_all_orders(&self) -> CancelHandle {
        self.bind(Collection::Orders)
    }

    pub fn get_all_users(&self) -> CancelHandle {
        self.bind(Collection::Users)
    }

    fn bind(&self, collection: Collection) -> CancelHandle {
        let store = self.store.clone();
        self.subscribe(
            collection.remote_path(),
            move |records| store.deliver(collection, records),
            collection,
        )
    }

    /// Delete one document of `collection`
    ///
    /// The loading flag is set for the duration of the call and cleared
    /// afterwards whatever the outcome, including when the future is dropped
    /// early. The outcome is reported as a toast only.
    pub async fn delete_record(&self, collection: Collection, id: &str) {
        let _loading = LoadingGuard::set(&self.store, collection);

        match self.remote.delete_document(collection.remote_path(), id).await {
            Ok(()) => {
                tracing::info!(collection = %collection.remote_path(), id, "Document deleted");
                self.notifier.notify(Toast::success(format!(
                    "{} deleted successfully",
                    collection.title()
                )));
            }
            Err(e) => {
                tracing::error!(
                    collection = %collection.remote_path(),
                    id,
                    error = %e,
                    "Error deleting {}",
                    collection.label()
                );
                self.notifier
                    .notify(Toast::error(format!("Failed to delete {}", collection.label())));
            }
        }
    }
}

/// Clears a loading flag on drop
struct LoadingGuard<'a> {
    store: &'a SyncStore,
    collection: Collection,
}

impl<'a> LoadingGuard<'a> {
    fn set(store: &'a SyncStore, collection: Collection) -> Self {
        store.set_loading(collection, true);
        Self { store, collection }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.store.set_loading(self.collection, false);
    }
}

/// Drain one snapshot stream into `on_update` until cancelled
///
/// The flag is cleared on the way out if nothing was ever delivered.
async fn pump<F>(
    mut stream: SnapshotStream,
    token: CancellationToken,
    path: String,
    flag: Collection,
    store: SyncStore,
    notifier: Arc<dyn Notifier>,
    on_update: F,
) where
    F: Fn(Vec<Record>) + Send + 'static,
{
    let mut delivered = false;
    loop {
        let next = tokio::select! {
            biased;
            _ = token.cancelled() => break,
            next = stream.next() => next,
        };

        match next {
            Some(Ok(snapshot)) => {
                if token.is_cancelled() {
                    break;
                }
                let records = snapshot.into_records();
                tracing::trace!(collection = %path, count = records.len(), "Snapshot");
                on_update(records);
                store.set_loading(flag, false);
                delivered = true;
            }
            Some(Err(e)) => {
                tracing::error!(collection = %path, error = %e, "Error fetching {}", path);
                notifier.notify(Toast::error(format!("Failed to load {}", path)));
                store.set_loading(flag, false);
                break;
            }
            None => {
                tracing::debug!(collection = %path, "Snapshot stream closed");
                break;
            }
        }
    }

    if !delivered {
        store.set_loading(flag, false);
    }
}

/// Record sets of a live query, see [`CollectionSync::watch`]
///
/// Ends once the subscription is cancelled.
#[derive(Debug)]
pub struct RecordStream {
    inner: SnapshotStream,
    token: CancellationToken,
}

impl Stream for RecordStream {
    type Item = SyncResult<Vec<Record>>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.token.is_cancelled() {
            return Poll::Ready(None);
        }
        Pin::new(&mut this.inner)
            .poll_next(cx)
            .map(|item| item.map(|result| result.map(|snapshot| snapshot.into_records())))
    }
}
