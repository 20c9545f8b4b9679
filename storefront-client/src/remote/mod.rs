//! Remote database layer
//!
//! The sync only needs two things from the realtime document database: an
//! ordered live query that pushes full snapshots, and document deletion.
//! [`RemoteDatabase`] captures exactly that; [`MemoryDatabase`] is the
//! in-process implementation used by tests and local development.

pub mod memory;
pub mod ordering;

pub use memory::MemoryDatabase;

use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

use async_trait::async_trait;
use futures::Stream;
use shared::snapshot::QuerySnapshot;
use tokio::sync::mpsc;

use crate::error::{SyncError, SyncResult};

/// Item type of a live query stream; an `Err` ends the listen
pub type SnapshotResult = SyncResult<QuerySnapshot>;

/// Live query over one collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub path: String,
    /// Ascending order field; documents lacking it are excluded
    pub order_by: Option<String>,
}

impl Query {
    pub fn collection(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            order_by: None,
        }
    }

    pub fn order_by(mut self, field: impl Into<String>) -> Self {
        self.order_by = Some(field.into());
        self
    }

    pub fn validate(&self) -> SyncResult<()> {
        validate_collection_path(&self.path)?;
        if let Some(field) = &self.order_by
            && field.is_empty()
        {
            return Err(SyncError::InvalidArgument(
                "Order field must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Collection paths alternate collection/document segments and end on a
/// collection: `products`, `shops/s1/order`.
pub fn validate_collection_path(path: &str) -> SyncResult<()> {
    let segments: Vec<&str> = path.split('/').collect();
    if path.is_empty() || segments.iter().any(|s| s.is_empty()) || segments.len() % 2 == 0 {
        return Err(SyncError::InvalidArgument(format!(
            "Invalid collection path: '{}'",
            path
        )));
    }
    Ok(())
}

pub fn validate_document_id(id: &str) -> SyncResult<()> {
    if id.is_empty() || id.contains('/') {
        return Err(SyncError::InvalidArgument(format!(
            "Invalid document id: '{}'",
            id
        )));
    }
    Ok(())
}

/// Stream of snapshots pushed by a live query
#[derive(Debug)]
pub struct SnapshotStream {
    rx: mpsc::UnboundedReceiver<SnapshotResult>,
}

impl SnapshotStream {
    /// Create a stream and the sender the backend pushes into
    pub fn channel() -> (mpsc::UnboundedSender<SnapshotResult>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self { rx })
    }
}

impl Stream for SnapshotStream {
    type Item = SnapshotResult;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().rx.poll_recv(cx)
    }
}

/// Detaches a listener from the backend
///
/// `remove` runs the detach callback at most once.
pub struct ListenerRegistration {
    remove: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl ListenerRegistration {
    pub fn new(remove: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            remove: Some(Box::new(remove)),
        }
    }

    /// A registration with nothing to detach
    pub fn detached() -> Self {
        Self { remove: None }
    }

    pub fn is_attached(&self) -> bool {
        self.remove.is_some()
    }

    pub fn remove(&mut self) {
        if let Some(remove) = self.remove.take() {
            remove();
        }
    }
}

impl fmt::Debug for ListenerRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistration")
            .field("attached", &self.is_attached())
            .finish()
    }
}

/// An open live query
#[derive(Debug)]
pub struct Listener {
    pub stream: SnapshotStream,
    pub registration: ListenerRegistration,
}

/// Realtime document database
#[async_trait]
pub trait RemoteDatabase: Send + Sync {
    /// Open a live query
    ///
    /// Setup errors are returned synchronously. The first snapshot is pushed
    /// onto the stream once the backend has the result set.
    fn listen(&self, query: Query) -> SyncResult<Listener>;

    /// Delete one document; deleting a missing document succeeds
    async fn delete_document(&self, path: &str, id: &str) -> SyncResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_collection_path_validation() {
        assert!(validate_collection_path("products").is_ok());
        assert!(validate_collection_path("shops/s1/order").is_ok());
        assert!(validate_collection_path("").is_err());
        assert!(validate_collection_path("shops/s1").is_err());
        assert!(validate_collection_path("order//x").is_err());
    }

    #[test]
    fn test_query_rejects_empty_order_field() {
        let query = Query::collection("order").order_by("");
        assert!(matches!(
            query.validate(),
            Err(SyncError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_registration_removes_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut registration = ListenerRegistration::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        registration.remove();
        registration.remove();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!registration.is_attached());
    }
}
