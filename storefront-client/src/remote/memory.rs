//! In-process realtime document database
//!
//! Holds collections in memory and pushes a full, ordered snapshot to every
//! listener of a collection after each write. Failures can be injected per
//! collection path to exercise the error paths of the sync.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::Value;
use shared::snapshot::{ChangeKind, DocumentChange, DocumentSnapshot, QuerySnapshot};
use shared::types::Fields;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::ordering::order_documents;
use super::{
    Listener, ListenerRegistration, Query, RemoteDatabase, SnapshotResult, SnapshotStream,
    validate_collection_path, validate_document_id,
};
use crate::error::{SyncError, SyncResult};

#[derive(Debug)]
struct ListenerEntry {
    query: Query,
    tx: mpsc::UnboundedSender<SnapshotResult>,
}

#[derive(Debug, Default)]
struct Inner {
    /// path -> (document id -> body)
    collections: HashMap<String, BTreeMap<String, Fields>>,
    listeners: HashMap<Uuid, ListenerEntry>,
    listen_failures: HashMap<String, SyncError>,
    delete_failures: HashMap<String, SyncError>,
}

impl Inner {
    fn run_query(&self, query: &Query) -> Vec<DocumentSnapshot> {
        let docs: Vec<DocumentSnapshot> = self
            .collections
            .get(&query.path)
            .map(|docs| {
                docs.iter()
                    .map(|(id, data)| DocumentSnapshot {
                        id: id.clone(),
                        data: data.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        match &query.order_by {
            Some(field) => order_documents(docs, field),
            None => docs,
        }
    }

    /// Push the current result set to every listener on `path`
    fn publish(&mut self, path: &str, changes: Vec<DocumentChange>) {
        let mut closed = Vec::new();
        for (id, entry) in self.listeners.iter().filter(|(_, e)| e.query.path == path) {
            let snapshot = QuerySnapshot {
                path: path.to_string(),
                docs: self.run_query(&entry.query),
                changes: changes.clone(),
            };
            if entry.tx.send(Ok(snapshot)).is_err() {
                closed.push(*id);
            }
        }
        for id in closed {
            tracing::debug!(listener = %id, path, "Dropping closed listener");
            self.listeners.remove(&id);
        }
    }
}

/// In-memory [`RemoteDatabase`]
#[derive(Debug, Clone, Default)]
pub struct MemoryDatabase {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Create or overwrite a document; `data` must be a JSON object
    pub fn set_document(&self, path: &str, id: &str, data: Value) -> SyncResult<()> {
        validate_collection_path(path)?;
        validate_document_id(id)?;
        let Value::Object(mut fields) = data else {
            return Err(SyncError::InvalidArgument(
                "Document data must be an object".to_string(),
            ));
        };
        fields.remove("id");

        let mut inner = self.lock();
        let previous = inner
            .collections
            .entry(path.to_string())
            .or_default()
            .insert(id.to_string(), fields);
        let kind = if previous.is_some() {
            ChangeKind::Modified
        } else {
            ChangeKind::Added
        };
        inner.publish(
            path,
            vec![DocumentChange {
                kind,
                id: id.to_string(),
            }],
        );
        Ok(())
    }

    /// Replace a whole collection in one write; listeners get one snapshot
    pub fn replace_collection(&self, path: &str, docs: Vec<(String, Value)>) -> SyncResult<()> {
        validate_collection_path(path)?;
        let mut next = BTreeMap::new();
        for (id, data) in docs {
            validate_document_id(&id)?;
            let Value::Object(mut fields) = data else {
                return Err(SyncError::InvalidArgument(format!(
                    "Document '{}' data must be an object",
                    id
                )));
            };
            fields.remove("id");
            next.insert(id, fields);
        }

        let mut inner = self.lock();
        let previous = inner.collections.insert(path.to_string(), next.clone());
        let previous = previous.unwrap_or_default();

        let mut changes: Vec<DocumentChange> = previous
            .keys()
            .filter(|id| !next.contains_key(*id))
            .map(|id| DocumentChange {
                kind: ChangeKind::Removed,
                id: id.clone(),
            })
            .collect();
        for (id, fields) in &next {
            match previous.get(id) {
                None => changes.push(DocumentChange {
                    kind: ChangeKind::Added,
                    id: id.clone(),
                }),
                Some(old) if old != fields => changes.push(DocumentChange {
                    kind: ChangeKind::Modified,
                    id: id.clone(),
                }),
                Some(_) => {}
            }
        }

        inner.publish(path, changes);
        Ok(())
    }

    /// Current documents of a collection, by id
    pub fn documents(&self, path: &str) -> Vec<DocumentSnapshot> {
        self.lock().run_query(&Query::collection(path))
    }

    pub fn document(&self, path: &str, id: &str) -> Option<Fields> {
        self.lock()
            .collections
            .get(path)
            .and_then(|docs| docs.get(id))
            .cloned()
    }

    /// Number of attached listeners on `path`
    pub fn active_listeners(&self, path: &str) -> usize {
        self.lock()
            .listeners
            .values()
            .filter(|entry| entry.query.path == path)
            .count()
    }

    /// Make every following `listen` on `path` fail at setup
    pub fn fail_listen(&self, path: &str, error: SyncError) {
        self.lock().listen_failures.insert(path.to_string(), error);
    }

    /// Make every following delete in `path` fail
    pub fn fail_delete(&self, path: &str, error: SyncError) {
        self.lock().delete_failures.insert(path.to_string(), error);
    }

    /// Terminate every open listen on `path` with `error`
    pub fn fail_stream(&self, path: &str, error: SyncError) {
        let mut inner = self.lock();
        let ids: Vec<Uuid> = inner
            .listeners
            .iter()
            .filter(|(_, entry)| entry.query.path == path)
            .map(|(id, _)| *id)
            .collect();
        for id in ids {
            if let Some(entry) = inner.listeners.remove(&id) {
                let _ = entry.tx.send(Err(error.clone()));
            }
        }
    }

    /// Remove all injected failures
    pub fn clear_failures(&self) {
        let mut inner = self.lock();
        inner.listen_failures.clear();
        inner.delete_failures.clear();
    }
}

#[async_trait]
impl RemoteDatabase for MemoryDatabase {
    fn listen(&self, query: Query) -> SyncResult<Listener> {
        query.validate()?;

        let mut inner = self.lock();
        if let Some(error) = inner.listen_failures.get(&query.path) {
            return Err(error.clone());
        }

        let (tx, stream) = SnapshotStream::channel();
        let docs = inner.run_query(&query);
        let changes = docs
            .iter()
            .map(|doc| DocumentChange {
                kind: ChangeKind::Added,
                id: doc.id.clone(),
            })
            .collect();
        let initial = QuerySnapshot {
            path: query.path.clone(),
            docs,
            changes,
        };
        // Receiver is alive: it is returned below
        let _ = tx.send(Ok(initial));

        let id = Uuid::new_v4();
        tracing::debug!(listener = %id, path = %query.path, "Listener attached");
        inner.listeners.insert(id, ListenerEntry { query, tx });

        let handle = Arc::downgrade(&self.inner);
        let registration = ListenerRegistration::new(move || {
            if let Some(inner) = handle.upgrade() {
                let mut inner = inner.lock().unwrap_or_else(|e| e.into_inner());
                if inner.listeners.remove(&id).is_some() {
                    tracing::debug!(listener = %id, "Listener detached");
                }
            }
        });

        Ok(Listener {
            stream,
            registration,
        })
    }

    async fn delete_document(&self, path: &str, id: &str) -> SyncResult<()> {
        // Writes complete asynchronously
        tokio::task::yield_now().await;

        validate_collection_path(path)?;
        validate_document_id(id)?;

        let mut inner = self.lock();
        if let Some(error) = inner.delete_failures.get(path) {
            return Err(error.clone());
        }

        let removed = inner
            .collections
            .get_mut(path)
            .and_then(|docs| docs.remove(id));
        if removed.is_some() {
            inner.publish(
                path,
                vec![DocumentChange {
                    kind: ChangeKind::Removed,
                    id: id.to_string(),
                }],
            );
        }
        Ok(())
    }
}
