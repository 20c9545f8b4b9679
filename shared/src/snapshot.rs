//! Live query snapshot types
//!
//! A snapshot always carries the full, ordered result set of the query.
//! `changes` describes what moved since the previous snapshot of the same
//! listen; consumers that only mirror the collection may ignore it.

use serde::{Deserialize, Serialize};

use crate::models::Record;
use crate::types::Fields;

/// One remote document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    pub id: String,
    pub data: Fields,
}

/// 变更类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Modified,
    Removed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentChange {
    pub kind: ChangeKind,
    pub id: String,
}

/// Result set pushed by a live query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuerySnapshot {
    /// Collection path the query targets
    pub path: String,
    /// Matching documents in query order
    pub docs: Vec<DocumentSnapshot>,
    /// Changes relative to the previous snapshot (all `Added` on first delivery)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<DocumentChange>,
}

impl QuerySnapshot {
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Decode every document, keeping query order
    pub fn into_records(self) -> Vec<Record> {
        self.docs.into_iter().map(Record::from_document).collect()
    }
}
