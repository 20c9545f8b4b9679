//! Shared types for the storefront client
//!
//! Data model used by both the remote database layer and the client-side
//! state: records, collection bindings, loading flags, query snapshots and
//! toast payloads.

pub mod message;
pub mod models;
pub mod snapshot;
pub mod types;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use message::{Toast, ToastLevel};
pub use models::{Collection, LoadingFlags, Record};
pub use snapshot::{ChangeKind, DocumentChange, DocumentSnapshot, QuerySnapshot};
