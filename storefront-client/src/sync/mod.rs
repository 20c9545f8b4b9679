//! Realtime collection sync
//!
//! # 数据流
//!
//! ```text
//! RemoteDatabase ──listen()──▶ SnapshotStream ──pump task──▶ SyncStore ──▶ SyncContext
//!                                   ▲                            │
//!                            CancelHandle                watch::Receiver
//! ```
//!
//! Every snapshot replaces the whole mirror of its collection. State is only
//! written by the pump tasks, the delete operation and the explicit
//! `set_loading` escape hatch, all through [`SyncStore`].

mod cancel;
mod collection;
mod provider;
mod state;

pub use cancel::CancelHandle;
pub use collection::{CollectionSync, RecordStream};
pub use provider::{SyncContext, SyncProvider};
pub use state::{SyncState, SyncStore};
