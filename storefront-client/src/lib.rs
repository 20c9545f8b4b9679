//! Storefront Client - client-side state for the storefront admin app
//!
//! Two independent parts:
//!
//! - [`sync`]: live mirrors of the `products`, `order` and `user` remote
//!   collections with per-collection loading flags and order deletion.
//! - [`store`]: the dispatch-based cart store.

pub mod config;
pub mod error;
pub mod logger;
pub mod notify;
pub mod remote;
pub mod store;
pub mod sync;

pub use config::StorefrontConfig;
pub use error::{SyncError, SyncResult};
pub use notify::{Notifier, ToastCenter};
pub use remote::{MemoryDatabase, Query, RemoteDatabase};
pub use store::{CartAction, CartStore, Store, StoreOptions, configure_cart_store, configure_store};
pub use sync::{CancelHandle, CollectionSync, SyncContext, SyncProvider, SyncState, SyncStore};

// Re-export shared types for convenience
pub use shared::message::{Toast, ToastLevel};
pub use shared::models::{Collection, LoadingFlags, Record};
