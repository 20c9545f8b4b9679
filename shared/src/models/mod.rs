//! Data models
//!
//! Shared between the remote database layer and the client-side state.

pub mod collection;
pub mod loading;
pub mod record;

// Re-exports
pub use collection::*;
pub use loading::*;
pub use record::*;
