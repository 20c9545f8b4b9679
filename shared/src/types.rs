//! Common types for the shared crate

use serde_json::{Map, Value};

/// Timestamp type (Unix milliseconds)
pub type Timestamp = i64;

/// Document body as stored remotely: a JSON object without its identifier
pub type Fields = Map<String, Value>;
