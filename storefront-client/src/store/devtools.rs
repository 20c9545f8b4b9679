//! Store inspection
//!
//! Keeps the most recent dispatched actions together with the state they
//! produced, and mirrors each one to the `devtools` tracing target.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// Action type of the entry recorded at store creation
pub const INIT_ACTION: &str = "@@INIT";

/// Content part of an adjacently tagged action (`{"type", "payload"}`)
///
/// Unit actions carry no payload and map to `Null`.
pub(crate) fn action_payload(action: Value) -> Value {
    match action {
        Value::Object(mut map) => map.remove("payload").unwrap_or(Value::Null),
        _ => Value::Null,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionRecord {
    pub seq: u64,
    pub action_type: String,
    pub payload: Value,
    /// Root state after the action
    pub state: Value,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct History {
    next_seq: u64,
    entries: VecDeque<ActionRecord>,
}

#[derive(Debug, Clone)]
pub struct DevTools {
    history: Arc<Mutex<History>>,
    max_age: usize,
}

impl DevTools {
    pub fn new(max_age: usize) -> Self {
        Self {
            history: Arc::default(),
            max_age: max_age.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, History> {
        self.history.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub(crate) fn record_init(&self, state: &impl Serialize) {
        self.record(INIT_ACTION, Value::Null, state);
    }

    pub(crate) fn record(&self, action_type: &str, payload: Value, state: &impl Serialize) {
        let state = serde_json::to_value(state).unwrap_or(Value::Null);
        let mut history = self.lock();
        let seq = history.next_seq;
        history.next_seq += 1;

        tracing::debug!(target: "devtools", seq, action = action_type, %payload, "Action dispatched");

        history.entries.push_back(ActionRecord {
            seq,
            action_type: action_type.to_string(),
            payload,
            state,
            at: Utc::now(),
        });
        while history.entries.len() > self.max_age {
            history.entries.pop_front();
        }
    }

    /// Oldest first
    pub fn history(&self) -> Vec<ActionRecord> {
        self.lock().entries.iter().cloned().collect()
    }

    pub fn last(&self) -> Option<ActionRecord> {
        self.lock().entries.back().cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    pub fn max_age(&self) -> usize {
        self.max_age
    }

    /// Drop the recorded history; sequence numbers keep counting
    pub fn clear(&self) {
        self.lock().entries.clear();
    }
}
