//! Record Model

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::snapshot::DocumentSnapshot;
use crate::types::Fields;

/// A decoded remote document
///
/// The document body is kept as-is; the remote document identifier is folded
/// in under `id`. Serializes flat: `{"id": "...", "time": 1, ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(flatten)]
    pub fields: Fields,
}

impl Record {
    /// Field the mirrors are ordered by
    pub const TIME_FIELD: &'static str = "time";

    /// Build a record; an `id` key inside `fields` is replaced by `id`
    pub fn new(id: impl Into<String>, mut fields: Fields) -> Self {
        fields.remove("id");
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Decode a document snapshot
    pub fn from_document(doc: DocumentSnapshot) -> Self {
        Self::new(doc.id, doc.data)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        if key == "id" {
            return None;
        }
        self.fields.get(key)
    }

    /// The ordering field, if present
    pub fn time(&self) -> Option<&Value> {
        self.fields.get(Self::TIME_FIELD)
    }

    /// Flat JSON object including `id`
    pub fn to_value(&self) -> Value {
        let mut object = self.fields.clone();
        object.insert("id".to_string(), Value::String(self.id.clone()));
        Value::Object(object)
    }
}

impl From<DocumentSnapshot> for Record {
    fn from(doc: DocumentSnapshot) -> Self {
        Self::from_document(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Fields {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_document_id_overrides_data_id() {
        let doc = DocumentSnapshot {
            id: "doc-1".to_string(),
            data: fields(json!({"id": "stale", "time": 3, "title": "Mug"})),
        };

        let record = Record::from_document(doc);
        assert_eq!(record.id, "doc-1");
        assert_eq!(record.time(), Some(&json!(3)));
        assert!(!record.fields.contains_key("id"));
    }

    #[test]
    fn test_serializes_flat() {
        let record = Record::new("p1", fields(json!({"time": 1, "price": 9.5})));
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value, json!({"id": "p1", "time": 1, "price": 9.5}));
        assert_eq!(value, record.to_value());

        let back: Record = serde_json::from_value(value).unwrap();
        assert_eq!(back, record);
    }
}
