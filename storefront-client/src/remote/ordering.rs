//! Value ordering for ordered live queries
//!
//! Values of different types order by type rank
//! (null < bool < number < string < array < object), values of the same type
//! by value. Documents lacking the order field are not part of the result.

use std::cmp::Ordering;

use serde_json::Value;
use shared::snapshot::DocumentSnapshot;

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            match (x.as_i64(), y.as_i64()) {
                (Some(x), Some(y)) => x.cmp(&y),
                _ => {
                    let x = x.as_f64().unwrap_or(f64::NAN);
                    let y = y.as_f64().unwrap_or(f64::NAN);
                    x.total_cmp(&y)
                }
            }
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Array(x), Value::Array(y)) => x
            .iter()
            .zip(y.iter())
            .map(|(x, y)| compare_values(x, y))
            .find(|o| o.is_ne())
            .unwrap_or_else(|| x.len().cmp(&y.len())),
        (Value::Object(x), Value::Object(y)) => x
            .iter()
            .zip(y.iter())
            .map(|((kx, vx), (ky, vy))| kx.cmp(ky).then_with(|| compare_values(vx, vy)))
            .find(|o| o.is_ne())
            .unwrap_or_else(|| x.len().cmp(&y.len())),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

/// Apply `order_by(field)` to a result set
pub fn order_documents(docs: Vec<DocumentSnapshot>, field: &str) -> Vec<DocumentSnapshot> {
    let mut docs: Vec<DocumentSnapshot> = docs
        .into_iter()
        .filter(|doc| doc.data.contains_key(field))
        .collect();
    docs.sort_by(|a, b| {
        let (Some(x), Some(y)) = (a.data.get(field), b.data.get(field)) else {
            return Ordering::Equal;
        };
        compare_values(x, y).then_with(|| a.id.cmp(&b.id))
    });
    docs
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(id: &str, data: Value) -> DocumentSnapshot {
        DocumentSnapshot {
            id: id.to_string(),
            data: data.as_object().cloned().unwrap(),
        }
    }

    #[test]
    fn test_mixed_number_representations() {
        assert_eq!(compare_values(&json!(1), &json!(1.5)), Ordering::Less);
        assert_eq!(compare_values(&json!(2.0), &json!(2)), Ordering::Equal);
        assert_eq!(compare_values(&json!(-3), &json!(2)), Ordering::Less);
    }

    #[test]
    fn test_type_rank_orders_across_types() {
        assert_eq!(compare_values(&json!(null), &json!(false)), Ordering::Less);
        assert_eq!(compare_values(&json!(100), &json!("1")), Ordering::Less);
        assert_eq!(compare_values(&json!("z"), &json!([0])), Ordering::Less);
    }

    #[test]
    fn test_order_documents_excludes_missing_field() {
        let docs = vec![
            doc("b", json!({"time": 2})),
            doc("no-time", json!({"title": "draft"})),
            doc("a", json!({"time": 1})),
            doc("c", json!({"time": 1})),
        ];

        let ordered: Vec<String> = order_documents(docs, "time")
            .into_iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(ordered, vec!["a", "c", "b"]);
    }
}
