use std::cmp::Ordering;

use chrono::{DateTime, FixedOffset};
use serde_json::Value;

use crate::storage::document::RawDoc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

/// Equality filters, one ordering and an optional limit over a collection.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Query {
    pub filters: Vec<(String, Value)>,
    pub order_by: Option<OrderBy>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self { Self::default() }

    pub fn filter(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push((field.into(), value.into()));
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by = Some(OrderBy { field: field.into(), direction });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Newest first by creation time; the default listing order.
    pub fn newest_first() -> Self { Self::new().order_by("created_at", Direction::Desc) }

    pub fn matches(&self, doc: &RawDoc) -> bool {
        self.filters.iter().all(|(field, expected)| doc.get(field) == Some(expected))
    }

    /// Filter, sort and truncate any items that can be viewed as field maps.
    /// The sort is stable, so equal keys keep their incoming order.
    pub fn apply_with<I, F>(&self, items: Vec<I>, fields: F) -> Vec<I>
    where
        F: Fn(&I) -> RawDoc,
    {
        let mut keyed: Vec<(RawDoc, I)> = items
            .into_iter()
            .map(|item| (fields(&item), item))
            .filter(|(doc, _)| self.matches(doc))
            .collect();
        if let Some(order) = &self.order_by {
            keyed.sort_by(|(a, _), (b, _)| {
                let ord = compare_values(a.get(&order.field), b.get(&order.field));
                match order.direction {
                    Direction::Asc => ord,
                    Direction::Desc => ord.reverse(),
                }
            });
        }
        let limit = self.limit.unwrap_or(usize::MAX);
        keyed.into_iter().map(|(_, item)| item).take(limit).collect()
    }

    pub fn apply(&self, docs: Vec<(String, RawDoc)>) -> Vec<(String, RawDoc)> {
        let mut docs = docs;
        // HashMap iteration order is arbitrary; fix it before the stable sort.
        docs.sort_by(|(a, _), (b, _)| a.cmp(b));
        self.apply_with(docs, |(_, doc)| doc.clone())
    }
}

/// Missing sorts first; RFC 3339 strings compare as instants.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => {
            match (parse_instant(x), parse_instant(y)) {
                (Some(tx), Some(ty)) => tx.cmp(&ty),
                _ => x.cmp(y),
            }
        }
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

fn parse_instant(s: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(s).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(v: Value) -> RawDoc {
        v.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn filters_orders_and_limits() {
        let docs = vec![
            ("a".to_string(), doc(json!({"featured": true, "created_at": "2024-01-01T00:00:00Z"}))),
            ("b".to_string(), doc(json!({"featured": false, "created_at": "2024-03-01T00:00:00Z"}))),
            ("c".to_string(), doc(json!({"featured": true, "created_at": "2024-02-01T00:00:00.500Z"}))),
        ];
        let q = Query::newest_first().filter("featured", true);
        let ids: Vec<String> = q.apply(docs.clone()).into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["c", "a"]);

        let q = Query::new().order_by("created_at", Direction::Asc).limit(2);
        let ids: Vec<String> = q.apply(docs).into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn timestamps_compare_as_instants() {
        // lexical order would put ".5Z" before "Z"
        let a = json!("2024-01-01T00:00:00.500Z");
        let b = json!("2024-01-01T00:00:00Z");
        assert_eq!(compare_values(Some(&a), Some(&b)), Ordering::Greater);
    }

    #[test]
    fn numbers_and_missing_values() {
        assert_eq!(compare_values(Some(&json!(2)), Some(&json!(10))), Ordering::Less);
        assert_eq!(compare_values(None, Some(&json!(1))), Ordering::Less);
    }
}
