//! Document-store capability: per-record CRUD plus simple filtered queries.
//!
//! Documents are JSON field maps; the store assigns opaque string ids.
//! Queries support exactly what the client needs and nothing more: one
//! equality filter, one order-by and a limit.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::Result;

/// A stored document: backend-assigned id plus its JSON field map.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Document {
    pub id: String,
    pub fields: Value,
}

impl Document {
    /// Deserialize the field map into a typed model.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.fields.clone())?)
    }
}

/// Sort direction for [`Query::order_by`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    Desc,
}

/// A bounded, filtered read against one collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub collection: String,
    /// At most one equality filter: `(field, value)`.
    pub filter: Option<(String, Value)>,
    pub order_by: Option<(String, Direction)>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn collection(name: impl Into<String>) -> Self {
        Self {
            collection: name.into(),
            filter: None,
            order_by: None,
            limit: None,
        }
    }

    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter = Some((field.into(), value.into()));
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by = Some((field.into(), direction));
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }
}

/// One entry of an [`UpdatePatch`]: overwrite the field or remove it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum FieldPatch {
    Set(Value),
    Delete,
}

/// A partial field merge: untouched fields keep their stored value, `Set`
/// entries overwrite, `Delete` entries remove the field entirely.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct UpdatePatch {
    entries: BTreeMap<String, FieldPatch>,
}

impl UpdatePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries
            .insert(field.into(), FieldPatch::Set(value.into()));
        self
    }

    pub fn delete_field(mut self, field: impl Into<String>) -> Self {
        self.entries.insert(field.into(), FieldPatch::Delete);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &FieldPatch)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The `Set` entries as a JSON object, for wire encoding.
    pub fn set_fields(&self) -> Value {
        let map: serde_json::Map<String, Value> = self
            .entries
            .iter()
            .filter_map(|(k, v)| match v {
                FieldPatch::Set(value) => Some((k.clone(), value.clone())),
                FieldPatch::Delete => None,
            })
            .collect();
        Value::Object(map)
    }

    /// Names of the `Delete` entries, for wire encoding.
    pub fn deleted_fields(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter_map(|(k, v)| match v {
                FieldPatch::Delete => Some(k.clone()),
                FieldPatch::Set(_) => None,
            })
            .collect()
    }
}

/// Per-record create/read/update/delete with simple filtered queries.
#[allow(async_fn_in_trait)]
pub trait DocumentStore {
    /// Create a document and return its backend-assigned id.
    async fn create(&self, collection: &str, fields: Value) -> Result<String>;

    /// Run a bounded query and return the matching documents.
    async fn query(&self, query: &Query) -> Result<Vec<Document>>;

    /// Apply a partial field merge to one document.
    async fn update(&self, collection: &str, id: &str, patch: &UpdatePatch) -> Result<()>;

    /// Delete one document by id.
    async fn delete(&self, collection: &str, id: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn query_builder_collects_clauses() {
        let q = Query::collection("tweets")
            .where_eq("userId", "u1")
            .order_by("createdAt", Direction::Desc)
            .limit(25);
        assert_eq!(q.filter, Some(("userId".into(), json!("u1"))));
        assert_eq!(q.order_by, Some(("createdAt".into(), Direction::Desc)));
        assert_eq!(q.limit, Some(25));
    }

    #[test]
    fn patch_splits_sets_and_deletes() {
        let patch = UpdatePatch::new()
            .set("tweet", "world")
            .delete_field("photo");
        assert_eq!(patch.set_fields(), json!({ "tweet": "world" }));
        assert_eq!(patch.deleted_fields(), vec!["photo".to_string()]);
        assert!(!patch.is_empty());
    }

    #[test]
    fn document_parses_into_typed_model() {
        use owitter_shared::TweetFields;

        let doc = Document {
            id: "t1".into(),
            fields: json!({
                "tweet": "hello",
                "userId": "u1",
                "username": "ada",
                "createdAt": 1_700_000_000_000i64,
            }),
        };
        let fields: TweetFields = doc.parse().unwrap();
        assert_eq!(fields.tweet, "hello");
    }
}
