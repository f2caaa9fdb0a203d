// Document store protocol
// Every content, catalog and booking operation goes through this trait: simple
// get / query / add / update calls addressed by collection name and document id.

use async_trait::async_trait;
use dashmap::DashMap;
use rand::Rng;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

pub type Document = Map<String, Value>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Document not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Document is not a JSON object: {0}")]
    NotAnObject(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Request timeout after {0}ms")]
    Timeout(u64),
}

impl StoreError {
    pub fn not_found(collection: &str, id: &str) -> Self {
        StoreError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    Desc,
}

// Equality filters plus a single ordering field, the only predicates the
// content pages use.
#[derive(Debug, Clone, Default, PartialEq, Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    pub filters: Vec<(String, Value)>,
    pub order_by: Option<(String, Direction)>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn where_eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filters.push((field.to_string(), value.into()));
        self
    }

    pub fn order_by(mut self, field: &str, direction: Direction) -> Self {
        self.order_by = Some((field.to_string(), direction));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, doc: &Document) -> bool {
        self.filters
            .iter()
            .all(|(field, expected)| doc.get(field) == Some(expected))
    }

    /// Filter, order and truncate an unordered set of documents in place.
    pub fn apply(&self, docs: Vec<Document>) -> Vec<Document> {
        let mut selected: Vec<Document> = docs.into_iter().filter(|d| self.matches(d)).collect();

        if let Some((field, direction)) = &self.order_by {
            selected.sort_by(|a, b| {
                let ord = compare_values(a.get(field), b.get(field));
                match direction {
                    Direction::Asc => ord,
                    Direction::Desc => ord.reverse(),
                }
            });
        }

        if let Some(limit) = self.limit {
            selected.truncate(limit);
        }
        selected
    }
}

// Missing fields sort last in ascending order.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .unwrap_or(0.0)
            .partial_cmp(&y.as_f64().unwrap_or(0.0))
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    // Fetch one document, None when it does not exist
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError>;

    // Insert with a generated id, returning the id
    async fn add(&self, collection: &str, doc: Document) -> Result<String, StoreError>;

    // Overwrite (or create) the whole document
    async fn set(&self, collection: &str, id: &str, doc: Document) -> Result<(), StoreError>;

    // Shallow top-level merge, creating the document when absent
    async fn merge(&self, collection: &str, id: &str, patch: Document) -> Result<(), StoreError>;

    // Shallow top-level merge, NotFound when the document is absent
    async fn update(&self, collection: &str, id: &str, patch: Document) -> Result<(), StoreError>;

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;
}

/// Serialize any record into a store document.
pub fn to_document<T: Serialize>(value: &T) -> Result<Document, StoreError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::NotAnObject(other.to_string())),
    }
}

pub fn from_document<T: DeserializeOwned>(doc: Document) -> Result<T, StoreError> {
    Ok(serde_json::from_value(Value::Object(doc))?)
}

// Typed helpers shared by every service on top of the raw protocol.
pub async fn get_as<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &str,
    id: &str,
) -> Result<Option<T>, StoreError> {
    store
        .get(collection, id)
        .await?
        .map(from_document)
        .transpose()
}

pub async fn query_as<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &str,
    query: &Query,
) -> Result<Vec<T>, StoreError> {
    store
        .query(collection, query)
        .await?
        .into_iter()
        .map(from_document)
        .collect()
}

pub async fn add_as<T: Serialize + Sync>(
    store: &dyn DocumentStore,
    collection: &str,
    value: &T,
) -> Result<String, StoreError> {
    store.add(collection, to_document(value)?).await
}

pub async fn set_as<T: Serialize + Sync>(
    store: &dyn DocumentStore,
    collection: &str,
    id: &str,
    value: &T,
) -> Result<(), StoreError> {
    store.set(collection, id, to_document(value)?).await
}

/// Random base36 id in the style of the hosted store's auto ids.
pub fn generate_id() -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::thread_rng();
    (0..20)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

fn merge_into(target: &mut Document, patch: Document) {
    for (key, value) in patch {
        target.insert(key, value);
    }
}

// In-process store used by tests and local runs
#[derive(Default)]
pub struct MemoryStore {
    collections: DashMap<String, HashMap<String, Document>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, collection: &str) -> usize {
        self.collections
            .get(collection)
            .map_or(0, |docs| docs.len())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        Ok(self
            .collections
            .get(collection)
            .and_then(|docs| docs.get(id).cloned()))
    }

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError> {
        let docs: Vec<Document> = self
            .collections
            .get(collection)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default();
        Ok(query.apply(docs))
    }

    async fn add(&self, collection: &str, mut doc: Document) -> Result<String, StoreError> {
        let id = generate_id();
        doc.insert("id".to_string(), Value::String(id.clone()));
        self.collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), doc);
        debug!("Added {}/{}", collection, id);
        Ok(id)
    }

    async fn set(&self, collection: &str, id: &str, mut doc: Document) -> Result<(), StoreError> {
        doc.insert("id".to_string(), Value::String(id.to_string()));
        self.collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), doc);
        Ok(())
    }

    async fn merge(&self, collection: &str, id: &str, patch: Document) -> Result<(), StoreError> {
        let mut docs = self.collections.entry(collection.to_string()).or_default();
        let target = docs.entry(id.to_string()).or_insert_with(|| {
            let mut fresh = Document::new();
            fresh.insert("id".to_string(), Value::String(id.to_string()));
            fresh
        });
        merge_into(target, patch);
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, patch: Document) -> Result<(), StoreError> {
        let mut docs = self
            .collections
            .get_mut(collection)
            .ok_or_else(|| StoreError::not_found(collection, id))?;
        let target = docs
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found(collection, id))?;
        merge_into(target, patch);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let removed = self
            .collections
            .get_mut(collection)
            .and_then(|mut docs| docs.remove(id));
        match removed {
            Some(_) => Ok(()),
            None => Err(StoreError::not_found(collection, id)),
        }
    }
}

// Store whose every call fails, for exercising the fallback paths
#[cfg(test)]
pub(crate) struct UnavailableStore;

#[cfg(test)]
#[async_trait]
impl DocumentStore for UnavailableStore {
    async fn get(&self, _: &str, _: &str) -> Result<Option<Document>, StoreError> {
        Err(StoreError::Backend("unavailable".to_string()))
    }
    async fn query(&self, _: &str, _: &Query) -> Result<Vec<Document>, StoreError> {
        Err(StoreError::Backend("unavailable".to_string()))
    }
    async fn add(&self, _: &str, _: Document) -> Result<String, StoreError> {
        Err(StoreError::Backend("unavailable".to_string()))
    }
    async fn set(&self, _: &str, _: &str, _: Document) -> Result<(), StoreError> {
        Err(StoreError::Backend("unavailable".to_string()))
    }
    async fn merge(&self, _: &str, _: &str, _: Document) -> Result<(), StoreError> {
        Err(StoreError::Backend("unavailable".to_string()))
    }
    async fn update(&self, _: &str, _: &str, _: Document) -> Result<(), StoreError> {
        Err(StoreError::Backend("unavailable".to_string()))
    }
    async fn delete(&self, _: &str, _: &str) -> Result<(), StoreError> {
        Err(StoreError::Backend("unavailable".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_add_get_and_delete() {
        let store = MemoryStore::new();
        let id = store
            .add("trainBookings", doc(json!({"status": "pending"})))
            .await
            .unwrap();

        let fetched = store.get("trainBookings", &id).await.unwrap().unwrap();
        assert_eq!(fetched["status"], "pending");
        assert_eq!(fetched["id"], Value::String(id.clone()));

        store.delete("trainBookings", &id).await.unwrap();
        assert!(store.get("trainBookings", &id).await.unwrap().is_none());
        assert!(matches!(
            store.delete("trainBookings", &id).await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_requires_existing_document() {
        let store = MemoryStore::new();
        let result = store
            .update("trainRoutes", "missing", doc(json!({"name": "x"})))
            .await;
        assert!(matches!(result, Err(StoreError::NotFound { .. })));

        store
            .merge("trainRoutes", "kandy-ella", doc(json!({"name": "Kandy to Ella"})))
            .await
            .unwrap();
        store
            .update("trainRoutes", "kandy-ella", doc(json!({"sortOrder": 1})))
            .await
            .unwrap();

        let route = store.get("trainRoutes", "kandy-ella").await.unwrap().unwrap();
        assert_eq!(route["name"], "Kandy to Ella");
        assert_eq!(route["sortOrder"], 1);
    }

    #[tokio::test]
    async fn test_query_filters_orders_and_limits() {
        let store = MemoryStore::new();
        for (name, order, active) in [("c", 3, true), ("a", 1, true), ("b", 2, false), ("d", 4, true)] {
            store
                .add(
                    "heroSlides",
                    doc(json!({"name": name, "order": order, "isActive": active})),
                )
                .await
                .unwrap();
        }

        let query = Query::new()
            .where_eq("isActive", true)
            .order_by("order", Direction::Asc)
            .limit(2);
        let names: Vec<String> = store
            .query("heroSlides", &query)
            .await
            .unwrap()
            .into_iter()
            .map(|d| d["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a", "c"]);

        let desc = Query::new().order_by("order", Direction::Desc);
        let first = store.query("heroSlides", &desc).await.unwrap();
        assert_eq!(first[0]["name"], "d");
    }

    #[test]
    fn test_missing_order_field_sorts_last() {
        let docs = vec![doc(json!({"n": 1})), doc(json!({"x": 0})), doc(json!({"n": 0}))];
        let sorted = Query::new().order_by("n", Direction::Asc).apply(docs);
        assert_eq!(sorted[0]["n"], 0);
        assert_eq!(sorted[1]["n"], 1);
        assert!(sorted[2].get("n").is_none());
    }

    #[test]
    fn test_generated_ids_are_base36() {
        let id = generate_id();
        assert_eq!(id.len(), 20);
        assert!(id.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
        assert_ne!(id, generate_id());
    }
}
