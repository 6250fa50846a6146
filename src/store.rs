//! In-memory document store.
//!
//! Uses a `HashMap` behind `std::sync::RwLock` for thread safety: reads
//! (`get`, `list`, search snapshots) take the shared lock, writes (`register`,
//! `remove`) take the exclusive lock. Each operation touches the collection
//! at a single point, so no cross-operation transactions are needed — a
//! `register` that has returned is visible to every call that starts after it.
//!
//! The store is volatile: documents live until removed or process teardown.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::Utc;
use serde_json::Value;

use crate::id::generate_doc_id;
use crate::models::{basename, Document};

/// Exclusive owner of the registered document collection.
///
/// Constructed once at startup and passed by `Arc` handle to the façade and
/// server — never held in ambient global state, so tests can run multiple
/// independent stores side by side.
pub struct DocumentStore {
    docs: RwLock<HashMap<String, Arc<Document>>>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self {
            docs: RwLock::new(HashMap::new()),
        }
    }

    /// Register extracted text as a new document and return it.
    ///
    /// Never fails: a duplicate `file_path` creates an independent document
    /// with a fresh id, not an update.
    pub fn register(
        &self,
        file_path: &str,
        content: String,
        pages: u64,
        size_bytes: u64,
        info: Value,
    ) -> Arc<Document> {
        let content_chars = content.chars().count();
        let doc = Arc::new(Document {
            id: generate_doc_id(),
            file_path: file_path.to_string(),
            filename: basename(file_path),
            content,
            content_chars,
            pages,
            size_bytes,
            created_at: Utc::now(),
            info,
        });

        let mut docs = self.docs.write().unwrap();
        docs.insert(doc.id.clone(), doc.clone());
        doc
    }

    /// Retrieve a document by id.
    pub fn get(&self, id: &str) -> Option<Arc<Document>> {
        let docs = self.docs.read().unwrap();
        docs.get(id).cloned()
    }

    /// Snapshot all documents, ordered by registration time then id.
    ///
    /// The order carries no meaning to callers; it is fixed only so that
    /// repeated reads against an unchanged store are deterministic.
    pub fn list(&self) -> Vec<Arc<Document>> {
        let docs = self.docs.read().unwrap();
        let mut all: Vec<Arc<Document>> = docs.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        all
    }

    /// Delete a document by id. Returns `false` if the id is unknown
    /// (including ids that were already removed).
    pub fn remove(&self, id: &str) -> bool {
        let mut docs = self.docs.write().unwrap();
        docs.remove(id).is_some()
    }

    /// Number of registered documents.
    pub fn len(&self) -> usize {
        let docs = self.docs.read().unwrap();
        docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_register_assigns_unique_ids_for_identical_inputs() {
        let store = DocumentStore::new();
        let a = store.register("/tmp/report.txt", "same text".to_string(), 1, 9, Value::Null);
        let b = store.register("/tmp/report.txt", "same text".to_string(), 1, 9, Value::Null);
        assert_ne!(a.id, b.id);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_register_derives_filename_and_char_count() {
        let store = DocumentStore::new();
        let doc = store.register("/data/docs/guide.pdf", "héllo".to_string(), 3, 42, Value::Null);
        assert_eq!(doc.filename, "guide.pdf");
        assert_eq!(doc.content_chars, 5);
        assert_eq!(doc.pages, 3);
        assert_eq!(doc.size_bytes, 42);
    }

    #[test]
    fn test_get_returns_registered_document() {
        let store = DocumentStore::new();
        let doc = store.register("a.txt", "alpha".to_string(), 0, 5, json!({"lang": "en"}));
        let fetched = store.get(&doc.id).unwrap();
        assert_eq!(fetched.content, "alpha");
        assert_eq!(fetched.info, json!({"lang": "en"}));
        assert!(store.get("doc_0_missing").is_none());
    }

    #[test]
    fn test_remove_semantics() {
        let store = DocumentStore::new();
        let doc = store.register("a.txt", "alpha".to_string(), 0, 5, Value::Null);
        assert!(store.remove(&doc.id));
        assert!(store.get(&doc.id).is_none());
        // Second removal of the same id reports not-found.
        assert!(!store.remove(&doc.id));
        assert!(store.is_empty());
    }

    #[test]
    fn test_list_is_stable_across_reads() {
        let store = DocumentStore::new();
        for i in 0..5 {
            store.register(&format!("doc{}.txt", i), format!("body {}", i), 0, 0, Value::Null);
        }
        let first: Vec<String> = store.list().iter().map(|d| d.id.clone()).collect();
        let second: Vec<String> = store.list().iter().map(|d| d.id.clone()).collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 5);
    }
}
