//! Core data models for the document store and search engine.
//!
//! A [`Document`] is a registered unit of searchable text plus metadata. It is
//! immutable after registration: re-registering the same file produces a new
//! `Document` with a fresh id, never an update.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use std::path::Path;

/// A registered document held in the store.
#[derive(Debug, Clone)]
pub struct Document {
    /// Opaque identifier, unique for the lifetime of the process.
    pub id: String,
    /// Origin path, kept for display and debugging only.
    pub file_path: String,
    /// Basename derived from `file_path`.
    pub filename: String,
    /// Full extracted text.
    pub content: String,
    /// Character count of `content`, computed once at registration.
    pub content_chars: usize,
    /// Page count of the original source (0 if unknown).
    pub pages: u64,
    /// Byte size of the original source.
    pub size_bytes: u64,
    /// Registration time.
    pub created_at: DateTime<Utc>,
    /// Opaque caller-supplied metadata, carried through uninterpreted.
    pub info: Value,
}

impl Document {
    /// Metadata object copied into search results.
    pub fn metadata_value(&self) -> Value {
        json!({
            "pages": self.pages,
            "sizeBytes": self.size_bytes,
            "createdAt": format_ts_iso(&self.created_at),
            "info": self.info,
        })
    }
}

/// Lightweight document listing entry, matching the `list` response shape.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    pub doc_id: String,
    pub filename: String,
    pub pages: u64,
    pub content_length: usize,
    /// Registration time (ISO 8601).
    pub created_at: String,
    pub file_path: String,
}

impl DocumentSummary {
    pub fn from_document(doc: &Document) -> Self {
        Self {
            doc_id: doc.id.clone(),
            filename: doc.filename.clone(),
            pages: doc.pages,
            content_length: doc.content_chars,
            created_at: format_ts_iso(&doc.created_at),
            file_path: doc.file_path.clone(),
        }
    }
}

/// Derive a display basename from an origin path.
///
/// Falls back to the full path when it has no final component
/// (e.g. a bare drive root).
pub fn basename(file_path: &str) -> String {
    Path::new(file_path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_path.to_string())
}

/// Format a timestamp as ISO 8601.
pub fn format_ts_iso(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
