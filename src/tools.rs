//! Tool protocol façade.
//!
//! This module is the only entry point external callers use. The five
//! built-in operations — register, search, get_content, list, remove — are
//! modeled as [`Tool`] implementations collected in a [`ToolRegistry`] and
//! dispatched through the same handler, whether the caller arrives over the
//! JSON HTTP API, the MCP bridge, or a custom Rust binary.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                ToolRegistry                  │
//! │  ┌──────────────────────────┐ ┌───────────┐  │
//! │  │ Built-in                 │ │ Custom    │  │
//! │  │ register/search/         │ │ (Rust)    │  │
//! │  │ get_content/list/remove  │ │ Tools     │  │
//! │  └──────────────────────────┘ └───────────┘  │
//! └──────────────────┬───────────────────────────┘
//!                    ▼
//!        run_server() → MCP HTTP API
//! ```
//!
//! Every operation returns a success payload or an error, never both; tools
//! report failures with `bail!` and the server boundary classifies them
//! (invalid argument, not found, internal).

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::config::Config;
use crate::models::DocumentSummary;
use crate::search::{search_documents, SearchResponse};
use crate::store::DocumentStore;

// ═══════════════════════════════════════════════════════════════════════
// Tool Trait
// ═══════════════════════════════════════════════════════════════════════

/// A named operation that agents can discover and call.
///
/// Implement this trait to add a custom compiled tool. Tools are registered
/// at server startup and exposed via `GET /tools/list` for discovery and
/// `POST /tools/{name}` (or the MCP bridge) for invocation.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use anyhow::Result;
/// use serde_json::{json, Value};
/// use corpus_harness::tools::{Tool, ToolContext};
///
/// pub struct CountTool;
///
/// #[async_trait]
/// impl Tool for CountTool {
///     fn name(&self) -> &str { "count_documents" }
///     fn description(&self) -> &str { "Count registered documents" }
///
///     fn parameters_schema(&self) -> Value {
///         json!({ "type": "object", "properties": {} })
///     }
///
///     async fn execute(&self, _params: Value, ctx: &ToolContext) -> Result<Value> {
///         Ok(json!({ "totalDocuments": ctx.store().len() }))
///     }
/// }
/// ```
#[async_trait]
pub trait Tool: Send + Sync {
    /// Returns the tool's name.
    ///
    /// Used as the route path (`POST /tools/{name}`) and in
    /// `GET /tools/list` responses. Should be a lowercase identifier
    /// with underscores (e.g., `"get_content"`).
    fn name(&self) -> &str;

    /// Returns a one-line description for agent discovery.
    fn description(&self) -> &str;

    /// Whether this tool is a built-in. Defaults to `false`.
    fn is_builtin(&self) -> bool {
        false
    }

    /// Returns the OpenAI function-calling JSON Schema for parameters.
    fn parameters_schema(&self) -> Value;

    /// Execute the tool.
    ///
    /// # Arguments
    ///
    /// * `params` — JSON parameters (always a JSON object).
    /// * `ctx` — Bridge to the document store and configuration.
    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<Value>;
}

// ═══════════════════════════════════════════════════════════════════════
// ToolContext
// ═══════════════════════════════════════════════════════════════════════

/// Context bridge for tool execution.
///
/// Carries the store handle and configuration into each invocation. All
/// built-in tools and custom extensions go through the same context, so
/// they have identical capabilities.
pub struct ToolContext {
    config: Arc<Config>,
    store: Arc<DocumentStore>,
}

impl ToolContext {
    pub fn new(config: Arc<Config>, store: Arc<DocumentStore>) -> Self {
        Self { config, store }
    }

    /// The document store this invocation operates on.
    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// The application configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Search the store, with configured defaults for absent limits.
    ///
    /// Equivalent to `POST /tools/search`.
    pub fn search(
        &self,
        query: &str,
        max_results: Option<i64>,
        context_length: Option<i64>,
    ) -> Result<SearchResponse> {
        search_documents(
            &self.store,
            query,
            max_results,
            context_length,
            &self.config.search,
        )
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Built-in Tool Implementations
// ═══════════════════════════════════════════════════════════════════════

/// Read an optional non-negative integer parameter, defaulting to 0.
fn non_negative_u64(params: &Value, key: &str) -> Result<u64> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(0),
        Some(v) => v
            .as_u64()
            .ok_or_else(|| anyhow!("invalid {}: must be a non-negative integer", key)),
    }
}

/// Read a required non-empty string parameter.
fn required_str<'a>(params: &'a Value, key: &str) -> Result<&'a str> {
    match params.get(key).and_then(|v| v.as_str()) {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => bail!("{} must not be empty", key),
    }
}

/// Built-in registration tool. Stores already-extracted document text.
pub struct RegisterTool;

#[async_trait]
impl Tool for RegisterTool {
    fn name(&self) -> &str {
        "register"
    }

    fn description(&self) -> &str {
        "Register extracted document text for searching"
    }

    fn is_builtin(&self) -> bool {
        true
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "filePath": { "type": "string", "description": "Origin path of the source document" },
                "content": { "type": "string", "description": "Full extracted text" },
                "pageCount": { "type": "integer", "description": "Pages in the original source (0 if unknown)", "default": 0 },
                "sizeBytes": { "type": "integer", "description": "Byte size of the original source", "default": 0 },
                "info": { "type": "object", "description": "Opaque metadata carried through uninterpreted" }
            },
            "required": ["filePath", "content"]
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<Value> {
        let file_path = required_str(&params, "filePath")?;
        let content = match params.get("content").and_then(|v| v.as_str()) {
            Some(c) => c,
            None => bail!("invalid content: must be a string"),
        };
        let pages = non_negative_u64(&params, "pageCount")?;
        let size_bytes = non_negative_u64(&params, "sizeBytes")?;
        let info = params.get("info").cloned().unwrap_or(Value::Null);

        let doc = ctx
            .store
            .register(file_path, content.to_string(), pages, size_bytes, info);

        Ok(json!({
            "docId": doc.id,
            "filename": doc.filename,
            "pages": doc.pages,
            "contentLength": doc.content_chars,
        }))
    }
}

/// Built-in search tool. Delegates to [`ToolContext::search`].
pub struct SearchTool;

#[async_trait]
impl Tool for SearchTool {
    fn name(&self) -> &str {
        "search"
    }

    fn description(&self) -> &str {
        "Search registered documents for a substring"
    }

    fn is_builtin(&self) -> bool {
        true
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": { "type": "string", "description": "Text to find (matched case-insensitively, literal)" },
                "maxResults": { "type": "integer", "description": "Cap on matching documents and on matches per document", "default": 10 },
                "contextLength": { "type": "integer", "description": "Context characters on each side of a match", "default": 200 }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<Value> {
        let query = params["query"].as_str().unwrap_or("");
        let max_results = params.get("maxResults").and_then(|v| v.as_i64());
        let context_length = params.get("contextLength").and_then(|v| v.as_i64());

        let response = ctx.search(query, max_results, context_length)?;
        Ok(serde_json::to_value(&response)?)
    }
}

/// Built-in content retrieval tool. Returns a character-offset slice.
pub struct GetContentTool;

#[async_trait]
impl Tool for GetContentTool {
    fn name(&self) -> &str {
        "get_content"
    }

    fn description(&self) -> &str {
        "Retrieve document text by id, optionally sliced by character range"
    }

    fn is_builtin(&self) -> bool {
        true
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "docId": { "type": "string", "description": "Document id" },
                "startChar": { "type": "integer", "description": "Zero-based character offset to start from", "default": 0 },
                "length": { "type": "integer", "description": "Characters to return (omit for the rest of the document)" }
            },
            "required": ["docId"]
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<Value> {
        let doc_id = required_str(&params, "docId")?;
        let start_char = match params.get("startChar") {
            None | Some(Value::Null) => 0,
            Some(v) => v
                .as_u64()
                .ok_or_else(|| anyhow!("invalid startChar: must be a non-negative integer"))?
                as usize,
        };
        let length = match params.get("length") {
            None | Some(Value::Null) => None,
            Some(v) => Some(
                v.as_u64()
                    .ok_or_else(|| anyhow!("invalid length: must be a non-negative integer"))?
                    as usize,
            ),
        };

        let doc = ctx
            .store
            .get(doc_id)
            .ok_or_else(|| anyhow!("document not found: {}", doc_id))?;

        // An out-of-range startChar yields an empty slice, not an error.
        let chars = doc.content.chars().skip(start_char);
        let content: String = match length {
            Some(n) => chars.take(n).collect(),
            None => chars.collect(),
        };

        Ok(json!({
            "docId": doc.id,
            "filename": doc.filename,
            "startChar": start_char,
            "contentLength": doc.content_chars,
            "content": content,
        }))
    }
}

/// Built-in listing tool.
pub struct ListTool;

#[async_trait]
impl Tool for ListTool {
    fn name(&self) -> &str {
        "list"
    }

    fn description(&self) -> &str {
        "List all registered documents"
    }

    fn is_builtin(&self) -> bool {
        true
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _params: Value, ctx: &ToolContext) -> Result<Value> {
        let documents: Vec<DocumentSummary> = ctx
            .store
            .list()
            .iter()
            .map(|doc| DocumentSummary::from_document(doc))
            .collect();

        Ok(json!({
            "totalDocuments": documents.len(),
            "documents": documents,
        }))
    }
}

/// Built-in removal tool.
pub struct RemoveTool;

#[async_trait]
impl Tool for RemoveTool {
    fn name(&self) -> &str {
        "remove"
    }

    fn description(&self) -> &str {
        "Remove a registered document by id"
    }

    fn is_builtin(&self) -> bool {
        true
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "docId": { "type": "string", "description": "Document id" }
            },
            "required": ["docId"]
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<Value> {
        let doc_id = required_str(&params, "docId")?;

        if !ctx.store.remove(doc_id) {
            bail!("document not found: {}", doc_id);
        }

        Ok(json!({
            "message": format!("document removed: {}", doc_id),
            "docId": doc_id,
        }))
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Registry
// ═══════════════════════════════════════════════════════════════════════

/// Registry for tools (built-in and custom Rust).
///
/// Use [`ToolRegistry::with_builtins`] to create a registry pre-loaded with
/// the five core operations, then optionally call
/// [`register`](ToolRegistry::register) to add custom ones.
///
/// # Example
///
/// ```rust
/// use corpus_harness::tools::ToolRegistry;
///
/// let mut tools = ToolRegistry::with_builtins();
/// // tools.register(Box::new(MyTool::new()));
/// ```
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    /// Create an empty tool registry.
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Create a registry pre-loaded with the built-in tools
    /// (register, search, get_content, list, remove).
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(RegisterTool));
        registry.register(Box::new(SearchTool));
        registry.register(Box::new(GetContentTool));
        registry.register(Box::new(ListTool));
        registry.register(Box::new(RemoveTool));
        registry
    }

    /// Register a tool.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.push(tool);
    }

    /// Get all registered tools.
    pub fn tools(&self) -> &[Box<dyn Tool>] {
        &self.tools
    }

    /// Find a tool by name.
    pub fn find(&self, name: &str) -> Option<&dyn Tool> {
        self.tools
            .iter()
            .find(|t| t.name() == name)
            .map(|t| t.as_ref())
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Return the count of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
