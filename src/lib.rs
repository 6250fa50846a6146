//! # Corpus Harness
//!
//! **An in-memory document ingestion and full-text search service for AI tools.**
//!
//! Corpus Harness accepts already-extracted document text (PDF parsing and
//! other source extraction happen in the calling application), stores it in
//! a volatile in-memory index, and answers substring search queries with
//! match positions, bounded context, and highlighted previews — exposed to
//! LLM orchestration layers through a fixed tool protocol over an
//! MCP-compatible HTTP server.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐   ┌───────────────┐   ┌───────────┐
//! │  Extractor  │──▶│ DocumentStore │◀──│  Search   │
//! │  (caller)   │   │  (in-memory)  │   │  Engine   │
//! └────────────┘   └───────┬───────┘   └─────┬─────┘
//!                          │                 │
//!                      ┌───┴─────────────────┴───┐
//!                      │      ToolRegistry       │
//!                      │ register/search/        │
//!                      │ get_content/list/remove │
//!                      └───────────┬─────────────┘
//!                                  ▼
//!                       ┌──────────────────┐
//!                       │  HTTP (MCP/JSON)  │
//!                       └──────────────────┘
//! ```
//!
//! ## Data Flow
//!
//! 1. A caller extracts text from a source document and invokes the
//!    **register** tool with the text and basic metadata.
//! 2. The [`store::DocumentStore`] assigns a process-unique id ([`id`]) and
//!    keeps the document until it is removed or the process exits.
//! 3. The **search** tool runs the scan engine ([`search`]): a
//!    case-insensitive literal substring scan producing match positions,
//!    trimmed context windows, and `**…**`-highlighted previews, capped by
//!    `maxResults` per document and across documents.
//! 4. The **get_content**, **list**, and **remove** tools round out the
//!    document lifecycle.
//! 5. All five operations are [`tools::Tool`] implementations in a
//!    [`tools::ToolRegistry`], served by the Axum JSON API ([`server`]) and
//!    the MCP Streamable HTTP bridge ([`mcp`]).
//!
//! ## Quick Start
//!
//! ```bash
//! cor serve mcp                 # start the HTTP server
//! cor tools                     # list the registered tools and schemas
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types: `Document`, `DocumentSummary` |
//! | [`id`] | Process-unique document identifier generation |
//! | [`store`] | In-memory document store (create, read, list, delete) |
//! | [`search`] | Case-insensitive substring scan with context snippets |
//! | [`tools`] | Tool protocol façade: `Tool` trait, `ToolContext`, registry |
//! | [`server`] | MCP-compatible HTTP server (Axum) with CORS |
//! | [`mcp`] | MCP Streamable HTTP bridge (rmcp) |

pub mod config;
pub mod id;
pub mod mcp;
pub mod models;
pub mod search;
pub mod server;
pub mod store;
pub mod tools;

pub use models::Document;
pub use search::{SearchMatch, SearchResponse, SearchResult};
pub use store::DocumentStore;
pub use tools::{
    GetContentTool, ListTool, RegisterTool, RemoveTool, SearchTool, Tool, ToolContext,
    ToolRegistry,
};
