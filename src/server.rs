//! MCP-compatible HTTP server.
//!
//! Exposes the document store and search engine via a JSON HTTP API suitable
//! for integration with Cursor, Claude, and other MCP-compatible AI tools.
//!
//! All tools — built-in (register, search, get_content, list, remove) and
//! custom Rust trait implementations — are registered in a unified
//! [`ToolRegistry`] and dispatched through the same `POST /tools/{name}`
//! handler. The same registry is also served over the MCP Streamable HTTP
//! protocol at `/mcp` (see [`crate::mcp`]).
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/tools/list` | List all registered tools with schemas |
//! | `POST` | `/tools/{name}` | Call any registered tool by name |
//! | `GET`  | `/health` | Health check (returns version) |
//! | `*`    | `/mcp` | MCP Streamable HTTP endpoint |
//!
//! # Error Contract
//!
//! All error responses use a tagged body:
//!
//! ```json
//! { "error": { "code": "invalid_argument", "message": "query must not be empty" } }
//! ```
//!
//! Error codes: `invalid_argument` (400), `not_found` (404), `internal` (500).
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted to support browser-based
//! clients and cross-origin MCP tool calls.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use rmcp::transport::streamable_http_server::{
    session::local::LocalSessionManager, StreamableHttpService,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::mcp::McpBridge;
use crate::store::DocumentStore;
use crate::tools::{ToolContext, ToolRegistry};

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
struct AppState {
    /// Application configuration (wrapped in `Arc` for cheap cloning across handlers).
    config: Arc<Config>,
    /// The document store every tool invocation operates on.
    store: Arc<DocumentStore>,
    /// Unified tool registry containing built-in and custom Rust tools.
    tools: Arc<ToolRegistry>,
}

/// Starts the MCP-compatible HTTP server with a fresh, empty store.
///
/// Binds to the address configured in `[server].bind` and registers all
/// route handlers. The server runs indefinitely until the process is
/// terminated; the store lives exactly as long as the process.
///
/// This is the standard entry point used by the `cor serve mcp` command.
/// For custom binaries with Rust tool extensions or a pre-populated store,
/// use [`run_server_with_extensions`] instead.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    run_server_with_extensions(
        config,
        Arc::new(DocumentStore::new()),
        Arc::new(ToolRegistry::new()),
    )
    .await
}

/// Starts the MCP server over a caller-owned store, with custom Rust tools.
///
/// Like [`run_server`], but the caller constructs the [`DocumentStore`] —
/// the store is never ambient state, so host applications and tests
/// can run multiple independent instances — and may supply a
/// [`ToolRegistry`] of custom tools served alongside the built-ins.
///
/// # Example
///
/// ```rust,no_run
/// use corpus_harness::config::Config;
/// use corpus_harness::server::run_server_with_extensions;
/// use corpus_harness::store::DocumentStore;
/// use corpus_harness::tools::ToolRegistry;
/// use std::sync::Arc;
///
/// # async fn example(config: &Config) -> anyhow::Result<()> {
/// let store = Arc::new(DocumentStore::new());
/// let mut tools = ToolRegistry::new();
/// // tools.register(Box::new(MyTool::new()));
/// run_server_with_extensions(config, store, Arc::new(tools)).await?;
/// # Ok(())
/// # }
/// ```
pub async fn run_server_with_extensions(
    config: &Config,
    store: Arc<DocumentStore>,
    extra_tools: Arc<ToolRegistry>,
) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let config = Arc::new(config.clone());

    let registry = Arc::new(ToolRegistry::with_builtins());

    let tool_count = registry.len() + extra_tools.len();
    println!("Registered {} tools:", tool_count);
    for t in registry.tools() {
        println!("  POST /tools/{} — {} (builtin)", t.name(), t.description());
    }
    for t in extra_tools.tools() {
        println!("  POST /tools/{} — {} (rust)", t.name(), t.description());
    }

    let state = AppState {
        config: config.clone(),
        store: store.clone(),
        tools: registry.clone(),
    };

    let bridge = McpBridge::new(config, store, registry, extra_tools.clone());
    let mcp_service = StreamableHttpService::new(
        move || Ok(bridge.clone()),
        LocalSessionManager::default().into(),
        Default::default(),
    );

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // `list` is both the discovery endpoint (GET) and a built-in tool
    // (POST); the static path must carry both methods, because it shadows
    // `/tools/{name}` for every method.
    let app = Router::new()
        .route("/tools/list", get(handle_list_tools).post(handle_list_call))
        .route("/tools/{name}", post(handle_tool_call))
        .route("/health", get(handle_health))
        .nest_service("/mcp", mcp_service)
        .layer(cors)
        .with_state((state, extra_tools));

    println!("MCP server listening on http://{}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

/// Inner error detail with a machine-readable code and human-readable message.
#[derive(Serialize)]
struct ErrorDetail {
    /// Machine-readable error code (e.g., `"invalid_argument"`, `"not_found"`).
    code: String,
    /// Human-readable error message.
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

/// Constructs a 400 Invalid Argument error.
fn invalid_argument(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "invalid_argument".to_string(),
        message: message.into(),
    }
}

/// Constructs a 404 Not Found error.
fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found".to_string(),
        message: message.into(),
    }
}

/// Constructs a 500 error for unexpected tool execution failures.
fn internal_error(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "internal".to_string(),
        message: message.into(),
    }
}

/// Inspects tool execution errors and maps them to the most appropriate
/// HTTP status code. This allows built-in tools to signal client errors
/// (e.g. empty query → 400, document not found → 404) without needing
/// a custom error type in the `Tool` trait.
fn classify_tool_error(tool_name: &str, err: anyhow::Error) -> AppError {
    let msg = err.to_string();

    if msg.contains("not found") {
        not_found(format!("{}: {}", tool_name, msg))
    } else if msg.contains("must not be empty") || msg.contains("invalid") {
        invalid_argument(format!("{}: {}", tool_name, msg))
    } else {
        internal_error(format!("{}: {}", tool_name, msg))
    }
}

// ============ GET /health ============

/// JSON response body for `GET /health`.
#[derive(Serialize)]
struct HealthResponse {
    /// Always `"ok"` when the server is running.
    status: String,
    /// The crate version from `Cargo.toml`.
    version: String,
}

/// Handler for `GET /health`.
async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET /tools/list ============

/// Descriptor for one registered tool in the `GET /tools/list` response.
#[derive(Serialize)]
struct ToolInfo {
    name: String,
    description: String,
    builtin: bool,
    parameters: serde_json::Value,
}

/// JSON response body for `GET /tools/list`.
#[derive(Serialize)]
struct ToolListResponse {
    /// All registered tools.
    tools: Vec<ToolInfo>,
}

/// Handler for `GET /tools/list`.
///
/// Returns all registered tools with their OpenAI function-calling parameter
/// schemas. Built-in tools have `builtin: true`; custom Rust tools have
/// `builtin: false`.
async fn handle_list_tools(
    State((state, extras)): State<(AppState, Arc<ToolRegistry>)>,
) -> Json<ToolListResponse> {
    let mut tools: Vec<ToolInfo> = state
        .tools
        .tools()
        .iter()
        .map(|t| ToolInfo {
            name: t.name().to_string(),
            description: t.description().to_string(),
            builtin: t.is_builtin(),
            parameters: t.parameters_schema(),
        })
        .collect();

    for t in extras.tools() {
        tools.push(ToolInfo {
            name: t.name().to_string(),
            description: t.description().to_string(),
            builtin: false,
            parameters: t.parameters_schema(),
        });
    }

    Json(ToolListResponse { tools })
}

// ============ POST /tools/{name} ============

/// Handler for `POST /tools/{name}`.
///
/// Unified tool dispatch. Looks up the tool by name in the registry
/// (checking the main registry first, then extras) and executes it.
///
/// Returns `404` if the tool is not found, `400` for argument validation
/// errors, and `500` for unexpected execution errors.
async fn handle_tool_call(
    State((state, extras)): State<(AppState, Arc<ToolRegistry>)>,
    Path(name): Path<String>,
    Json(params): Json<serde_json::Value>,
) -> Result<Json<serde_json::Value>, AppError> {
    dispatch_tool(&state, &extras, &name, params).await
}

/// Handler for `POST /tools/list` — the built-in `list` tool, reachable
/// despite the static discovery route on the same path.
async fn handle_list_call(
    State((state, extras)): State<(AppState, Arc<ToolRegistry>)>,
    Json(params): Json<serde_json::Value>,
) -> Result<Json<serde_json::Value>, AppError> {
    dispatch_tool(&state, &extras, "list", params).await
}

/// Shared dispatch: look up the tool, execute it, classify failures.
async fn dispatch_tool(
    state: &AppState,
    extras: &ToolRegistry,
    name: &str,
    params: serde_json::Value,
) -> Result<Json<serde_json::Value>, AppError> {
    let tool = state
        .tools
        .find(name)
        .or_else(|| extras.find(name))
        .ok_or_else(|| not_found(format!("no tool registered with name: {}", name)))?;

    let ctx = ToolContext::new(state.config.clone(), state.store.clone());
    let result = tool
        .execute(params, &ctx)
        .await
        .map_err(|e| classify_tool_error(name, e))?;

    Ok(Json(serde_json::json!({ "result": result })))
}
