//! MCP JSON-RPC protocol bridge.
//!
//! Adapts the [`ToolRegistry`] into a proper MCP Streamable HTTP endpoint
//! that Cursor and other MCP clients can connect to using the standard
//! JSON-RPC protocol. All five built-in operations and any custom Rust
//! tools are exposed as MCP tools via `list_tools` / `call_tool`.

use std::borrow::Cow;
use std::sync::Arc;

use rmcp::model::*;
use rmcp::{ErrorData as McpError, ServerHandler};

use crate::config::Config;
use crate::store::DocumentStore;
use crate::tools::{ToolContext, ToolRegistry};

/// Bridges the tool registry to the MCP JSON-RPC protocol.
///
/// Each MCP session receives a clone of this struct (everything is behind
/// `Arc`), so all sessions share the same tool set and the same store.
#[derive(Clone)]
pub struct McpBridge {
    config: Arc<Config>,
    store: Arc<DocumentStore>,
    tools: Arc<ToolRegistry>,
    extra_tools: Arc<ToolRegistry>,
}

impl McpBridge {
    pub fn new(
        config: Arc<Config>,
        store: Arc<DocumentStore>,
        tools: Arc<ToolRegistry>,
        extra_tools: Arc<ToolRegistry>,
    ) -> Self {
        Self {
            config,
            store,
            tools,
            extra_tools,
        }
    }

    fn find_tool(&self, name: &str) -> Option<&dyn crate::tools::Tool> {
        self.tools
            .find(name)
            .or_else(|| self.extra_tools.find(name))
    }

    /// Convert a registered tool into an rmcp `Tool` descriptor.
    fn to_mcp_tool(tool: &dyn crate::tools::Tool) -> Tool {
        let schema_value = tool.parameters_schema();
        let input_schema: Arc<serde_json::Map<String, serde_json::Value>> = match schema_value {
            serde_json::Value::Object(map) => Arc::new(map),
            _ => Arc::new(serde_json::Map::new()),
        };

        Tool {
            name: Cow::Owned(tool.name().to_string()),
            title: None,
            description: Some(Cow::Owned(tool.description().to_string())),
            input_schema,
            output_schema: None,
            annotations: None,
            execution: None,
            icons: None,
            meta: None,
        }
    }
}

impl ServerHandler for McpBridge {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "corpus-harness".to_string(),
                title: Some("Corpus Harness".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                description: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Corpus Harness — an in-memory document ingestion and full-text search \
                 service for AI tools. Use register to store extracted document text, \
                 search to find substring matches with highlighted context, get_content \
                 to read a document slice by character range, list to enumerate \
                 registered documents, and remove to delete one."
                    .to_string(),
            ),
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        let mut tools: Vec<Tool> = self
            .tools
            .tools()
            .iter()
            .map(|t| Self::to_mcp_tool(t.as_ref()))
            .collect();
        for t in self.extra_tools.tools() {
            tools.push(Self::to_mcp_tool(t.as_ref()));
        }
        std::future::ready(Ok(ListToolsResult::with_all_items(tools)))
    }

    fn get_tool(&self, name: &str) -> Option<Tool> {
        self.find_tool(name).map(Self::to_mcp_tool)
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let tool = self.find_tool(&request.name).ok_or_else(|| {
            McpError::new(
                ErrorCode::METHOD_NOT_FOUND,
                format!("no tool registered with name: {}", request.name),
                None,
            )
        })?;

        let params = request
            .arguments
            .map(serde_json::Value::Object)
            .unwrap_or(serde_json::Value::Object(serde_json::Map::new()));

        let ctx = ToolContext::new(self.config.clone(), self.store.clone());
        match tool.execute(params, &ctx).await {
            Ok(result) => {
                let text = serde_json::to_string_pretty(&result).unwrap_or_default();
                Ok(CallToolResult::success(vec![Content::text(text)]))
            }
            Err(e) => Ok(CallToolResult::error(vec![Content::text(e.to_string())])),
        }
    }
}
