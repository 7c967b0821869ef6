//! Azure DevOps MCP Handler
//!
//! Implements the MCP ServerHandler trait over the tool registry built at
//! startup. The registry is immutable once serving begins.

use anyhow::Result;
use rmcp::{
    model::*,
    service::{NotificationContext, RequestContext},
    ErrorData as McpError, RoleServer, ServerHandler,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

use azdo_core::{branding, UserAgent};

use crate::tools::ToolRegistry;

#[derive(Clone)]
pub struct AzdoMcpHandler {
    registry: Arc<ToolRegistry>,
    user_agent: Arc<UserAgent>,
}

impl AzdoMcpHandler {
    pub fn new(registry: Arc<ToolRegistry>, user_agent: Arc<UserAgent>) -> Self {
        Self {
            registry,
            user_agent,
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn user_agent(&self) -> &UserAgent {
        &self.user_agent
    }

    /// Record the connecting client in the outbound user agent
    fn note_client(&self, info: &Implementation) {
        self.user_agent.append_client(&info.name, &info.version);
        info!(
            client = %info.name,
            version = %info.version,
            user_agent = %self.user_agent.get(),
            "[MCP] Client identified"
        );
    }
}

impl ServerHandler for AzdoMcpHandler {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder()
                .enable_tools_with(ToolsCapability {
                    list_changed: Some(false),
                })
                .build(),
            server_info: Implementation {
                name: branding::SERVER_NAME.to_string(),
                version: branding::version().to_string(),
                ..Default::default()
            },
            instructions: Some(
                "Tools for an Azure DevOps organization: projects, work items, \
                 repositories, pipelines, wikis, test plans, search and security alerts. \
                 Only the domains enabled at startup are exposed."
                    .to_string(),
            ),
        }
    }

    async fn on_initialized(&self, context: NotificationContext<RoleServer>) {
        match context.peer.peer_info() {
            Some(peer) => self.note_client(&peer.client_info),
            None => warn!("[MCP] Initialized without client info"),
        }
    }

    async fn list_tools(
        &self,
        _params: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        let tools = self.registry.tools();

        debug!(count = tools.len(), "[MCP] list_tools");
        Ok(ListToolsResult::with_all_items(tools))
    }

    async fn call_tool(
        &self,
        params: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let Some(registered) = self.registry.get(&params.name) else {
            warn!(tool = %params.name, "[MCP] Unknown tool requested");
            return Err(McpError::invalid_params(
                format!("Unknown tool: {}", params.name),
                None,
            ));
        };

        info!(tool = %params.name, domain = %registered.domain, "call_tool");
        Ok(registered.call(params.arguments.unwrap_or_default()).await)
    }
}
