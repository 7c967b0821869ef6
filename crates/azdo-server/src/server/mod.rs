//! Server bootstrap
//!
//! Wires the startup configuration into a ready handler: domain selection,
//! authenticator, user agent, lazy session client and the tool registry.
//! Nothing here touches the network; the first backend request happens on
//! the first tool call.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use anyhow::{Context, Result};
use azdo_core::{resolve_domains, UserAgent};
use rmcp::ServiceExt;
use tracing::info;

use crate::auth::{create_authenticator_with_env, EnvSource, ProcessEnv};
use crate::client::SessionClientFactory;
use crate::mcp::AzdoMcpHandler;
use crate::tools::{register_all, ToolDeps, ToolRegistry};

/// Azure DevOps MCP server, fully wired
pub struct AzdoServer {
    config: ServerConfig,
    handler: AzdoMcpHandler,
}

impl AzdoServer {
    /// Build the server reading credentials from the process environment
    pub fn new(config: ServerConfig) -> Result<Self> {
        Self::with_env(config, Arc::new(ProcessEnv))
    }

    /// Build the server with an explicit environment source
    ///
    /// Fails on an unknown domain, an unsupported authentication type or a
    /// duplicate tool name.
    pub fn with_env(config: ServerConfig, env: Arc<dyn EnvSource>) -> Result<Self> {
        let domains = resolve_domains(&config.domains).context("Invalid --domains")?;

        let tokens = create_authenticator_with_env(&config.auth_type, config.auth_options(), env)
            .context("Invalid --authentication")?;

        let user_agent = Arc::new(UserAgent::new());
        let clients = Arc::new(SessionClientFactory::new(
            config.client_config(),
            tokens.clone(),
            user_agent.clone(),
        ));

        let deps = ToolDeps {
            tokens,
            clients,
            user_agent: user_agent.clone(),
        };

        let mut registry = ToolRegistry::new();
        let count = register_all(&mut registry, &deps, &domains)?;

        info!(
            organization = %config.organization,
            auth_type = %config.auth_type,
            domains = ?domains,
            tools = count,
            "[Server] Initialized"
        );

        Ok(Self {
            handler: AzdoMcpHandler::new(Arc::new(registry), user_agent),
            config,
        })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn handler(&self) -> &AzdoMcpHandler {
        &self.handler
    }

    /// Serve MCP over stdin/stdout until the client disconnects
    pub async fn serve_stdio(self) -> Result<()> {
        info!(organization = %self.config.organization, "[Server] Serving on stdio");

        let service = self
            .handler
            .serve(rmcp::transport::stdio())
            .await
            .context("Failed to start MCP session")?;

        let reason = service.waiting().await?;
        info!(reason = ?reason, "[Server] Session closed");
        Ok(())
    }
}
