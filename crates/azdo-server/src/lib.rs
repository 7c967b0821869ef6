//! Azure DevOps MCP Server
//!
//! MCP server over stdio that provides:
//! - Domain-gated tool registration (only enabled domains are exposed)
//! - Pluggable authentication (PAT, environment token, Azure CLI)
//! - One lazily built, shared backend session per process
//! - A user agent carrying the connected client's identity

pub mod auth;
pub mod client;
pub mod logging;
pub mod mcp;
pub mod server;
pub mod tools;

pub use auth::{
    create_authenticator, create_authenticator_with_env, AuthOptions, EnvSource, MapEnv,
    ProcessEnv, SharedTokenProvider, TokenProvider,
};
pub use client::{ApiArea, BackendError, ClientConfig, DevOpsClient, SessionClientFactory};
pub use mcp::AzdoMcpHandler;
pub use server::{AzdoServer, ServerConfig};
pub use tools::{register_all, ToolDeps, ToolRegistry, CATALOG};
