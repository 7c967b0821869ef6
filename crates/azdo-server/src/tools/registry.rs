//! Tool Registry
//!
//! The server-side table of registered tools: name → (domain, declaration,
//! handler). Names are unique across every domain; a collision is a
//! programming error reported at startup.

use std::collections::HashMap;
use std::sync::Arc;

use azdo_core::{Domain, Error, Result};
use futures::future::BoxFuture;
use rmcp::model::{CallToolResult, JsonObject, Tool};
use tracing::debug;

/// Boxed future returned by a tool handler
pub type ToolFuture = BoxFuture<'static, CallToolResult>;

/// Async handler invoked with the call arguments
///
/// Handlers always resolve to a `CallToolResult`; failures are reported with
/// `is_error` set rather than as errors.
pub type ToolHandler = Arc<dyn Fn(JsonObject) -> ToolFuture + Send + Sync>;

/// A tool and the domain that declared it
pub struct RegisteredTool {
    pub domain: Domain,
    pub tool: Tool,
    handler: ToolHandler,
}

impl RegisteredTool {
    pub fn call(&self, arguments: JsonObject) -> ToolFuture {
        (self.handler)(arguments)
    }
}

#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool; fails with `DuplicateTool` if the name is taken
    pub fn register(&mut self, domain: Domain, tool: Tool, handler: ToolHandler) -> Result<()> {
        let name = tool.name.to_string();
        if let Some(&existing) = self.index.get(&name) {
            return Err(Error::DuplicateTool {
                name,
                existing_domain: self.tools[existing].domain.as_str(),
            });
        }

        debug!(tool = %name, domain = %domain, "[Registry] Tool registered");
        self.index.insert(name, self.tools.len());
        self.tools.push(RegisteredTool {
            domain,
            tool,
            handler,
        });
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredTool> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Tool declarations in registration order
    pub fn tools(&self) -> Vec<Tool> {
        self.tools.iter().map(|t| t.tool.clone()).collect()
    }

    pub fn names(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.tool.name.to_string()).collect()
    }

    pub fn count_for(&self, domain: Domain) -> usize {
        self.tools.iter().filter(|t| t.domain == domain).count()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
