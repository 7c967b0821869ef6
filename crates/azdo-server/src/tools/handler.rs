//! Uniform tool handler contract
//!
//! Every backend tool goes through the same wrapper: parse arguments into a
//! typed parameter struct, obtain the shared session client, run one backend
//! operation, and turn the outcome into exactly one `CallToolResult`. Errors
//! and panics become failure payloads; nothing reaches the transport as a
//! fault.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use azdo_core::{Domain, Error, Result, UserAgent};
use futures::FutureExt;
use rmcp::model::{CallToolResult, Content, JsonObject, Tool};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::Instrument;

use super::registry::{ToolHandler, ToolRegistry};
use crate::auth::SharedTokenProvider;
use crate::client::{DevOpsClient, SessionClientFactory};
use crate::logging::{ToolSpan, TraceContext};

/// Capabilities handed to every domain registration routine
///
/// Handlers reach the backend through `clients`; `tokens` and `user_agent`
/// label each call's trace span.
#[derive(Clone)]
pub struct ToolDeps {
    pub tokens: SharedTokenProvider,
    pub clients: Arc<SessionClientFactory>,
    pub user_agent: Arc<UserAgent>,
}

/// Registration helper scoped to one domain
pub struct DomainTools<'a> {
    registry: &'a mut ToolRegistry,
    domain: Domain,
    deps: &'a ToolDeps,
}

impl<'a> DomainTools<'a> {
    pub fn new(registry: &'a mut ToolRegistry, domain: Domain, deps: &'a ToolDeps) -> Self {
        Self {
            registry,
            domain,
            deps,
        }
    }

    /// Declare a tool backed by one session-client operation
    pub fn add<P, F, Fut>(
        &mut self,
        name: &'static str,
        description: &'static str,
        input_schema: Value,
        run: F,
    ) -> Result<()>
    where
        P: DeserializeOwned + Send + 'static,
        F: Fn(Arc<DevOpsClient>, P) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
    {
        let tool = Tool::new(name, description, Arc::new(schema_object(input_schema)));
        let handler = client_handler(name, self.domain, self.deps, run);
        self.registry.register(self.domain, tool, handler)
    }
}

/// Wrap a typed operation into a `ToolHandler`
pub fn client_handler<P, F, Fut>(
    name: &'static str,
    domain: Domain,
    deps: &ToolDeps,
    run: F,
) -> ToolHandler
where
    P: DeserializeOwned + Send + 'static,
    F: Fn(Arc<DevOpsClient>, P) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
{
    let run = Arc::new(run);
    let ToolDeps {
        tokens,
        clients,
        user_agent,
    } = deps.clone();
    Arc::new(move |arguments: JsonObject| {
        let run = run.clone();
        let clients = clients.clone();
        let ctx = TraceContext::new(name, domain, tokens.auth_type(), user_agent.get());
        let span = ToolSpan::span(&ctx);

        async move {
            ToolSpan::log_entry(&ctx);

            let outcome = AssertUnwindSafe(execute(name, arguments, &clients, run.as_ref()))
                .catch_unwind()
                .await
                .unwrap_or_else(|_| {
                    Err(Error::ToolExecution(format!("{} panicked", name)))
                });

            match outcome {
                Ok(value) => {
                    ToolSpan::log_exit(&ctx, None);
                    success_result(&value)
                }
                Err(e) => {
                    let message = e.to_string();
                    ToolSpan::log_exit(&ctx, Some(&message));
                    failure_result(message)
                }
            }
        }
        .instrument(span)
        .boxed()
    })
}

async fn execute<P, F, Fut>(
    name: &str,
    arguments: JsonObject,
    clients: &SessionClientFactory,
    run: &F,
) -> Result<Value>
where
    P: DeserializeOwned,
    F: Fn(Arc<DevOpsClient>, P) -> Fut,
    Fut: Future<Output = anyhow::Result<Value>>,
{
    let params: P = serde_json::from_value(Value::Object(arguments))
        .map_err(|e| Error::ToolExecution(format!("Invalid arguments for {}: {}", name, e)))?;

    let client = clients.client().await?;

    run(client, params)
        .await
        .map_err(|e| Error::ToolExecution(format!("{:#}", e)))
}

/// Successful payload: the backend JSON, pretty-printed
pub fn success_result(value: &Value) -> CallToolResult {
    let text = match value {
        Value::String(s) => s.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    };
    CallToolResult::success(vec![Content::text(text)])
}

/// Failure payload: `is_error` set, human-readable message
pub fn failure_result(message: impl Into<String>) -> CallToolResult {
    let mut message = message.into();
    if message.trim().is_empty() {
        message = "Tool failed without an error message".to_string();
    }
    CallToolResult::error(vec![Content::text(message)])
}

fn schema_object(schema: Value) -> JsonObject {
    match schema {
        Value::Object(map) => map,
        _ => JsonObject::new(),
    }
}

/// JSON schema for an object with the given properties
pub fn object_schema(properties: Value, required: &[&str]) -> Value {
    serde_json::json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}
