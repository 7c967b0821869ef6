//! Trace Context - tool call correlation and structured logging
//!
//! Generates short trace IDs and provides a span per tool invocation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use azdo_core::{AuthType, Domain};
use tracing::{info, info_span, warn, Span};

/// Global call counter for trace ID generation
static CALL_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a short, unique trace ID
/// Format: 6 hex characters (e.g., "a1b2c3")
pub fn generate_trace_id() -> String {
    let counter = CALL_COUNTER.fetch_add(1, Ordering::Relaxed);
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_micros() as u64)
        .unwrap_or(0);

    let mixed = counter.wrapping_add(timestamp);
    format!("{:06x}", mixed & 0xFFFFFF)
}

/// Correlation data for a single tool call
#[derive(Debug, Clone)]
pub struct TraceContext {
    pub trace_id: String,
    pub tool: String,
    pub domain: Domain,
    pub auth_type: AuthType,
    /// User agent in effect when the call started
    pub user_agent: String,
    pub started_at: Instant,
}

impl TraceContext {
    pub fn new(tool: &str, domain: Domain, auth_type: AuthType, user_agent: String) -> Self {
        Self {
            trace_id: generate_trace_id(),
            tool: tool.to_string(),
            domain,
            auth_type,
            user_agent,
            started_at: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.started_at.elapsed().as_millis() as u64
    }
}

/// Span and log line helpers for tool calls
pub struct ToolSpan;

impl ToolSpan {
    /// Span carrying the call's correlation fields for all child logs
    pub fn span(ctx: &TraceContext) -> Span {
        info_span!(
            "tool_call",
            trace_id = %ctx.trace_id,
            tool = %ctx.tool,
            domain = %ctx.domain,
            auth_type = %ctx.auth_type,
            user_agent = %ctx.user_agent,
        )
    }

    pub fn log_entry(ctx: &TraceContext) {
        info!(trace_id = %ctx.trace_id, "→ {} [{}]", ctx.tool, ctx.domain);
    }

    /// Log completion; `error` is the failure message, if any
    pub fn log_exit(ctx: &TraceContext, error: Option<&str>) {
        let elapsed = ctx.elapsed_ms();
        match error {
            None => info!(trace_id = %ctx.trace_id, "← {} ok ({}ms)", ctx.tool, elapsed),
            Some(e) => warn!(
                trace_id = %ctx.trace_id,
                error = %e,
                "← {} failed ({}ms)",
                ctx.tool,
                elapsed
            ),
        }
    }
}
