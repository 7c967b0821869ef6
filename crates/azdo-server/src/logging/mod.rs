//! Tool call logging
//!
//! Structured logging with:
//! - Short trace IDs for correlating a call's log lines
//! - One entry and one exit line per tool call

mod trace_context;

pub use trace_context::{generate_trace_id, ToolSpan, TraceContext};
