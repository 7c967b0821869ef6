//! MCP protocol surface

mod handler;

pub use handler::AzdoMcpHandler;
