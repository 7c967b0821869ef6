//! # Azure DevOps MCP Core Library
//!
//! Domain types shared by the server and the CLI.
//!
//! ## Modules
//!
//! - `branding` - Product naming and well-known environment variable names
//! - `domain` - Tool domains, domain selection, authentication types, credentials
//! - `error` - Error taxonomy shared across crates
//! - `user_agent` - Append-once user agent string

pub mod branding;
pub mod domain;
pub mod error;
pub mod user_agent;

// Re-export commonly used types
pub use domain::*;
pub use error::{Error, Result};
pub use user_agent::UserAgent;
