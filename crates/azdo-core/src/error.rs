//! Error taxonomy
//!
//! Startup errors (`UnsupportedAuthType`, `InvalidDomain`, `DuplicateTool`) are
//! fatal. `MissingCredential`, `CredentialCommand` and `ToolExecution` surface
//! per tool call and are turned into failure payloads by the handler wrapper.

use thiserror::Error;

/// Result alias using the core error type
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Authentication strategy tag not recognized
    #[error("Unsupported authentication type '{tag}'. Supported types: {}", supported.join(", "))]
    UnsupportedAuthType {
        tag: String,
        supported: Vec<&'static str>,
    },

    /// Required token source absent or empty when the token was requested
    #[error("Missing credential: {source_name} is not set or empty")]
    MissingCredential { source_name: String },

    /// External credential command could not produce a token
    #[error("Credential command failed: {0}")]
    CredentialCommand(String),

    /// Domain token not in the catalog
    #[error("Unknown domain '{token}'. Known domains: {}", known.join(", "))]
    InvalidDomain {
        token: String,
        known: Vec<&'static str>,
    },

    /// Two tools registered under the same name
    #[error("Tool '{name}' is already registered (by domain '{existing_domain}')")]
    DuplicateTool {
        name: String,
        existing_domain: &'static str,
    },

    /// Backend call or result processing failed inside a tool handler
    #[error("Tool execution failed: {0}")]
    ToolExecution(String),
}

impl Error {
    pub fn missing_credential(source_name: impl Into<String>) -> Self {
        Self::MissingCredential {
            source_name: source_name.into(),
        }
    }

    /// True for errors raised while resolving credentials
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            Self::MissingCredential { .. } | Self::CredentialCommand(_)
        )
    }
}
