//! User agent - process-wide, append-once
//!
//! Starts as `AzureDevOps.MCP/<version> (local)`. Once the MCP client has
//! identified itself during `initialize`, its `name/version` is appended.
//! Reads are lock-free and always return whatever is assembled so far.

use std::sync::OnceLock;

use tracing::{debug, warn};

use crate::branding;

#[derive(Debug)]
pub struct UserAgent {
    base: String,
    client: OnceLock<String>,
}

impl UserAgent {
    /// User agent for this build
    pub fn new() -> Self {
        Self::with_base(format!(
            "{}/{} (local)",
            branding::PRODUCT_NAME,
            branding::version()
        ))
    }

    pub fn with_base(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            client: OnceLock::new(),
        }
    }

    /// Append the negotiated client identity
    ///
    /// Only the first call takes effect. Repeating the same value is a no-op;
    /// a different value is ignored with a warning.
    pub fn append_client(&self, name: &str, version: &str) {
        let suffix = format!("{}/{}", name.trim(), version.trim());
        match self.client.set(suffix) {
            Ok(()) => debug!(user_agent = %self.get(), "[UserAgent] Client identity appended"),
            Err(rejected) => {
                if self.client.get() != Some(&rejected) {
                    warn!(
                        current = ?self.client.get(),
                        rejected = %rejected,
                        "[UserAgent] Client identity already set, ignoring"
                    );
                }
            }
        }
    }

    /// Current user agent string
    pub fn get(&self) -> String {
        match self.client.get() {
            Some(client) => format!("{} {}", self.base, client),
            None => self.base.clone(),
        }
    }

    pub fn has_client(&self) -> bool {
        self.client.get().is_some()
    }
}

impl Default for UserAgent {
    fn default() -> Self {
        Self::new()
    }
}
