//! Environment variable bearer token strategy

use std::sync::Arc;

use async_trait::async_trait;
use azdo_core::{branding, AuthType, Credential, Error, Result};

use super::env::{non_empty, EnvSource};
use super::TokenProvider;

/// Bearer token read from a single named variable on every call
pub struct EnvVarTokenProvider {
    var_name: String,
    env: Arc<dyn EnvSource>,
}

impl EnvVarTokenProvider {
    pub fn new(var_name: impl Into<String>, env: Arc<dyn EnvSource>) -> Self {
        Self {
            var_name: var_name.into(),
            env,
        }
    }

    /// Reads `ADO_MCP_AUTH_TOKEN`
    pub fn legacy(env: Arc<dyn EnvSource>) -> Self {
        Self::new(branding::LEGACY_TOKEN_ENV_VAR, env)
    }

    pub fn var_name(&self) -> &str {
        &self.var_name
    }
}

#[async_trait]
impl TokenProvider for EnvVarTokenProvider {
    fn auth_type(&self) -> AuthType {
        AuthType::EnvVar
    }

    async fn token(&self) -> Result<Credential> {
        non_empty(self.env.as_ref(), &self.var_name)
            .map(|token| Credential::bearer(token, None))
            .ok_or_else(|| Error::missing_credential(self.var_name.clone()))
    }
}
