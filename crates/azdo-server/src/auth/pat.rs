//! Personal access token strategy

use std::sync::Arc;

use async_trait::async_trait;
use azdo_core::{branding, AuthType, Credential, Error, Result};
use tracing::debug;

use super::env::{non_empty, EnvSource};
use super::TokenProvider;

/// PAT from `--token`, falling back to `AZURE_DEVOPS_PAT`
pub struct PatTokenProvider {
    inline: Option<String>,
    env_var: String,
    env: Arc<dyn EnvSource>,
}

impl PatTokenProvider {
    pub fn new(inline: Option<String>, env: Arc<dyn EnvSource>) -> Self {
        Self {
            inline: inline
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty()),
            env_var: branding::PAT_ENV_VAR.to_string(),
            env,
        }
    }
}

#[async_trait]
impl TokenProvider for PatTokenProvider {
    fn auth_type(&self) -> AuthType {
        AuthType::Pat
    }

    async fn token(&self) -> Result<Credential> {
        if let Some(token) = &self.inline {
            debug!("[Auth] Using PAT from command line");
            return Ok(Credential::pat(token.clone()));
        }

        match non_empty(self.env.as_ref(), &self.env_var) {
            Some(token) => {
                debug!(env_var = %self.env_var, "[Auth] Using PAT from environment");
                Ok(Credential::pat(token))
            }
            None => Err(Error::missing_credential(format!(
                "--token or {}",
                self.env_var
            ))),
        }
    }
}
