//! Azure CLI strategy
//!
//! Runs `az account get-access-token` for the Azure DevOps resource on each
//! call. The token expiry reported by the CLI travels with the credential so
//! the session client can be rebuilt before it lapses.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use azdo_core::{branding, AuthType, Credential, Error, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, warn};

use super::{TokenProvider, DEFAULT_COMMAND_TIMEOUT};

#[derive(Debug, Deserialize)]
struct AzAccessToken {
    #[serde(rename = "accessToken")]
    access_token: String,
    /// Unix seconds, present in az >= 2.54
    #[serde(default)]
    expires_on: Option<i64>,
}

pub struct AzCliTokenProvider {
    program: String,
    tenant: Option<String>,
    timeout: Duration,
}

impl AzCliTokenProvider {
    pub fn new(tenant: Option<String>) -> Self {
        let program = if cfg!(windows) { "az.cmd" } else { "az" };
        Self {
            program: program.to_string(),
            tenant: tenant.filter(|t| !t.trim().is_empty()),
            timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    /// Kill `az` and fail if it has not answered within `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the executable (tests, non-standard installs)
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    fn args(&self) -> Vec<String> {
        let mut args = vec![
            "account".to_string(),
            "get-access-token".to_string(),
            "--resource".to_string(),
            branding::AZURE_DEVOPS_RESOURCE_ID.to_string(),
            "--output".to_string(),
            "json".to_string(),
        ];
        if let Some(tenant) = &self.tenant {
            args.push("--tenant".to_string());
            args.push(tenant.clone());
        }
        args
    }
}

/// Parse `az account get-access-token --output json`
fn parse_access_token(stdout: &[u8]) -> Result<Credential> {
    let parsed: AzAccessToken = serde_json::from_slice(stdout)
        .map_err(|e| Error::CredentialCommand(format!("Unexpected az output: {}", e)))?;

    if parsed.access_token.trim().is_empty() {
        return Err(Error::CredentialCommand(
            "az returned an empty access token".to_string(),
        ));
    }

    let expires_at = parsed
        .expires_on
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0));
    Ok(Credential::bearer(parsed.access_token, expires_at))
}

#[async_trait]
impl TokenProvider for AzCliTokenProvider {
    fn auth_type(&self) -> AuthType {
        AuthType::AzCli
    }

    async fn token(&self) -> Result<Credential> {
        debug!(program = %self.program, tenant = ?self.tenant, "[Auth] Requesting token from Azure CLI");

        let command = Command::new(&self.program)
            .args(self.args())
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(self.timeout, command)
            .await
            .map_err(|_| {
                warn!(timeout = ?self.timeout, "[Auth] az did not answer in time");
                Error::CredentialCommand(format!(
                    "az account get-access-token timed out after {:?}",
                    self.timeout
                ))
            })?
            .map_err(|e| {
                Error::CredentialCommand(format!(
                    "Failed to run '{}': {}. Is the Azure CLI installed and on PATH?",
                    self.program, e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(status = ?output.status.code(), "[Auth] az exited with failure");
            return Err(Error::CredentialCommand(format!(
                "az account get-access-token failed ({}). Run 'az login' first. {}",
                output.status,
                stderr.trim()
            )));
        }

        parse_access_token(&output.stdout)
    }
}
