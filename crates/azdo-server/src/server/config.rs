//! Startup configuration

use std::time::Duration;

use azdo_core::{branding, AuthType};

use crate::auth::AuthOptions;
use crate::client::ClientConfig;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Immutable configuration captured from the command line
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Organization name or URL
    pub organization: String,
    /// Raw `--domains` tokens; empty means every domain
    pub domains: Vec<String>,
    /// Raw `--authentication` tag
    pub auth_type: String,
    pub token: Option<String>,
    pub tenant: Option<String>,
    pub api_version: String,
    pub timeout: Duration,
}

impl ServerConfig {
    pub fn new(organization: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            domains: Vec::new(),
            auth_type: AuthType::default().as_str().to_string(),
            token: None,
            tenant: None,
            api_version: branding::DEFAULT_API_VERSION.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_domains<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.domains = domains.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_auth_type(mut self, tag: impl Into<String>) -> Self {
        self.auth_type = tag.into();
        self
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn with_tenant(mut self, tenant: Option<String>) -> Self {
        self.tenant = tenant;
        self
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub(crate) fn auth_options(&self) -> AuthOptions {
        AuthOptions {
            token: self.token.clone(),
            tenant: self.tenant.clone(),
            command_timeout: self.timeout,
        }
    }

    pub(crate) fn client_config(&self) -> ClientConfig {
        ClientConfig::new(&self.organization)
            .with_api_version(self.api_version.clone())
            .with_timeout(self.timeout)
    }
}
