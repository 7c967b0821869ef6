//! Azure DevOps REST client
//!
//! One `reqwest::Client` per session, carrying the `Authorization` header and
//! the composed user agent. Paths are relative to the organization URL of the
//! API family they belong to; `api-version` is appended unless the caller
//! already set one.

use std::fmt;
use std::time::Duration;

use azdo_core::{branding, AuthScheme, Credential};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::BackendError;

/// API families served from different hosts on the cloud service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiArea {
    /// `dev.azure.com` - projects, work, work items, git, build, wiki, test
    Core,
    /// `almsearch.dev.azure.com`
    Search,
    /// `vssps.dev.azure.com` - identities
    Identity,
    /// `advsec.dev.azure.com`
    AdvancedSecurity,
}

impl ApiArea {
    fn host_prefix(&self) -> Option<&'static str> {
        match self {
            Self::Core => None,
            Self::Search => Some("almsearch"),
            Self::Identity => Some("vssps"),
            Self::AdvancedSecurity => Some("advsec"),
        }
    }
}

/// Request body encodings used by the REST API
#[derive(Debug, Clone, Copy)]
pub enum Body<'a> {
    Json(&'a Value),
    /// `application/json-patch+json`, used by work item create/update
    JsonPatch(&'a Value),
}

impl Body<'_> {
    fn content_type(&self) -> &'static str {
        match self {
            Self::Json(_) => "application/json",
            Self::JsonPatch(_) => "application/json-patch+json",
        }
    }

    fn value(&self) -> &Value {
        match self {
            Self::Json(v) | Self::JsonPatch(v) => v,
        }
    }
}

/// Connection settings fixed at startup
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub organization_url: String,
    pub api_version: String,
    pub timeout: Duration,
}

impl ClientConfig {
    /// Settings for an organization name or collection URL
    pub fn new(organization: &str) -> Self {
        Self {
            organization_url: branding::organization_url(organization),
            api_version: branding::DEFAULT_API_VERSION.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Authenticated connection to one organization
pub struct DevOpsClient {
    http: reqwest::Client,
    organization_url: String,
    api_version: String,
    user_agent: String,
    expires_at: Option<DateTime<Utc>>,
}

impl fmt::Debug for DevOpsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DevOpsClient")
            .field("organization_url", &self.organization_url)
            .field("api_version", &self.api_version)
            .field("user_agent", &self.user_agent)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

impl DevOpsClient {
    /// Build a client from a resolved credential
    pub fn new(
        config: &ClientConfig,
        credential: &Credential,
        user_agent: &str,
    ) -> anyhow::Result<Self> {
        let mut auth = HeaderValue::from_str(&authorization_value(credential))
            .map_err(|_| anyhow::anyhow!("Credential contains characters not allowed in a header"))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(user_agent)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            organization_url: config.organization_url.trim_end_matches('/').to_string(),
            api_version: config.api_version.clone(),
            user_agent: user_agent.to_string(),
            expires_at: credential.expires_at(),
        })
    }

    pub fn organization_url(&self) -> &str {
        &self.organization_url
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Expiry of the credential this client was built with
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Organization URL for an API family
    ///
    /// Cloud organizations move search and advanced security to dedicated
    /// hosts; collection URLs serve every family from the same base.
    pub fn base_url(&self, area: ApiArea) -> String {
        let Some(prefix) = area.host_prefix() else {
            return self.organization_url.clone();
        };

        match Url::parse(&self.organization_url) {
            Ok(mut url) if url.host_str() == Some(branding::CLOUD_HOST) => {
                let host = format!("{}.{}", prefix, branding::CLOUD_HOST);
                match url.set_host(Some(&host)) {
                    Ok(()) => url.as_str().trim_end_matches('/').to_string(),
                    Err(_) => self.organization_url.clone(),
                }
            }
            _ => self.organization_url.clone(),
        }
    }

    pub fn url(&self, area: ApiArea, path: &str) -> String {
        format!("{}/{}", self.base_url(area), path.trim_start_matches('/'))
    }

    /// GET returning JSON
    pub async fn get(
        &self,
        area: ApiArea,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Value, BackendError> {
        let url = self.url(area, path);
        let response = self.send(Method::GET, &url, query, None, &[]).await?;
        read_json(&url, response).await
    }

    /// GET returning the raw body (logs, page content)
    pub async fn get_text(
        &self,
        area: ApiArea,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<String, BackendError> {
        let url = self.url(area, path);
        let response = self.send(Method::GET, &url, query, None, &[]).await?;
        response
            .text()
            .await
            .map_err(|source| BackendError::Transport { url, source })
    }

    /// Request with a body, returning JSON
    pub async fn request(
        &self,
        method: Method,
        area: ApiArea,
        path: &str,
        query: &[(&str, String)],
        body: Body<'_>,
    ) -> Result<Value, BackendError> {
        self.request_with_headers(method, area, path, query, body, &[])
            .await
    }

    /// Request with a body and extra headers (e.g. `If-Match`), returning JSON
    pub async fn request_with_headers(
        &self,
        method: Method,
        area: ApiArea,
        path: &str,
        query: &[(&str, String)],
        body: Body<'_>,
        headers: &[(&'static str, String)],
    ) -> Result<Value, BackendError> {
        let url = self.url(area, path);
        let response = self
            .send(method, &url, query, Some(body), headers)
            .await?;
        read_json(&url, response).await
    }

    pub async fn post(
        &self,
        area: ApiArea,
        path: &str,
        query: &[(&str, String)],
        body: &Value,
    ) -> Result<Value, BackendError> {
        self.request(Method::POST, area, path, query, Body::Json(body))
            .await
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        query: &[(&str, String)],
        body: Option<Body<'_>>,
        headers: &[(&'static str, String)],
    ) -> Result<reqwest::Response, BackendError> {
        let mut request = self.http.request(method.clone(), url).query(query);
        for (name, value) in headers {
            request = request.header(*name, value.as_str());
        }
        if !query.iter().any(|(k, _)| *k == "api-version") {
            request = request.query(&[("api-version", self.api_version.as_str())]);
        }
        if let Some(body) = body {
            request = request
                .header(CONTENT_TYPE, body.content_type())
                .body(body.value().to_string());
        }

        debug!(method = %method, url = %url, "[DevOps] Sending request");

        let response = request
            .send()
            .await
            .map_err(|source| BackendError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::status(&method, url, status.as_u16(), &body));
        }

        Ok(response)
    }
}

async fn read_json(url: &str, response: reqwest::Response) -> Result<Value, BackendError> {
    let text = response
        .text()
        .await
        .map_err(|source| BackendError::Transport {
            url: url.to_string(),
            source,
        })?;

    if text.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(&text).map_err(|e| BackendError::Decode {
        url: url.to_string(),
        message: e.to_string(),
    })
}

fn authorization_value(credential: &Credential) -> String {
    match credential.scheme() {
        AuthScheme::Basic => {
            format!("Basic {}", STANDARD.encode(format!(":{}", credential.token())))
        }
        AuthScheme::Bearer => format!("Bearer {}", credential.token()),
    }
}

/// Percent-encode a path segment (project, team, repository names)
pub fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}
