//! Centralized branding constants
//!
//! All product naming and well-known environment variable names come from
//! this module so the CLI, logs and the user agent stay consistent.

/// Binary and MCP server name reported during `initialize`
pub const SERVER_NAME: &str = "azdo-mcp";

/// Product identifier used as the user agent prefix
pub const PRODUCT_NAME: &str = "AzureDevOps.MCP";

/// Log file prefix (files look like `azdo-mcp.2026-01-22.log`)
pub const LOG_PREFIX: &str = "azdo-mcp";

/// Directory name under the platform data dir
pub const APP_IDENTIFIER: &str = "azdo-mcp";

/// Primary environment variable holding a personal access token
pub const PAT_ENV_VAR: &str = "AZURE_DEVOPS_PAT";

/// Legacy fixed-name token variable read by the `envvar` strategy
pub const LEGACY_TOKEN_ENV_VAR: &str = "ADO_MCP_AUTH_TOKEN";

/// Azure DevOps application id used as the Entra resource for CLI tokens
pub const AZURE_DEVOPS_RESOURCE_ID: &str = "499b84ac-1321-427f-aa17-267ca6975798";

/// Default REST API version
pub const DEFAULT_API_VERSION: &str = "7.1";

/// Cloud host for organization-scoped APIs
pub const CLOUD_HOST: &str = "dev.azure.com";

/// Product version of this build
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Build the organization URL from a bare name or pass a full URL through
///
/// # Example
/// ```
/// use azdo_core::branding::organization_url;
///
/// assert_eq!(organization_url("contoso"), "https://dev.azure.com/contoso");
/// assert_eq!(
///     organization_url("https://tfs.contoso.local/DefaultCollection/"),
///     "https://tfs.contoso.local/DefaultCollection"
/// );
/// ```
pub fn organization_url(organization: &str) -> String {
    let trimmed = organization.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}/{}", CLOUD_HOST, trimmed)
    }
}
