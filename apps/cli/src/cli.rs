//! CLI argument definitions

use std::time::Duration;

use azdo_core::{branding, AuthType};
use azdo_server::ServerConfig;
use clap::{ArgAction, Parser};

/// CLI arguments for azdo-mcp
#[derive(Parser, Debug)]
#[command(name = "azdo-mcp")]
#[command(author, version, about = "Azure DevOps MCP server (stdio)")]
#[command(long_about = r#"
Exposes an Azure DevOps organization to MCP clients over stdin/stdout.

Tools are grouped into domains; only the domains given with --domains are
registered. Valid domains: core, work, work-items, repositories, pipelines,
wiki, test-plans, search, advanced-security, or "all" (the default).

Authentication:
  pat     --token, else AZURE_DEVOPS_PAT (default)
  envvar  ADO_MCP_AUTH_TOKEN, sent as a bearer token
  azcli   az account get-access-token (requires `az login`)

Example:
  azdo-mcp contoso
  azdo-mcp contoso -d core work-items repositories
  azdo-mcp https://tfs.contoso.local/DefaultCollection -a envvar
"#)]
pub struct Cli {
    /// Organization name or collection URL
    pub organization: String,

    /// Domains to enable (space or comma separated)
    #[arg(short, long, value_name = "DOMAIN", num_args = 1.., default_value = "all")]
    pub domains: Vec<String>,

    /// Authentication type
    #[arg(short, long, value_name = "TYPE", default_value = AuthType::Pat.as_str())]
    pub authentication: String,

    /// Personal access token (pat authentication only)
    #[arg(long, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Entra tenant id (azcli authentication only)
    #[arg(long, value_name = "TENANT")]
    pub tenant: Option<String>,

    /// REST API version sent with every request
    #[arg(long, value_name = "VERSION", default_value = branding::DEFAULT_API_VERSION)]
    pub api_version: String,

    /// Backend request timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Disable the rolling log file
    #[arg(long)]
    pub no_log_file: bool,

    /// Verbosity level (-v = debug, -vv = trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig::new(&self.organization)
            .with_domains(self.domains.iter().cloned())
            .with_auth_type(&self.authentication)
            .with_token(self.token.clone())
            .with_tenant(self.tenant.clone())
            .with_api_version(&self.api_version)
            .with_timeout(Duration::from_secs(self.timeout_secs))
    }

    /// Default filter level for our crates
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}
