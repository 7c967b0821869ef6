//! Authenticator Factory
//!
//! Builds the token provider for the strategy chosen at startup:
//! - `pat`: `--token`, else `AZURE_DEVOPS_PAT` (HTTP Basic)
//! - `envvar`: `ADO_MCP_AUTH_TOKEN` (Bearer)
//! - `azcli`: `az account get-access-token` (Bearer, with expiry)
//!
//! Construction only validates the strategy tag. Credential sources are read
//! when `token()` is called, so the server starts even when no credential is
//! available yet.

mod azcli;
mod env;
mod env_var;
mod pat;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use azdo_core::{AuthType, Credential, Result};
use tracing::info;

pub use azcli::AzCliTokenProvider;
pub use env::{EnvSource, MapEnv, ProcessEnv};
pub use env_var::EnvVarTokenProvider;
pub use pat::PatTokenProvider;

/// Resolves the current credential on demand
///
/// Implementations may re-read their source on every call; caching of the
/// resulting session happens in `SessionClientFactory`.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    fn auth_type(&self) -> AuthType;

    async fn token(&self) -> Result<Credential>;
}

/// Token provider shared by the client factory and every handler
pub type SharedTokenProvider = Arc<dyn TokenProvider>;

/// Upper bound on one `az` invocation unless configured otherwise
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// Strategy inputs taken from the command line
#[derive(Debug, Clone)]
pub struct AuthOptions {
    /// Inline credential (`--token`), PAT strategy only
    pub token: Option<String>,
    /// Entra tenant for the azcli strategy
    pub tenant: Option<String>,
    /// Time allowed for a credential command before it is killed
    pub command_timeout: Duration,
}

impl Default for AuthOptions {
    fn default() -> Self {
        Self {
            token: None,
            tenant: None,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }
}

/// Build the token provider for `tag`, reading the process environment
pub fn create_authenticator(tag: &str, options: AuthOptions) -> Result<SharedTokenProvider> {
    create_authenticator_with_env(tag, options, Arc::new(ProcessEnv))
}

/// Build the token provider for `tag` with an explicit environment source
///
/// Fails only for an unrecognized tag.
pub fn create_authenticator_with_env(
    tag: &str,
    options: AuthOptions,
    env: Arc<dyn EnvSource>,
) -> Result<SharedTokenProvider> {
    let auth_type = AuthType::parse(tag)?;

    let provider: SharedTokenProvider = match auth_type {
        AuthType::Pat => Arc::new(PatTokenProvider::new(options.token, env)),
        AuthType::EnvVar => Arc::new(EnvVarTokenProvider::legacy(env)),
        AuthType::AzCli => Arc::new(
            AzCliTokenProvider::new(options.tenant).with_timeout(options.command_timeout),
        ),
    };

    info!(auth_type = %auth_type, "[Auth] Authenticator created");
    Ok(provider)
}
