//! Session Client Factory
//!
//! Lazily builds the `DevOpsClient` on first use and hands the same instance
//! to every later caller. Construction runs under an async mutex, so callers
//! racing before any client exists wait for a single token resolution instead
//! of each authenticating on their own. Failures are not cached: the next call
//! resolves the credential again. A client whose credential is about to expire
//! is rebuilt.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use azdo_core::{Error, Result, UserAgent};
use chrono::{Duration, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::{ClientConfig, DevOpsClient};
use crate::auth::SharedTokenProvider;

/// Rebuild the client this long before its credential expires
const EXPIRY_SKEW_MINUTES: i64 = 5;

pub struct SessionClientFactory {
    config: ClientConfig,
    tokens: SharedTokenProvider,
    user_agent: Arc<UserAgent>,
    cached: Mutex<Option<Arc<DevOpsClient>>>,
    builds: AtomicU64,
}

impl SessionClientFactory {
    pub fn new(
        config: ClientConfig,
        tokens: SharedTokenProvider,
        user_agent: Arc<UserAgent>,
    ) -> Self {
        Self {
            config,
            tokens,
            user_agent,
            cached: Mutex::new(None),
            builds: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the session client, building it on first use
    ///
    /// Credential failures propagate unchanged as typed errors.
    pub async fn client(&self) -> Result<Arc<DevOpsClient>> {
        let mut cached = self.cached.lock().await;

        if let Some(client) = cached.as_ref() {
            if !is_stale(client) {
                return Ok(client.clone());
            }
            info!("[Session] Credential expiring, rebuilding client");
        }

        let credential = self.tokens.token().await.map_err(|e| {
            warn!(auth_type = %self.tokens.auth_type(), error = %e, "[Session] Credential resolution failed");
            e
        })?;

        let user_agent = self.user_agent.get();
        let client = DevOpsClient::new(&self.config, &credential, &user_agent)
            .map_err(|e| Error::ToolExecution(format!("Failed to build client: {}", e)))?;
        let client = Arc::new(client);

        let n = self.builds.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(
            organization = %self.config.organization_url,
            user_agent = %user_agent,
            builds = n,
            "[Session] Client created"
        );

        *cached = Some(client.clone());
        Ok(client)
    }

    /// Number of clients constructed so far
    pub fn build_count(&self) -> u64 {
        self.builds.load(Ordering::SeqCst)
    }
}

fn is_stale(client: &DevOpsClient) -> bool {
    match client.expires_at() {
        Some(exp) => exp - Duration::minutes(EXPIRY_SKEW_MINUTES) <= Utc::now(),
        None => false,
    }
}
