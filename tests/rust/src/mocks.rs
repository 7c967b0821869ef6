//! Mock token providers and environments for testing

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use azdo_core::{AuthType, Credential, Error, Result};
use azdo_server::{EnvSource, TokenProvider};

/// Always returns the same PAT and counts calls
pub struct CountingTokens {
    token: String,
    calls: AtomicUsize,
}

impl CountingTokens {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenProvider for CountingTokens {
    fn auth_type(&self) -> AuthType {
        AuthType::Pat
    }

    async fn token(&self) -> Result<Credential> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        Ok(Credential::pat(self.token.clone()))
    }
}

/// Always fails with a missing credential
pub struct FailingTokens {
    source_name: &'static str,
}

impl FailingTokens {
    pub fn new(source_name: &'static str) -> Self {
        Self { source_name }
    }
}

#[async_trait]
impl TokenProvider for FailingTokens {
    fn auth_type(&self) -> AuthType {
        AuthType::EnvVar
    }

    async fn token(&self) -> Result<Credential> {
        Err(Error::missing_credential(self.source_name))
    }
}

/// Environment whose variables can change while a provider holds it
#[derive(Default)]
pub struct MutableEnv {
    vars: Mutex<HashMap<String, String>>,
}

impl MutableEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, name: &str, value: &str) {
        self.vars
            .lock()
            .unwrap()
            .insert(name.to_string(), value.to_string());
    }

    pub fn remove(&self, name: &str) {
        self.vars.lock().unwrap().remove(name);
    }
}

impl EnvSource for MutableEnv {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.lock().unwrap().get(name).cloned()
    }
}
