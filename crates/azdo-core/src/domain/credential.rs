//! Credential value - a resolved bearer/basic secret
//!
//! Produced by a token provider at call time and consumed once by the session
//! client factory to build the `Authorization` header. The secret is zeroed on
//! drop and never printed by `Debug`.

use chrono::{DateTime, Duration, Utc};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// HTTP authorization scheme for a credential
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// `Basic base64(":" + token)`, used for personal access tokens
    Basic,
    /// `Bearer token`
    Bearer,
}

#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Credential {
    token: String,
    #[zeroize(skip)]
    scheme: AuthScheme,
    #[zeroize(skip)]
    expires_at: Option<DateTime<Utc>>,
}

impl Credential {
    /// Personal access token credential
    pub fn pat(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            scheme: AuthScheme::Basic,
            expires_at: None,
        }
    }

    /// Bearer token credential
    pub fn bearer(token: impl Into<String>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            token: token.into(),
            scheme: AuthScheme::Bearer,
            expires_at,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn scheme(&self) -> AuthScheme {
        self.scheme
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Expired, or expiring within `skew`
    pub fn is_expired_within(&self, skew: Duration) -> bool {
        match self.expires_at {
            Some(exp) => exp - skew <= Utc::now(),
            None => false,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_within(Duration::zero())
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"[REDACTED]")
            .field("scheme", &self.scheme)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
