//! Authentication strategy tags
//!
//! The tag is chosen once at startup. Parsing is the only eager validation in
//! the authentication path: an unknown tag can never succeed, so it fails
//! immediately instead of at the first tool call.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AuthType {
    /// Personal access token from `--token` or the PAT environment variable
    #[default]
    Pat,
    /// Bearer token from the legacy fixed-name environment variable
    EnvVar,
    /// Bearer token from `az account get-access-token`
    AzCli,
}

impl AuthType {
    pub const ALL: [AuthType; 3] = [AuthType::Pat, AuthType::EnvVar, AuthType::AzCli];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pat => "pat",
            Self::EnvVar => "envvar",
            Self::AzCli => "azcli",
        }
    }

    pub fn supported() -> Vec<&'static str> {
        Self::ALL.iter().map(AuthType::as_str).collect()
    }

    /// Parse a CLI tag (case-insensitive)
    pub fn parse(tag: &str) -> Result<Self> {
        let normalized = tag.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| Error::UnsupportedAuthType {
                tag: tag.to_string(),
                supported: Self::supported(),
            })
    }
}

impl fmt::Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
