//! Domain selection
//!
//! Turns the user's `--domains` input into the read-only set of enabled
//! domains. Tokens are trimmed and lower-cased, may be comma separated, and
//! the sentinel `all` expands to every domain. Unknown tokens are rejected.

use std::fmt;

use tracing::debug;

use super::Domain;
use crate::error::{Error, Result};

/// Sentinel selecting every domain
pub const ALL_DOMAINS_TOKEN: &str = "all";

/// Set of enabled domains, one bit per catalog entry
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct DomainSet {
    bits: u16,
}

impl DomainSet {
    pub fn empty() -> Self {
        Self { bits: 0 }
    }

    pub fn all() -> Self {
        Domain::ALL.into_iter().collect()
    }

    pub fn insert(&mut self, domain: Domain) {
        self.bits |= 1 << domain.index();
    }

    /// O(1) membership check used to gate registration
    pub fn contains(&self, domain: Domain) -> bool {
        self.bits & (1 << domain.index()) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Enabled domains in registration order
    pub fn iter(&self) -> impl Iterator<Item = Domain> + '_ {
        Domain::ALL.into_iter().filter(|d| self.contains(*d))
    }
}

impl FromIterator<Domain> for DomainSet {
    fn from_iter<I: IntoIterator<Item = Domain>>(iter: I) -> Self {
        let mut set = Self::empty();
        for domain in iter {
            set.insert(domain);
        }
        set
    }
}

impl fmt::Debug for DomainSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(|d| d.as_str())).finish()
    }
}

/// Resolve user-supplied domain tokens into the enabled set
///
/// Empty input, or any `all` token, yields every domain. Each argument may
/// itself be a comma-separated list. Fails with `InvalidDomain` on the first
/// token that is not in the catalog.
pub fn resolve_domains<S: AsRef<str>>(tokens: &[S]) -> Result<DomainSet> {
    let normalized: Vec<String> = tokens
        .iter()
        .flat_map(|t| t.as_ref().split(','))
        .map(|t| t.trim().to_ascii_lowercase())
        .filter(|t| !t.is_empty())
        .collect();

    if normalized.is_empty() || normalized.iter().any(|t| t == ALL_DOMAINS_TOKEN) {
        debug!("[Domains] Enabling all domains");
        return Ok(DomainSet::all());
    }

    let mut set = DomainSet::empty();
    for token in &normalized {
        let domain = Domain::from_str(token).ok_or_else(|| Error::InvalidDomain {
            token: token.clone(),
            known: Domain::names(),
        })?;
        set.insert(domain);
    }

    debug!(domains = ?set, "[Domains] Resolved domain selection");
    Ok(set)
}
