//! Tool domains
//!
//! A domain is a named group of tools enabled or disabled as a unit. The set
//! is fixed at compile time; `Domain::ALL` is also the registration order.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Domain {
    /// Projects, teams, identities
    Core,
    /// Iterations and capacity
    Work,
    /// Work item CRUD, comments, queries
    WorkItems,
    /// Git repositories, branches, pull requests
    Repositories,
    /// Build definitions, runs, logs
    Pipelines,
    /// Wikis and pages
    Wiki,
    /// Test plans, suites, cases, results
    TestPlans,
    /// Code, wiki and work item search
    Search,
    /// Advanced Security alerts
    AdvancedSecurity,
}

impl Domain {
    /// Every domain, in registration order
    pub const ALL: [Domain; 9] = [
        Domain::Core,
        Domain::Work,
        Domain::WorkItems,
        Domain::Repositories,
        Domain::Pipelines,
        Domain::Wiki,
        Domain::TestPlans,
        Domain::Search,
        Domain::AdvancedSecurity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::Work => "work",
            Self::WorkItems => "work-items",
            Self::Repositories => "repositories",
            Self::Pipelines => "pipelines",
            Self::Wiki => "wiki",
            Self::TestPlans => "test-plans",
            Self::Search => "search",
            Self::AdvancedSecurity => "advanced-security",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.as_str() == s)
    }

    /// Names of every domain, in registration order
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(Domain::as_str).collect()
    }

    /// Position in `ALL`, used as a bit index by `DomainSet`
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
