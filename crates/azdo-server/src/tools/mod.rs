//! Tool Registrar
//!
//! Each domain owns a registration routine that declares its fixed tool set.
//! `register_all` walks the catalog in `Domain::ALL` order and invokes the
//! routine of every enabled domain. Registration is synchronous and performs
//! no I/O; handlers reach the backend only when called.

mod advanced_security;
mod core_tools;
pub mod handler;
mod pipelines;
pub mod registry;
mod repositories;
mod search;
mod test_plans;
mod wiki;
mod work;
mod work_items;

use azdo_core::{Domain, DomainSet, Result};
use tracing::{debug, info};

pub use handler::{failure_result, success_result, DomainTools, ToolDeps};
pub use registry::{RegisteredTool, ToolHandler, ToolRegistry};

/// Domain registration routine
pub type RegisterFn = fn(&mut ToolRegistry, &ToolDeps) -> Result<()>;

/// Every domain paired with its registration routine, in registration order
pub const CATALOG: [(Domain, RegisterFn); 9] = [
    (Domain::Core, core_tools::register),
    (Domain::Work, work::register),
    (Domain::WorkItems, work_items::register),
    (Domain::Repositories, repositories::register),
    (Domain::Pipelines, pipelines::register),
    (Domain::Wiki, wiki::register),
    (Domain::TestPlans, test_plans::register),
    (Domain::Search, search::register),
    (Domain::AdvancedSecurity, advanced_security::register),
];

/// Register the tools of every enabled domain
///
/// Returns the number of tools registered. Fails only on a duplicate name.
pub fn register_all(
    registry: &mut ToolRegistry,
    deps: &ToolDeps,
    enabled: &DomainSet,
) -> Result<usize> {
    let before = registry.len();

    for (domain, register) in CATALOG {
        if !enabled.contains(domain) {
            debug!(domain = %domain, "[Tools] Domain disabled, skipping");
            continue;
        }
        register(registry, deps)?;
        debug!(
            domain = %domain,
            tools = registry.count_for(domain),
            "[Tools] Domain registered"
        );
    }

    let added = registry.len() - before;
    info!(tools = added, domains = ?enabled, "[Tools] Registration complete");
    Ok(added)
}

/// Query string builder skipping absent values
#[derive(Debug, Default)]
pub(crate) struct Query(Vec<(&'static str, String)>);

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, key: &'static str, value: impl ToString) -> Self {
        self.0.push((key, value.to_string()));
        self
    }

    pub fn opt<T: ToString>(mut self, key: &'static str, value: Option<T>) -> Self {
        if let Some(v) = value {
            self.0.push((key, v.to_string()));
        }
        self
    }

    /// Comma-joined list, skipped when empty
    pub fn list(mut self, key: &'static str, values: &[String]) -> Self {
        if !values.is_empty() {
            self.0.push((key, values.join(",")));
        }
        self
    }

    pub fn build(self) -> Vec<(&'static str, String)> {
        self.0
    }
}
