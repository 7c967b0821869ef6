//! Domain entities
//!
//! - `toolset` - The closed catalog of tool domains
//! - `selection` - Resolving user domain selections into an enabled set
//! - `auth_type` - Authentication strategy tags
//! - `credential` - Resolved credential values

mod auth_type;
mod credential;
mod selection;
mod toolset;

pub use auth_type::AuthType;
pub use credential::{AuthScheme, Credential};
pub use selection::{resolve_domains, DomainSet, ALL_DOMAINS_TOKEN};
pub use toolset::Domain;
