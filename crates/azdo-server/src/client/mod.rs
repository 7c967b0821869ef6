//! Backend session client
//!
//! - `devops` - `DevOpsClient`, the authenticated REST connection
//! - `factory` - `SessionClientFactory`, lazy guarded construction and reuse
//! - `error` - backend call errors

mod devops;
mod error;
mod factory;

pub use devops::{segment, ApiArea, Body, ClientConfig, DevOpsClient};
pub use error::BackendError;
pub use factory::SessionClientFactory;
