//! Hierarchical service-location registry.
//!
//! Services are registered under a key path ([`Kta`]) plus a set of scopes
//! and resolved later by path and scope containment:
//!
//! - [`Registry`]: per-domain instance store with scoped lookup
//! - [`RegistryHub`]: directory federating registries by type
//! - [`RegistryStats`]: per-path, per-scope, per-caller lookup counters
//! - [`RegistryError`]: the failure taxonomy shared by all of the above
//!
//! # Example
//!
//! ```
//! use locus_registry::{GetOptions, Registry, RegistryHub};
//!
//! # fn main() -> locus_registry::Result<()> {
//! let hub = RegistryHub::new();
//! let users = hub.create_registry("users", |ty, hub| {
//! 	Registry::with_config(ty, hub.registry_config())
//! })?;
//!
//! users.create_instance(["user", "repo"], ["prod"], |_, ctx| Ok(ctx.instance("pg")))?;
//!
//! let repo = hub.get("users", ["user", "repo"], GetOptions::scoped("prod"))?;
//! assert_eq!(repo.downcast_ref::<&str>(), Some(&"pg"));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod hub;
pub mod instance;
pub mod registry;
pub mod stats;
pub mod tree;

pub use config::{ConfigError, RegistryConfig};
pub use error::{ErrorKind, RegistryError, Result};
pub use hub::{HubCoordinate, RegistryHub};
pub use instance::{Instance, Payload};
pub use locus_primitives::{Client, Coordinate, Kta, Scopes, ValidationError, ValidationMode};
pub use registry::{FactoryContext, GetOptions, RegisterOptions, Registry};
pub use stats::{
	ClientCallCount, ClientSummary, CoordinateCallRecord, RegistryStatistics, RegistryStats,
};
pub use tree::{InstanceTree, ScopedInstance};
