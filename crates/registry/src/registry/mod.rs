//! Per-domain service registry.
//!
//! A [`Registry`] stores [`Instance`]s in an [`InstanceTree`] keyed by key
//! path and resolves them by scope containment.
//!
//! # Resolution
//!
//! `get` follows the key path token by token. An empty scope request returns
//! the first instance registered at the path. A scoped request returns the
//! first instance (in registration order) whose scopes contain every
//! requested scope, so a narrower registration made earlier wins over a wider
//! one made later for any request both satisfy.
//!
//! # Locking
//!
//! The tree sits behind one `RwLock`: registrations take the write lock,
//! lookups and coordinate walks take the read lock. Factories run with no
//! lock held and may resolve other services through the same registry.

use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

use locus_primitives::{Client, Coordinate, Kta, Scopes};
use parking_lot::RwLock;
use tracing::{debug, trace, warn};

use crate::config::RegistryConfig;
use crate::error::{RegistryError, Result};
use crate::hub::RegistryHub;
use crate::instance::Instance;
use crate::stats::{RegistryStatistics, RegistryStats};
use crate::tree::{InsertOutcome, InstanceTree};


/// Options for [`Registry::get`].
#[derive(Debug, Clone, Default)]
pub struct GetOptions {
	/// Scopes the resolved instance must carry.
	pub scopes: Scopes,
	/// Caller the lookup is attributed to in statistics.
	pub client: Option<Client>,
}

impl GetOptions {
	/// Unscoped, unattributed lookup.
	pub fn new() -> Self {
		Self::default()
	}

	/// Lookup narrowed to `scopes`.
	pub fn scoped(scopes: impl Into<Scopes>) -> Self {
		Self {
			scopes: scopes.into(),
			client: None,
		}
	}

	/// Sets the required scopes.
	pub fn with_scopes(mut self, scopes: impl Into<Scopes>) -> Self {
		self.scopes = scopes.into();
		self
	}

	/// Attributes the lookup to `client`.
	pub fn with_client(mut self, client: impl Into<Client>) -> Self {
		self.client = Some(client.into());
		self
	}
}

/// Options for [`Registry::register`].
#[derive(Debug, Clone, Default)]
pub struct RegisterOptions {
	/// Scopes to register under. Defaults to the instance's own scopes.
	pub scopes: Option<Scopes>,
}

impl RegisterOptions {
	/// Registers under `scopes` instead of the instance's scopes.
	pub fn scoped(scopes: impl Into<Scopes>) -> Self {
		Self {
			scopes: Some(scopes.into()),
		}
	}
}

/// What a factory sees while building an instance.
pub struct FactoryContext<'a> {
	registry: &'a Arc<Registry>,
	hub: Option<Arc<RegistryHub>>,
	coordinate: &'a Coordinate,
}

impl<'a> FactoryContext<'a> {
	/// The registry the instance will be registered in.
	pub fn registry(&self) -> &'a Arc<Registry> {
		self.registry
	}

	/// The hub the registry is affiliated with, if any.
	pub fn hub(&self) -> Option<&Arc<RegistryHub>> {
		self.hub.as_ref()
	}

	/// The coordinate being built.
	pub fn coordinate(&self) -> &'a Coordinate {
		self.coordinate
	}

	/// Client identity for lookups this service makes while wiring itself.
	pub fn client(&self) -> Client {
		Client::service(self.registry.registry_type(), self.coordinate.clone())
	}

	/// Builds the instance for this context's coordinate.
	pub fn instance<T: std::any::Any + Send + Sync>(&self, payload: T) -> Instance {
		Instance::new(self.coordinate.clone(), self.registry, payload)
	}
}

/// Registry of service instances for one domain.
pub struct Registry {
	registry_type: String,
	config: RegistryConfig,
	tree: RwLock<InstanceTree>,
	stats: Option<RegistryStats>,
	hub: OnceLock<Weak<RegistryHub>>,
}

impl Registry {
	/// Creates a registry with the default configuration.
	pub fn new(registry_type: impl Into<String>) -> Result<Arc<Self>> {
		Self::with_config(registry_type, RegistryConfig::default())
	}

	/// Creates a registry with an explicit configuration.
	///
	/// Fails with [`RegistryError::RegistryCreation`] for a blank type.
	pub fn with_config(registry_type: impl Into<String>, config: RegistryConfig) -> Result<Arc<Self>> {
		let registry_type = registry_type.into();
		if registry_type.trim().is_empty() {
			return Err(RegistryError::RegistryCreation {
				registry_type,
				reason: "registry type must not be empty".into(),
			});
		}

		debug!(registry = %registry_type, ?config, "created registry");
		Ok(Arc::new(Self {
			registry_type,
			config,
			tree: RwLock::new(InstanceTree::new()),
			stats: config.record_statistics.then(RegistryStats::new),
			hub: OnceLock::new(),
		}))
	}

	/// Returns the registry type this registry is known by in a hub.
	pub fn registry_type(&self) -> &str {
		&self.registry_type
	}

	/// Returns the configuration.
	pub fn config(&self) -> &RegistryConfig {
		&self.config
	}

	/// Returns the hub this registry is affiliated with, if it is alive.
	pub fn hub(&self) -> Option<Arc<RegistryHub>> {
		self.hub.get().and_then(Weak::upgrade)
	}

	/// Returns true once the registry has joined a hub.
	pub fn is_affiliated(&self) -> bool {
		self.hub.get().is_some()
	}

	/// Records the hub back-reference. Only the first call has any effect.
	pub(crate) fn affiliate(&self, hub: &Arc<RegistryHub>) -> bool {
		self.hub.set(Arc::downgrade(hub)).is_ok()
	}

	/// Builds an instance with `factory` and registers it atomically.
	///
	/// The factory runs exactly once, without any registry lock held. Its
	/// result must be owned by this registry and carry the requested
	/// coordinate, otherwise [`RegistryError::InvalidFactoryResult`] is
	/// returned and nothing is registered.
	pub fn create_instance<F>(
		self: &Arc<Self>,
		kta: impl Into<Kta>,
		scopes: impl Into<Scopes>,
		factory: F,
	) -> Result<Instance>
	where
		F: FnOnce(&Coordinate, &FactoryContext<'_>) -> Result<Instance>,
	{
		let coordinate = Coordinate::new(kta, scopes);
		self.check_coordinate(&coordinate)?;

		let ctx = FactoryContext {
			registry: self,
			hub: self.hub(),
			coordinate: &coordinate,
		};
		let instance = factory(&coordinate, &ctx)?;

		if !instance.belongs_to(self) {
			return Err(RegistryError::InvalidFactoryResult {
				kta: coordinate.kta().clone(),
				reason: format!(
					"instance is not owned by registry '{}'",
					self.registry_type
				),
			});
		}
		if instance.coordinate() != &coordinate {
			return Err(RegistryError::InvalidFactoryResult {
				kta: coordinate.kta().clone(),
				reason: format!(
					"instance coordinate '{}' does not match requested '{}'",
					instance.coordinate(),
					coordinate
				),
			});
		}

		self.insert(coordinate.kta(), coordinate.scopes().clone(), instance.clone());
		Ok(instance)
	}

	/// Registers a pre-built instance at `kta`.
	///
	/// The instance must be owned by this registry and its coordinate must
	/// name the same key path.
	pub fn register(
		&self,
		kta: impl Into<Kta>,
		instance: Instance,
		options: RegisterOptions,
	) -> Result<()> {
		let kta = kta.into();

		if !instance.belongs_to(self) {
			let reason = match instance.registry() {
				Some(owner) => format!(
					"instance is owned by registry '{}', not '{}'",
					owner.registry_type(),
					self.registry_type
				),
				None => "owning registry has been dropped".to_owned(),
			};
			return Err(RegistryError::InvalidInstanceRegistration { kta, reason });
		}
		if instance.coordinate().kta() != &kta {
			return Err(RegistryError::InvalidInstanceRegistration {
				reason: format!(
					"instance coordinate '{}' names a different key path",
					instance.coordinate()
				),
				kta,
			});
		}

		let scopes = options
			.scopes
			.unwrap_or_else(|| instance.coordinate().scopes().clone());
		self.check_coordinate(&Coordinate::new(kta.clone(), scopes.clone()))?;
		self.insert(&kta, scopes, instance);
		Ok(())
	}

	fn insert(&self, kta: &Kta, scopes: Scopes, instance: Instance) {
		let outcome = self.tree.write().insert(kta, scopes.clone(), instance);
		if outcome == InsertOutcome::Shadowed {
			warn!(
				registry = %self.registry_type,
				kta = %kta,
				scopes = %scopes,
				"registration shadowed by an earlier entry with identical scopes",
			);
		}
		debug!(registry = %self.registry_type, kta = %kta, scopes = %scopes, "registered instance");
	}

	/// Resolves the instance at `kta` matching `options.scopes`.
	///
	/// Successful lookups are counted when statistics are enabled.
	pub fn get(&self, kta: impl Into<Kta>, options: GetOptions) -> Result<Instance> {
		let kta = kta.into();
		self.check_path(&kta)?;
		if self.config.validation.is_strict() {
			options.scopes.validate()?;
		}

		let instance = self
			.tree
			.read()
			.resolve(&kta, &options.scopes)
			.cloned()
			.map_err(|miss| miss.into_error(&self.registry_type, &kta, &options.scopes))?;

		trace!(
			registry = %self.registry_type,
			kta = %kta,
			scopes = %options.scopes,
			resolved = %instance.coordinate(),
			"resolved instance",
		);

		if let Some(stats) = &self.stats {
			stats.record_get_call(&kta, &options.scopes, options.client.as_ref());
		}
		Ok(instance)
	}

	/// Returns the coordinate of every registered instance.
	pub fn get_coordinates(&self) -> Vec<Coordinate> {
		self.tree.read().coordinates()
	}

	/// Returns a snapshot of lookup statistics.
	///
	/// Empty when statistics recording is disabled.
	pub fn get_statistics(&self) -> RegistryStatistics {
		self.stats
			.as_ref()
			.map(RegistryStats::get_statistics)
			.unwrap_or_default()
	}

	/// Returns the stats tracker for read-through queries.
	pub fn stats(&self) -> Option<&RegistryStats> {
		self.stats.as_ref()
	}

	/// Returns the number of registered instances.
	pub fn len(&self) -> usize {
		self.tree.read().len()
	}

	/// Returns true if nothing has been registered.
	pub fn is_empty(&self) -> bool {
		self.tree.read().is_empty()
	}

	/// An empty path can never be traversed; strict mode checks every rule.
	fn check_path(&self, kta: &Kta) -> Result<()> {
		if kta.is_empty() || self.config.validation.is_strict() {
			kta.validate()?;
		}
		Ok(())
	}

	fn check_coordinate(&self, coordinate: &Coordinate) -> Result<()> {
		if self.config.validation.is_strict() {
			coordinate.validate()?;
		} else {
			self.check_path(coordinate.kta())?;
		}
		Ok(())
	}
}

impl fmt::Debug for Registry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Registry")
			.field("registry_type", &self.registry_type)
			.field("config", &self.config)
			.field("instances", &self.len())
			.field("affiliated", &self.is_affiliated())
			.finish()
	}
}
