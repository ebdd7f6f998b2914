//! Directory federating named registries.
//!
//! The hub maps a registry type to one [`Registry`] and stamps each member
//! with a back-reference so services can reach sibling registries. Lookups
//! through [`RegistryHub::get`] delegate to the member registry unchanged.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use locus_primitives::{Coordinate, Kta};
use parking_lot::RwLock;
use rustc_hash::FxBuildHasher;
use tracing::{debug, warn};

use crate::config::RegistryConfig;
use crate::error::{RegistryError, Result};
use crate::instance::Instance;
use crate::registry::{GetOptions, Registry};
use crate::stats::RegistryStatistics;

#[cfg(test)]
mod tests;

type Directory = IndexMap<String, Arc<Registry>, FxBuildHasher>;

/// A coordinate tagged with the type of the registry holding it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HubCoordinate {
	/// Type of the registry the instance lives in.
	pub registry_type: String,
	/// The instance's coordinate.
	pub coordinate: Coordinate,
}

/// Directory of registries keyed by registry type.
pub struct RegistryHub {
	config: RegistryConfig,
	registries: RwLock<Directory>,
}

impl RegistryHub {
	/// Creates an empty hub.
	pub fn new() -> Arc<Self> {
		Self::with_config(RegistryConfig::default())
	}

	/// Creates an empty hub whose factories should build registries with
	/// `config`.
	pub fn with_config(config: RegistryConfig) -> Arc<Self> {
		Arc::new(Self {
			config,
			registries: RwLock::new(Directory::default()),
		})
	}

	/// Configuration factories should pass to [`Registry::with_config`].
	pub fn registry_config(&self) -> RegistryConfig {
		self.config
	}

	/// Builds a registry with `factory` and adds it to the directory.
	///
	/// The factory runs without the directory lock held. It must return a
	/// registry of the requested type.
	pub fn create_registry<F>(
		self: &Arc<Self>,
		registry_type: impl Into<String>,
		factory: F,
	) -> Result<Arc<Registry>>
	where
		F: FnOnce(&str, &Arc<RegistryHub>) -> Result<Arc<Registry>>,
	{
		let registry_type = registry_type.into();
		if self.registries.read().contains_key(&registry_type) {
			return Err(RegistryError::DuplicateRegistryType { registry_type });
		}

		let registry = factory(&registry_type, self).map_err(|source| {
			RegistryError::RegistryFactory {
				registry_type: registry_type.clone(),
				source: Box::new(source),
			}
		})?;

		if registry.registry_type() != registry_type {
			return Err(RegistryError::InvalidRegistryFactoryResult {
				actual: registry.registry_type().to_owned(),
				registry_type,
			});
		}

		self.insert(Arc::clone(&registry))?;
		Ok(registry)
	}

	/// Adds an existing registry under its own type.
	pub fn register_registry(self: &Arc<Self>, registry: Arc<Registry>) -> Result<()> {
		self.insert(registry)
	}

	fn insert(self: &Arc<Self>, registry: Arc<Registry>) -> Result<()> {
		let mut registries = self.registries.write();
		let registry_type = registry.registry_type().to_owned();
		if registries.contains_key(&registry_type) {
			return Err(RegistryError::DuplicateRegistryType { registry_type });
		}

		if !registry.affiliate(self) {
			let same_hub = registry
				.hub()
				.is_some_and(|existing| Arc::ptr_eq(&existing, self));
			if !same_hub {
				warn!(
					registry = %registry_type,
					"registry already belongs to another hub; keeping its original back-reference",
				);
			}
		}

		debug!(registry = %registry_type, "registered registry in hub");
		registries.insert(registry_type, registry);
		Ok(())
	}

	/// Resolves `kta` in the registry of type `registry_type`.
	///
	/// Errors from the member registry propagate unchanged.
	pub fn get(
		&self,
		registry_type: &str,
		kta: impl Into<Kta>,
		options: GetOptions,
	) -> Result<Instance> {
		let registry =
			self.get_registry(registry_type)
				.ok_or_else(|| RegistryError::RegistryTypeNotFound {
					registry_type: registry_type.to_owned(),
					available: self.get_registered_types(),
				})?;
		registry.get(kta, options)
	}

	/// Returns the registry of type `registry_type`.
	pub fn get_registry(&self, registry_type: &str) -> Option<Arc<Registry>> {
		self.registries.read().get(registry_type).cloned()
	}

	/// Returns every registered type in registration order.
	pub fn get_registered_types(&self) -> Vec<String> {
		self.registries.read().keys().cloned().collect()
	}

	/// Removes a registry from the directory. Returns whether it was present.
	///
	/// The registry itself is left untouched, including its hub back-reference.
	pub fn unregister_registry(&self, registry_type: &str) -> bool {
		let removed = self.registries.write().shift_remove(registry_type).is_some();
		if removed {
			debug!(registry = %registry_type, "unregistered registry from hub");
		}
		removed
	}

	fn members(&self) -> Vec<Arc<Registry>> {
		self.registries.read().values().cloned().collect()
	}

	/// Collects the coordinates of every member registry.
	pub fn get_all_coordinates(&self) -> Vec<HubCoordinate> {
		self.members()
			.iter()
			.flat_map(|registry| {
				let registry_type = registry.registry_type().to_owned();
				registry
					.get_coordinates()
					.into_iter()
					.map(move |coordinate| HubCoordinate {
						registry_type: registry_type.clone(),
						coordinate,
					})
			})
			.collect()
	}

	/// Returns a statistics snapshot per member registry.
	pub fn get_all_statistics(&self) -> Vec<(String, RegistryStatistics)> {
		self.members()
			.iter()
			.map(|registry| (registry.registry_type().to_owned(), registry.get_statistics()))
			.collect()
	}

	/// Returns the number of registries in the directory.
	pub fn len(&self) -> usize {
		self.registries.read().len()
	}

	/// Returns true if the directory is empty.
	pub fn is_empty(&self) -> bool {
		self.registries.read().is_empty()
	}
}

impl fmt::Debug for RegistryHub {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RegistryHub")
			.field("config", &self.config)
			.field("registries", &self.get_registered_types())
			.finish()
	}
}
