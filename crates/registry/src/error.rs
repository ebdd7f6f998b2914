//! Registry and hub failure taxonomy.

use locus_primitives::{Kta, Scopes, ValidationError};
use thiserror::Error;

/// Result alias for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Failures raised by [`Registry`](crate::Registry) and
/// [`RegistryHub`](crate::RegistryHub).
///
/// Every variant describes a wiring defect; none are retried or recovered
/// internally and all propagate unchanged through the hub.
#[derive(Error, Debug)]
pub enum RegistryError {
	/// A registry could not be constructed.
	#[error("cannot create registry '{registry_type}': {reason}")]
	RegistryCreation {
		registry_type: String,
		reason: String,
	},
	/// A factory returned an instance that does not match its request.
	#[error("factory for '{kta}' returned an invalid instance: {reason}")]
	InvalidFactoryResult { kta: Kta, reason: String },
	/// A pre-built instance cannot be registered here.
	#[error("cannot register instance at '{kta}': {reason}")]
	InvalidInstanceRegistration { kta: Kta, reason: String },
	/// A key path or scope set failed validation.
	#[error(transparent)]
	Validation(#[from] ValidationError),

	/// A path segment is missing from an existing subtree.
	#[error("no instance found for '{kta}': segment '{segment}' is not registered")]
	InstanceNotFound { kta: Kta, segment: String },
	/// The path exists but nothing was registered exactly at it.
	#[error("no instances registered at '{kta}'")]
	NoInstancesRegistered { kta: Kta },
	/// The registry holds no instances at all.
	#[error("no instances available in registry '{registry_type}' for '{kta}'")]
	NoInstancesAvailable { registry_type: String, kta: Kta },
	/// No instance at the path carries every requested scope.
	#[error(
		"no instance at '{kta}' matches scopes {requested}; available: [{}]",
		join_scopes(.available)
	)]
	ScopeNotFound {
		kta: Kta,
		requested: Scopes,
		available: Vec<Scopes>,
	},
	/// An intermediate segment has no child subtree to descend into.
	#[error("no children available under segment '{segment}' while resolving '{kta}'")]
	NoChildrenAvailable { kta: Kta, segment: String },

	/// A hub already holds a registry of this type.
	#[error("registry type '{registry_type}' is already registered")]
	DuplicateRegistryType { registry_type: String },
	/// The hub holds no registry of this type.
	#[error(
		"registry type '{registry_type}' not found; available: [{}]",
		.available.join(", ")
	)]
	RegistryTypeNotFound {
		registry_type: String,
		available: Vec<String>,
	},
	/// A registry factory failed.
	#[error("registry factory for '{registry_type}' failed: {source}")]
	RegistryFactory {
		registry_type: String,
		#[source]
		source: Box<RegistryError>,
	},
	/// A registry factory returned a registry of the wrong type.
	#[error("registry factory for '{registry_type}' returned a registry of type '{actual}'")]
	InvalidRegistryFactoryResult {
		registry_type: String,
		actual: String,
	},
}

/// Fieldless category of a [`RegistryError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	RegistryCreation,
	InvalidFactoryResult,
	InvalidInstanceRegistration,
	InvalidCoordinate,
	InvalidKta,
	InvalidScopes,
	InstanceNotFound,
	NoInstancesRegistered,
	NoInstancesAvailable,
	ScopeNotFound,
	NoChildrenAvailable,
	DuplicateRegistryType,
	RegistryTypeNotFound,
	RegistryFactory,
	InvalidRegistryFactoryResult,
}

impl RegistryError {
	/// Returns the category of this error.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::RegistryCreation { .. } => ErrorKind::RegistryCreation,
			Self::InvalidFactoryResult { .. } => ErrorKind::InvalidFactoryResult,
			Self::InvalidInstanceRegistration { .. } => ErrorKind::InvalidInstanceRegistration,
			Self::Validation(ValidationError::InvalidCoordinate { .. }) => {
				ErrorKind::InvalidCoordinate
			}
			Self::Validation(ValidationError::InvalidKta { .. }) => ErrorKind::InvalidKta,
			Self::Validation(ValidationError::InvalidScopes { .. }) => ErrorKind::InvalidScopes,
			Self::InstanceNotFound { .. } => ErrorKind::InstanceNotFound,
			Self::NoInstancesRegistered { .. } => ErrorKind::NoInstancesRegistered,
			Self::NoInstancesAvailable { .. } => ErrorKind::NoInstancesAvailable,
			Self::ScopeNotFound { .. } => ErrorKind::ScopeNotFound,
			Self::NoChildrenAvailable { .. } => ErrorKind::NoChildrenAvailable,
			Self::DuplicateRegistryType { .. } => ErrorKind::DuplicateRegistryType,
			Self::RegistryTypeNotFound { .. } => ErrorKind::RegistryTypeNotFound,
			Self::RegistryFactory { .. } => ErrorKind::RegistryFactory,
			Self::InvalidRegistryFactoryResult { .. } => ErrorKind::InvalidRegistryFactoryResult,
		}
	}

	/// Returns the key path a resolution or registration failure refers to.
	pub fn kta(&self) -> Option<&Kta> {
		match self {
			Self::InvalidFactoryResult { kta, .. }
			| Self::InvalidInstanceRegistration { kta, .. }
			| Self::InstanceNotFound { kta, .. }
			| Self::NoInstancesRegistered { kta }
			| Self::NoInstancesAvailable { kta, .. }
			| Self::ScopeNotFound { kta, .. }
			| Self::NoChildrenAvailable { kta, .. } => Some(kta),
			_ => None,
		}
	}
}

fn join_scopes(scopes: &[Scopes]) -> String {
	scopes
		.iter()
		.map(ToString::to_string)
		.collect::<Vec<_>>()
		.join(", ")
}
