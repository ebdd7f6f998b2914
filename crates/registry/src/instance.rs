//! Registered service instances.

use std::any::Any;
use std::fmt;
use std::sync::{Arc, Weak};

use locus_primitives::{Client, Coordinate};

use crate::hub::RegistryHub;
use crate::registry::Registry;

/// Opaque service object carried by an [`Instance`].
pub type Payload = Arc<dyn Any + Send + Sync>;

/// A realized service: its coordinate, its owning registry and its payload.
///
/// The registry reference is weak; an instance never keeps its registry
/// alive. Cloning is cheap and shares the payload.
#[derive(Clone)]
pub struct Instance {
	coordinate: Coordinate,
	registry: Weak<Registry>,
	payload: Payload,
}

impl Instance {
	/// Creates an instance owned by `registry`.
	pub fn new<T: Any + Send + Sync>(
		coordinate: Coordinate,
		registry: &Arc<Registry>,
		payload: T,
	) -> Self {
		Self::from_payload(coordinate, registry, Arc::new(payload))
	}

	/// Creates an instance around an already shared payload.
	pub fn from_payload(coordinate: Coordinate, registry: &Arc<Registry>, payload: Payload) -> Self {
		Self {
			coordinate,
			registry: Arc::downgrade(registry),
			payload,
		}
	}

	/// Returns the coordinate this instance was created for.
	pub fn coordinate(&self) -> &Coordinate {
		&self.coordinate
	}

	/// Returns the owning registry if it is still alive.
	pub fn registry(&self) -> Option<Arc<Registry>> {
		self.registry.upgrade()
	}

	/// Returns true if `registry` owns this instance.
	pub fn belongs_to(&self, registry: &Registry) -> bool {
		std::ptr::eq(self.registry.as_ptr(), registry)
	}

	/// Returns the hub the owning registry is affiliated with.
	pub fn hub(&self) -> Option<Arc<RegistryHub>> {
		self.registry().and_then(|r| r.hub())
	}

	/// Returns the client identity to attribute lookups made by this service.
	pub fn as_client(&self) -> Option<Client> {
		self.registry()
			.map(|r| Client::service(r.registry_type(), self.coordinate.clone()))
	}

	/// Returns the shared payload.
	pub fn payload(&self) -> &Payload {
		&self.payload
	}

	/// Borrows the payload as `T`.
	pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
		self.payload.downcast_ref::<T>()
	}

	/// Returns a shared handle to the payload as `T`.
	pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
		Arc::clone(&self.payload).downcast::<T>().ok()
	}

	/// Returns true if both handles share one payload.
	pub fn ptr_eq(&self, other: &Instance) -> bool {
		Arc::ptr_eq(&self.payload, &other.payload)
	}
}

impl fmt::Debug for Instance {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Instance")
			.field("coordinate", &self.coordinate.to_string())
			.field(
				"registry",
				&self.registry().map(|r| r.registry_type().to_owned()),
			)
			.finish_non_exhaustive()
	}
}
