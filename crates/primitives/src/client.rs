use std::fmt;

use crate::coordinate::Coordinate;

/// The caller a registry lookup is attributed to.
///
/// A missing client (`Option::None` at call sites) counts as unidentified.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Client {
	/// Application code outside any registered service.
	Application(String),
	/// A registered service resolving one of its dependencies.
	Service {
		/// Type of the registry the calling service lives in.
		registry_type: String,
		/// Coordinate of the calling service.
		coordinate: Coordinate,
	},
}

impl Client {
	/// Creates an application client.
	pub fn application(name: impl Into<String>) -> Self {
		Self::Application(name.into())
	}

	/// Creates a service client.
	pub fn service(registry_type: impl Into<String>, coordinate: Coordinate) -> Self {
		Self::Service {
			registry_type: registry_type.into(),
			coordinate,
		}
	}

	/// Returns true for service callers.
	pub fn is_service(&self) -> bool {
		matches!(self, Self::Service { .. })
	}
}

/// Serialized form: `app:<name>` or `service:<registry_type>:<coordinate>`.
impl fmt::Display for Client {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Application(name) => write!(f, "app:{name}"),
			Self::Service {
				registry_type,
				coordinate,
			} => write!(f, "service:{registry_type}:{coordinate}"),
		}
	}
}

impl From<&str> for Client {
	fn from(name: &str) -> Self {
		Self::application(name)
	}
}

impl From<String> for Client {
	fn from(name: String) -> Self {
		Self::Application(name)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn serialized_forms() {
		assert_eq!(Client::from("cli").to_string(), "app:cli");
		let svc = Client::service("users", Coordinate::new(["user", "repo"], ["prod"]));
		assert_eq!(svc.to_string(), "service:users:user.repo [prod]");
		assert!(svc.is_service());
	}
}
