use std::fmt;

use crate::kta::Kta;
use crate::scope::Scopes;
use crate::validation::ValidationError;

/// Identifies one registered implementation: a key path plus its scopes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coordinate {
	kta: Kta,
	scopes: Scopes,
}

impl Coordinate {
	/// Creates a coordinate without validating its parts.
	pub fn new(kta: impl Into<Kta>, scopes: impl Into<Scopes>) -> Self {
		Self {
			kta: kta.into(),
			scopes: scopes.into(),
		}
	}

	/// Creates a coordinate and validates both parts.
	pub fn try_new(kta: impl Into<Kta>, scopes: impl Into<Scopes>) -> Result<Self, ValidationError> {
		let coordinate = Self::new(kta, scopes);
		coordinate.validate()?;
		Ok(coordinate)
	}

	/// Validates the key path and scopes, wrapping the first failure.
	pub fn validate(&self) -> Result<(), ValidationError> {
		self.kta
			.validate()
			.and_then(|()| self.scopes.validate())
			.map_err(|source| ValidationError::InvalidCoordinate {
				coordinate: self.to_string(),
				source: Box::new(source),
			})
	}

	/// Returns the key path.
	pub fn kta(&self) -> &Kta {
		&self.kta
	}

	/// Returns the scope set.
	pub fn scopes(&self) -> &Scopes {
		&self.scopes
	}
}

impl fmt::Display for Coordinate {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.scopes.is_empty() {
			write!(f, "{}", self.kta)
		} else {
			write!(f, "{} {}", self.kta, self.scopes)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn display_is_deterministic() {
		let a = Coordinate::new(["auth", "session"], ["prod", "eu"]);
		let b = Coordinate::new(["auth", "session"], ["eu", "prod"]);
		assert_eq!(a, b);
		assert_eq!(a.to_string(), "auth.session [eu, prod]");
		assert_eq!(Coordinate::new("auth", Scopes::none()).to_string(), "auth");
	}

	#[test]
	fn try_new_wraps_part_failures() {
		let err = Coordinate::try_new(["auth", ""], ["prod"]).unwrap_err();
		match err {
			ValidationError::InvalidCoordinate { coordinate, source } => {
				assert_eq!(coordinate, "auth. [prod]");
				assert!(matches!(*source, ValidationError::InvalidKta { .. }));
			}
			other => panic!("expected InvalidCoordinate, got {other:?}"),
		}

		let err = Coordinate::try_new("auth", ["prod", ""]).unwrap_err();
		assert!(matches!(
			err,
			ValidationError::InvalidCoordinate { ref source, .. }
				if matches!(**source, ValidationError::InvalidScopes { .. })
		));
	}
}
