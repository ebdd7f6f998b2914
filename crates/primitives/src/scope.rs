use std::fmt;

use crate::validation::{ScopeProblem, ValidationError};

/// A normalized set of scope qualifiers.
///
/// Scopes are sorted and deduplicated on construction, so element order never
/// affects equality, hashing or the display form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Scopes(Vec<String>);

impl Scopes {
	/// Creates a scope set from any iterable of strings.
	pub fn new<I, S>(scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let mut scopes: Vec<String> = scopes.into_iter().map(Into::into).collect();
		scopes.sort_unstable();
		scopes.dedup();
		Self(scopes)
	}

	/// The empty scope set.
	pub const fn none() -> Self {
		Self(Vec::new())
	}

	/// Checks that no scope is blank.
	pub fn validate(&self) -> Result<(), ValidationError> {
		if self.0.iter().any(|s| s.trim().is_empty()) {
			return Err(ValidationError::InvalidScopes {
				scopes: self.to_string(),
				reason: ScopeProblem::EmptyScope,
			});
		}
		Ok(())
	}

	/// Returns true if every scope in `requested` is present in `self`.
	///
	/// The empty set is contained in every set.
	pub fn contains_all(&self, requested: &Scopes) -> bool {
		requested
			.0
			.iter()
			.all(|scope| self.0.binary_search(scope).is_ok())
	}

	/// Returns true if `scope` is part of the set.
	pub fn contains(&self, scope: &str) -> bool {
		self.0.iter().any(|s| s == scope)
	}

	/// Iterates scopes in sorted order.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.0.iter().map(String::as_str)
	}

	/// Returns the sorted scopes.
	pub fn as_slice(&self) -> &[String] {
		&self.0
	}

	/// Returns the number of distinct scopes.
	#[inline]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true for the empty scope set.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl fmt::Display for Scopes {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("[")?;
		for (i, scope) in self.0.iter().enumerate() {
			if i > 0 {
				f.write_str(", ")?;
			}
			f.write_str(scope)?;
		}
		f.write_str("]")
	}
}

impl<S: Into<String>> FromIterator<S> for Scopes {
	fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
		Self::new(iter)
	}
}

impl From<&str> for Scopes {
	fn from(scope: &str) -> Self {
		Self::new([scope])
	}
}

impl From<&[&str]> for Scopes {
	fn from(scopes: &[&str]) -> Self {
		Self::new(scopes.iter().copied())
	}
}

impl<const N: usize> From<[&str; N]> for Scopes {
	fn from(scopes: [&str; N]) -> Self {
		Self::new(scopes)
	}
}

impl From<Vec<String>> for Scopes {
	fn from(scopes: Vec<String>) -> Self {
		Self::new(scopes)
	}
}
