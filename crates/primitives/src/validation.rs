use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::kta::MAX_KTA_DEPTH;

/// How strictly coordinates are checked before they reach a registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationMode {
	/// Accept any key path with at least one token and any scopes.
	#[default]
	Lenient,
	/// Enforce the key path and scope rules on every registration and lookup.
	Strict,
}

impl ValidationMode {
	/// Returns true for [`ValidationMode::Strict`].
	#[inline]
	pub fn is_strict(self) -> bool {
		self == Self::Strict
	}
}

/// Why a key path failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KtaProblem {
	/// The path has no tokens.
	Empty,
	/// The path exceeds [`MAX_KTA_DEPTH`] tokens.
	TooDeep { depth: usize },
	/// The token at `index` is empty.
	EmptyToken { index: usize },
	/// The token at `index` has leading or trailing whitespace.
	PaddedToken { index: usize },
}

impl std::fmt::Display for KtaProblem {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Empty => write!(f, "key path has no tokens"),
			Self::TooDeep { depth } => {
				write!(f, "key path has {depth} tokens (max {MAX_KTA_DEPTH})")
			}
			Self::EmptyToken { index } => write!(f, "token {index} is empty"),
			Self::PaddedToken { index } => write!(f, "token {index} has surrounding whitespace"),
		}
	}
}

/// Why a scope set failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeProblem {
	/// A scope is empty or whitespace.
	EmptyScope,
}

impl std::fmt::Display for ScopeProblem {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::EmptyScope => write!(f, "scope is empty"),
		}
	}
}

/// Coordinate validation failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
	/// The key path breaks the token rules.
	#[error("invalid key type array '{kta}': {reason}")]
	InvalidKta {
		/// Dot-joined offending path.
		kta: String,
		/// The broken rule.
		reason: KtaProblem,
	},
	/// The scope set contains a blank scope.
	#[error("invalid scopes {scopes}: {reason}")]
	InvalidScopes {
		/// Display form of the offending scopes.
		scopes: String,
		/// The broken rule.
		reason: ScopeProblem,
	},
	/// A coordinate failed validation of one of its parts.
	#[error("invalid coordinate '{coordinate}': {source}")]
	InvalidCoordinate {
		/// Display form of the offending coordinate.
		coordinate: String,
		/// The key path or scope failure.
		#[source]
		source: Box<ValidationError>,
	},
}
