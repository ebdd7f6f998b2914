//! Registry configuration.
//!
//! Configuration is plain TOML with kebab-case keys; every key is optional:
//!
//! ```toml
//! validation = "strict"      # or "lenient" (default)
//! record-statistics = true   # default
//! ```

use std::path::{Path, PathBuf};

use locus_primitives::ValidationMode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// Error parsing TOML syntax or an unknown value.
	#[error("TOML parse error: {0}")]
	Parse(#[from] toml::de::Error),
}

/// Per-registry behavior switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct RegistryConfig {
	/// Whether key paths and scopes are validated on registration and lookup.
	pub validation: ValidationMode,
	/// Whether successful lookups are counted by a stats tracker.
	pub record_statistics: bool,
}

impl Default for RegistryConfig {
	fn default() -> Self {
		Self {
			validation: ValidationMode::Lenient,
			record_statistics: true,
		}
	}
}

impl RegistryConfig {
	/// Returns a config with strict validation and statistics enabled.
	pub fn strict() -> Self {
		Self {
			validation: ValidationMode::Strict,
			..Self::default()
		}
	}

	/// Sets the validation mode.
	pub fn with_validation(mut self, validation: ValidationMode) -> Self {
		self.validation = validation;
		self
	}

	/// Enables or disables statistics recording.
	pub fn with_statistics(mut self, record: bool) -> Self {
		self.record_statistics = record;
		self
	}

	/// Parses configuration from a TOML string.
	pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(input)?)
	}

	/// Reads and parses a TOML configuration file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let input = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::from_toml_str(&input)
	}
}
