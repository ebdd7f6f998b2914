//! Value types shared by the locus registry crates.
//!
//! - [`Kta`]: hierarchical key type array naming a service
//! - [`Scopes`]: normalized set of context qualifiers
//! - [`Coordinate`]: the `(Kta, Scopes)` pair identifying one implementation
//! - [`Client`]: the caller a lookup is attributed to
//! - [`ValidationError`] / [`ValidationMode`]: optional coordinate validation

/// Caller identity for lookup attribution.
pub mod client;
/// Coordinates pairing a key path with a scope set.
pub mod coordinate;
/// Key type arrays.
pub mod kta;
/// Scope sets.
pub mod scope;
/// Coordinate validation rules and errors.
pub mod validation;

pub use client::Client;
pub use coordinate::Coordinate;
pub use kta::{Kta, MAX_KTA_DEPTH};
pub use scope::Scopes;
pub use validation::{ValidationError, ValidationMode};
