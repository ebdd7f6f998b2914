use std::fmt;

use smallvec::SmallVec;

use crate::validation::{KtaProblem, ValidationError};

/// Maximum number of tokens a valid [`Kta`] may carry.
pub const MAX_KTA_DEPTH: usize = 6;

/// Key type array: the ordered token path naming a service.
///
/// Construction never validates; use [`Kta::validate`] or [`Kta::parse`] when
/// the caller wants the 1..=6 non-empty token rule enforced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Kta(SmallVec<[String; MAX_KTA_DEPTH]>);

impl Kta {
	/// Creates a key path from tokens without validating them.
	pub fn new<I, S>(tokens: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self(tokens.into_iter().map(Into::into).collect())
	}

	/// Creates a key path and validates it.
	pub fn parse<I, S>(tokens: I) -> Result<Self, ValidationError>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let kta = Self::new(tokens);
		kta.validate()?;
		Ok(kta)
	}

	/// Checks the token count and that no token is blank or padded.
	pub fn validate(&self) -> Result<(), ValidationError> {
		let problem = if self.0.is_empty() {
			Some(KtaProblem::Empty)
		} else if self.0.len() > MAX_KTA_DEPTH {
			Some(KtaProblem::TooDeep { depth: self.0.len() })
		} else {
			self.0.iter().enumerate().find_map(|(index, token)| {
				if token.is_empty() {
					Some(KtaProblem::EmptyToken { index })
				} else if token.trim() != token {
					Some(KtaProblem::PaddedToken { index })
				} else {
					None
				}
			})
		};

		match problem {
			Some(reason) => Err(ValidationError::InvalidKta {
				kta: self.to_string(),
				reason,
			}),
			None => Ok(()),
		}
	}

	/// Returns the tokens in path order.
	pub fn tokens(&self) -> &[String] {
		&self.0
	}

	/// Iterates tokens as string slices.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.0.iter().map(String::as_str)
	}

	/// Returns the number of tokens.
	#[inline]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true if the path has no tokens.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Returns the path truncated to its first `depth` tokens.
	pub fn prefix(&self, depth: usize) -> Kta {
		Self(self.0.iter().take(depth).cloned().collect())
	}
}

impl fmt::Display for Kta {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (i, token) in self.0.iter().enumerate() {
			if i > 0 {
				f.write_str(".")?;
			}
			f.write_str(token)?;
		}
		Ok(())
	}
}

impl From<&str> for Kta {
	fn from(token: &str) -> Self {
		Self::new([token])
	}
}

impl From<String> for Kta {
	fn from(token: String) -> Self {
		Self::new([token])
	}
}

impl From<&[&str]> for Kta {
	fn from(tokens: &[&str]) -> Self {
		Self::new(tokens.iter().copied())
	}
}

impl<const N: usize> From<[&str; N]> for Kta {
	fn from(tokens: [&str; N]) -> Self {
		Self::new(tokens)
	}
}

impl From<Vec<String>> for Kta {
	fn from(tokens: Vec<String>) -> Self {
		Self::new(tokens)
	}
}

impl<'a> IntoIterator for &'a Kta {
	type Item = &'a String;
	type IntoIter = std::slice::Iter<'a, String>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}
