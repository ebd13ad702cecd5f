//! Strongly typed identifiers for tenants and the end-users acting through them.
//!
//! A tenant id doubles as the OAuth client id sent in HTTP Basic credentials and as a
//! segment of `:`-delimited cache keys, so it may not contain `:`. User ids only travel
//! inside assertion claims and carry no such restriction.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

const IDENTIFIER_MAX_LEN: usize = 256;

/// Validation rules applied to one identifier kind.
struct IdRules {
	kind: &'static str,
	forbidden: &'static [char],
}
impl IdRules {
	fn check(&self, view: &str) -> Result<(), IdentifierError> {
		let kind = self.kind;

		if view.is_empty() {
			return Err(IdentifierError::Empty { kind });
		}
		if view.chars().any(char::is_whitespace) {
			return Err(IdentifierError::ContainsWhitespace { kind });
		}
		if let Some(found) = view.chars().find(|c| self.forbidden.contains(c)) {
			return Err(IdentifierError::ForbiddenChar { kind, found });
		}
		if view.len() > IDENTIFIER_MAX_LEN {
			return Err(IdentifierError::TooLong { kind, max: IDENTIFIER_MAX_LEN });
		}

		Ok(())
	}
}

macro_rules! def_id {
	($(#[$meta:meta])* $name:ident => $rules:expr) => {
		$(#[$meta])*
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			const RULES: IdRules = $rules;

			/// Validates and wraps `value`.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				Self::try_from(value.as_ref().to_owned())
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				Self::RULES.check(&value).map(|()| Self(value))
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.debug_tuple(stringify!($name)).field(&self.0).finish()
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
	};
}

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier (tenant, user).
		kind: &'static str,
	},
	/// The identifier contains whitespace characters.
	#[error("{kind} identifier contains whitespace.")]
	ContainsWhitespace {
		/// Kind of identifier (tenant, user).
		kind: &'static str,
	},
	/// The identifier contains a character reserved by its wire or key format.
	#[error("{kind} identifier contains the reserved character `{found}`.")]
	ForbiddenChar {
		/// Kind of identifier (tenant, user).
		kind: &'static str,
		/// First reserved character encountered.
		found: char,
	},
	/// The identifier exceeded the allowed byte length.
	#[error("{kind} identifier exceeds {max} bytes.")]
	TooLong {
		/// Kind of identifier (tenant, user).
		kind: &'static str,
		/// Maximum permitted byte length.
		max: usize,
	},
}

def_id! {
	/// Unique tenant identifier; doubles as the tenant's OAuth client id.
	TenantId => IdRules { kind: "Tenant", forbidden: &[':'] }
}
def_id! {
	/// Identifier of an end-user acting through a tenant (the assertion `prn` claim).
	UserId => IdRules { kind: "User", forbidden: &[] }
}
