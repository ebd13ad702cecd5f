//! Scope modeling for token requests and cache keys.

// std
use std::collections::BTreeSet;
// crates.io
use serde::{Deserializer, Serializer, de::Error as DeError, ser::SerializeSeq};
// self
use crate::_prelude::*;

/// Scope requested when the caller does not name any.
pub const DEFAULT_SCOPE: &str = "send_notification";

/// Errors emitted when validating scopes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum ScopeValidationError {
	/// Empty scope entries are not allowed.
	#[error("Scope entries cannot be empty.")]
	Empty,
	/// Scopes cannot contain embedded whitespace characters.
	#[error("Scope contains whitespace: {scope}.")]
	ContainsWhitespace {
		/// The offending scope string.
		scope: String,
	},
	/// Scopes cannot contain the cache-key delimiter.
	#[error("Scope contains a comma: {scope}.")]
	ContainsComma {
		/// The offending scope string.
		scope: String,
	},
}

/// Normalized set of scopes.
///
/// Scopes are deduplicated and sorted so two requests naming the same permissions in a
/// different order resolve to the same token cache entry and the same `scope` form value.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScopeSet(Arc<[String]>);
impl ScopeSet {
	/// Creates a normalized scope set from any iterator.
	pub fn new<I, S>(scopes: I) -> Result<Self, ScopeValidationError>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		normalize(scopes).map(Self)
	}

	/// Number of distinct scopes.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true if no scopes are defined.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Space-delimited form used for the `scope` token request parameter.
	pub fn normalized(&self) -> String {
		self.0.join(" ")
	}

	/// Comma-delimited form used inside token cache keys.
	pub fn cache_segment(&self) -> String {
		self.0.join(",")
	}

	/// Returns the underlying slice of scope strings.
	pub fn as_slice(&self) -> &[String] {
		&self.0
	}
}
impl Debug for ScopeSet {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("ScopeSet").field(&self.0).finish()
	}
}
impl Display for ScopeSet {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.normalized())
	}
}

impl FromStr for ScopeSet {
	type Err = ScopeValidationError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		if s.is_empty() {
			return Ok(Self::default());
		}
		if s.chars().all(char::is_whitespace) {
			return Err(ScopeValidationError::Empty);
		}

		Self::new(s.split_whitespace())
	}
}
impl Serialize for ScopeSet {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let mut seq = serializer.serialize_seq(Some(self.0.len()))?;

		for scope in self.0.iter() {
			seq.serialize_element(scope)?;
		}

		seq.end()
	}
}
impl<'de> Deserialize<'de> for ScopeSet {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		#[derive(Deserialize)]
		#[serde(untagged)]
		enum Repr {
			Delimited(String),
			List(Vec<String>),
		}

		let scopes = match Repr::deserialize(deserializer)? {
			Repr::Delimited(scopes) => scopes.parse(),
			Repr::List(scopes) => ScopeSet::new(scopes),
		};

		scopes.map_err(DeError::custom)
	}
}

fn normalize<I, S>(scopes: I) -> Result<Arc<[String]>, ScopeValidationError>
where
	I: IntoIterator<Item = S>,
	S: Into<String>,
{
	let mut set = BTreeSet::new();

	for scope in scopes {
		let owned: String = scope.into();

		if owned.is_empty() {
			return Err(ScopeValidationError::Empty);
		}
		if owned.chars().any(char::is_whitespace) {
			return Err(ScopeValidationError::ContainsWhitespace { scope: owned });
		}
		if owned.contains(',') {
			return Err(ScopeValidationError::ContainsComma { scope: owned });
		}

		set.insert(owned);
	}

	Ok(Arc::from(set.into_iter().collect::<Vec<_>>()))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn scopes_normalize_regardless_of_order() {
		let lhs = ScopeSet::new(["view_group", "send_notification", "view_group"])
			.expect("Left-hand scope set should be valid.");
		let rhs = ScopeSet::new(["send_notification", "view_group"])
			.expect("Right-hand scope set should be valid.");

		assert_eq!(lhs, rhs);
		assert_eq!(lhs.normalized(), "send_notification view_group");
		assert_eq!(lhs.cache_segment(), "send_notification,view_group");
	}

	#[test]
	fn scopes_reject_whitespace_and_commas() {
		let err = ScopeSet::new([" admin_room "]).expect_err("Padded scopes must be rejected.");

		assert!(matches!(err, ScopeValidationError::ContainsWhitespace { .. }));
		assert!(matches!(
			ScopeSet::new(["a,b"]),
			Err(ScopeValidationError::ContainsComma { .. })
		));
		assert!(ScopeSet::new([""]).is_err());
		assert!(ScopeSet::from_str("").is_ok(), "Empty string represents an empty scope set.");
		assert!(ScopeSet::from_str("   ").is_err(), "Whitespace-only input must be rejected.");
	}

	#[test]
	fn delimited_strings_parse_like_lists() {
		let parsed: ScopeSet = serde_json::from_str("\"view_messages  send_message\"")
			.expect("Space-delimited scopes should deserialize.");
		let listed = ScopeSet::new(["send_message", "view_messages"])
			.expect("Scope list should be valid.");

		assert_eq!(parsed, listed);
		assert_eq!(parsed.len(), 2);
		assert!(serde_json::from_str::<ScopeSet>("\"   \"").is_err());
		assert!(serde_json::from_str::<ScopeSet>("\"\"").is_ok_and(|scopes| scopes.is_empty()));
	}

	#[test]
	fn serde_round_trip_normalizes() {
		let set: ScopeSet = serde_json::from_str("[\"b\",\"a\"]")
			.expect("Scope array should deserialize successfully.");

		assert_eq!(serde_json::to_string(&set).expect("Scope set should serialize."), "[\"a\",\"b\"]");
		assert!(serde_json::from_str::<ScopeSet>("[\"with space\"]").is_err());
	}
}
