//! Persisted map form of [`Tenant`].

// crates.io
use serde::{Deserializer, de::Error as DeError};
// self
use crate::{_prelude::*, tenant::Tenant};

/// Keys of the persisted tenant map, in serialization order.
pub const RECORD_KEYS: [&str; 8] = [
	"id",
	"secret",
	"room_id",
	"group_id",
	"group_name",
	"homepage",
	"token_url",
	"capabilities_url",
];

const RESERVED_KEY_PREFIX: char = '_';

impl Tenant {
	/// Flat map holding every persisted attribute; absent values are kept as `null`.
	pub fn to_map(&self) -> JsonMap<String, JsonValue> {
		let mut map = JsonMap::with_capacity(RECORD_KEYS.len());
		let opt = |value: &Option<String>| value.clone().map_or(JsonValue::Null, JsonValue::String);

		map.insert("id".into(), JsonValue::String(self.id.to_string()));
		map.insert(
			"secret".into(),
			self.secret
				.as_ref()
				.map_or(JsonValue::Null, |secret| JsonValue::String(secret.expose().to_owned())),
		);
		map.insert("room_id".into(), opt(&self.room_id));
		map.insert("group_id".into(), opt(&self.group_id));
		map.insert("group_name".into(), opt(&self.group_name));
		map.insert("homepage".into(), opt(&self.homepage));
		map.insert("token_url".into(), opt(&self.token_url));
		map.insert("capabilities_url".into(), opt(&self.capabilities_url));

		map
	}

	/// Rebuilds a tenant from a stored map.
	///
	/// Keys starting with `_` are dropped first. Missing `id`, an invalid id, wrongly typed
	/// values, or unknown keys yield [`Error::InvalidRecord`].
	pub fn from_map(map: &JsonMap<String, JsonValue>) -> Result<Self> {
		let filtered = map
			.iter()
			.filter(|(key, _)| !key.starts_with(RESERVED_KEY_PREFIX))
			.map(|(key, value)| (key.clone(), value.clone()))
			.collect::<JsonMap<_, _>>();

		serde_path_to_error::deserialize(JsonValue::Object(filtered)).map_err(|e| {
			let path = e.path().to_string();
			let inner = e.into_inner();

			Error::InvalidRecord {
				reason: if path == "." { inner.to_string() } else { format!("{path}: {inner}") },
			}
		})
	}

	/// Rebuilds a tenant from any stored JSON value, which must be an object.
	pub fn from_value(value: &JsonValue) -> Result<Self> {
		match value {
			JsonValue::Object(map) => Self::from_map(map),
			_ => Err(Error::InvalidRecord { reason: "stored tenant is not an object".into() }),
		}
	}
}

/// Accepts strings and numbers, normalizing numbers to their decimal text.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
	D: Deserializer<'de>,
{
	match <Option<JsonValue>>::deserialize(deserializer)? {
		None | Some(JsonValue::Null) => Ok(None),
		Some(JsonValue::String(s)) => Ok(Some(s)),
		Some(JsonValue::Number(n)) => Ok(Some(n.to_string())),
		Some(other) => Err(DeError::custom(format!("expected string or number, found {other}"))),
	}
}

/// Like [`lenient_string`], with empty strings treated as absent.
pub(crate) fn non_empty_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
	D: Deserializer<'de>,
{
	lenient_string(deserializer).map(|value| value.filter(|s| !s.is_empty()))
}
