//! Tenant records: one entry per installed add-on instance.
//!
//! A [`Tenant`] is created at install time from a [`CapabilitiesDocument`] or rehydrated
//! from the key-value store by id. The persisted shape is the flat map produced by
//! [`Tenant::to_map`]; [`Tenant::from_map`] accepts the same shape and ignores reserved
//! keys starting with `_` that storage backends add for their own bookkeeping.

pub mod capabilities;
pub mod record;

pub use capabilities::*;
pub use record::*;

// self
use crate::{
	_prelude::*,
	auth::{ClientSecret, TenantId},
};

/// Installed add-on instance and its OAuth client credentials.
///
/// Field order matches the persisted map.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Tenant {
	/// Stable identifier, also the OAuth client id.
	pub id: TenantId,
	/// OAuth client secret; required for token and assertion operations.
	#[serde(default)]
	pub secret: Option<ClientSecret>,
	/// Bound chat room, if the add-on was installed into a single room.
	#[serde(default, deserialize_with = "record::lenient_string")]
	pub room_id: Option<String>,
	/// Owning group (account/org) id.
	#[serde(default, deserialize_with = "record::lenient_string")]
	pub group_id: Option<String>,
	/// Owning group name; empty names are stored as absent.
	#[serde(default, deserialize_with = "record::non_empty_string")]
	pub group_name: Option<String>,
	/// Informational homepage link.
	#[serde(default)]
	pub homepage: Option<String>,
	/// Endpoint used to mint client-credential tokens.
	#[serde(default)]
	pub token_url: Option<String>,
	/// Capabilities self-descriptor link.
	#[serde(default)]
	pub capabilities_url: Option<String>,
}
impl Tenant {
	/// Returns a builder for a tenant with the provided id.
	pub fn builder(id: TenantId) -> TenantBuilder {
		TenantBuilder::new(id)
	}

	/// Predicate matching exactly this tenant's stored record.
	pub fn id_query(&self) -> TenantQuery {
		TenantQuery { id: self.id.clone() }
	}

	/// Client secret, or a configuration error naming the missing field.
	pub(crate) fn require_secret(&self) -> Result<&ClientSecret> {
		self.secret
			.as_ref()
			.filter(|secret| !secret.expose().is_empty())
			.ok_or_else(|| crate::error::ConfigError::MissingCredential { field: "secret" }.into())
	}
}

/// Builder for [`Tenant`].
///
/// When a capabilities document is attached, `homepage`, `token_url`, and
/// `capabilities_url` come from the document and any explicit values for those three
/// fields are ignored.
#[derive(Clone, Debug)]
pub struct TenantBuilder {
	id: TenantId,
	secret: Option<ClientSecret>,
	room_id: Option<String>,
	group_id: Option<String>,
	group_name: Option<String>,
	homepage: Option<String>,
	token_url: Option<String>,
	capabilities_url: Option<String>,
	capabilities: Option<CapabilitiesDocument>,
}
impl TenantBuilder {
	fn new(id: TenantId) -> Self {
		Self {
			id,
			secret: None,
			room_id: None,
			group_id: None,
			group_name: None,
			homepage: None,
			token_url: None,
			capabilities_url: None,
			capabilities: None,
		}
	}

	/// Sets the OAuth client secret.
	pub fn secret(mut self, secret: impl Into<String>) -> Self {
		self.secret = Some(ClientSecret::new(secret));

		self
	}

	/// Sets the bound room id.
	pub fn room_id(mut self, room_id: impl Into<String>) -> Self {
		self.room_id = Some(room_id.into());

		self
	}

	/// Sets the owning group id.
	pub fn group_id(mut self, group_id: impl Into<String>) -> Self {
		self.group_id = Some(group_id.into());

		self
	}

	/// Sets the owning group name.
	pub fn group_name(mut self, group_name: impl Into<String>) -> Self {
		self.group_name = Some(group_name.into());

		self
	}

	/// Sets the homepage link (ignored when a capabilities document is attached).
	pub fn homepage(mut self, homepage: impl Into<String>) -> Self {
		self.homepage = Some(homepage.into());

		self
	}

	/// Sets the token endpoint (ignored when a capabilities document is attached).
	pub fn token_url(mut self, token_url: impl Into<String>) -> Self {
		self.token_url = Some(token_url.into());

		self
	}

	/// Sets the self-descriptor link (ignored when a capabilities document is attached).
	pub fn capabilities_url(mut self, capabilities_url: impl Into<String>) -> Self {
		self.capabilities_url = Some(capabilities_url.into());

		self
	}

	/// Attaches the install-time capabilities document.
	pub fn capabilities(mut self, document: CapabilitiesDocument) -> Self {
		self.capabilities = Some(document);

		self
	}

	/// Builds the tenant.
	pub fn build(self) -> Tenant {
		let (homepage, token_url, capabilities_url) = match self.capabilities {
			Some(doc) => (
				Some(doc.homepage().to_owned()),
				Some(doc.token_url().to_owned()),
				Some(doc.self_link().to_owned()),
			),
			None => (self.homepage, self.token_url, self.capabilities_url),
		};

		Tenant {
			id: self.id,
			secret: self.secret,
			room_id: self.room_id,
			group_id: self.group_id,
			group_name: self.group_name.filter(|name| !name.is_empty()),
			homepage,
			token_url,
			capabilities_url,
		}
	}
}

/// Filter locating a stored tenant record by exact id.
///
/// Serializes to `{"id": "<tenant id>"}` for backends that take document-style queries.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantQuery {
	/// Tenant id to match.
	pub id: TenantId,
}
impl TenantQuery {
	/// Returns `true` when the stored map belongs to the queried tenant.
	pub fn matches(&self, map: &JsonMap<String, JsonValue>) -> bool {
		map.get("id").and_then(JsonValue::as_str) == Some(self.id.as_ref())
	}
}
