//! Installation capabilities document supplied by the chat server at install time.

// self
use crate::_prelude::*;

/// Capabilities document subset the broker reads.
///
/// Unknown fields are ignored; the three links the tenant record derives from are required.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilitiesDocument {
	/// Top-level link table.
	pub links: CapabilityLinks,
	/// Advertised server capabilities.
	pub capabilities: Capabilities,
}
impl CapabilitiesDocument {
	/// Parses a document from an already decoded JSON value.
	pub fn from_json(value: JsonValue) -> Result<Self> {
		serde_path_to_error::deserialize(value).map_err(|source| Error::InvalidCapabilities { source })
	}

	/// Parses a document from raw JSON bytes.
	pub fn from_slice(bytes: &[u8]) -> Result<Self> {
		let mut de = serde_json::Deserializer::from_slice(bytes);

		serde_path_to_error::deserialize(&mut de)
			.map_err(|source| Error::InvalidCapabilities { source })
	}

	/// Informational homepage link.
	pub fn homepage(&self) -> &str {
		&self.links.homepage
	}

	/// Self-descriptor link.
	pub fn self_link(&self) -> &str {
		&self.links.self_link
	}

	/// Token endpoint advertised by the OAuth provider capability.
	pub fn token_url(&self) -> &str {
		&self.capabilities.oauth2_provider.token_url
	}
}

/// `links` block of a [`CapabilitiesDocument`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityLinks {
	/// Homepage of the installing server.
	pub homepage: String,
	/// URL the document was served from.
	#[serde(rename = "self")]
	pub self_link: String,
}

/// `capabilities` block of a [`CapabilitiesDocument`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
	/// OAuth 2.0 provider endpoints.
	#[serde(rename = "oauth2Provider")]
	pub oauth2_provider: OAuth2Provider,
}

/// OAuth 2.0 provider endpoints advertised by the installing server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuth2Provider {
	/// Client-credentials token endpoint.
	#[serde(rename = "tokenUrl")]
	pub token_url: String,
	/// User authorization endpoint, when advertised.
	#[serde(rename = "authorizationUrl", default, skip_serializing_if = "Option::is_none")]
	pub authorization_url: Option<String>,
}
