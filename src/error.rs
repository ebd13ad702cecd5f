//! Broker-level error types shared across the tenant registry, token cache, and signer.

// self
use crate::{_prelude::*, auth::TenantId};

/// Broker-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical broker error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// No tenant record is stored under the requested id.
	#[error("Tenant `{id}` was not found.")]
	TenantNotFound {
		/// Identifier that failed to resolve.
		id: String,
	},
	/// The authorization server rejected the tenant's client credentials.
	///
	/// The stored record is stale and should be uninstalled.
	#[error("Client credentials for tenant `{tenant}` are no longer valid.")]
	ClientInvalid {
		/// Tenant whose credentials were rejected.
		tenant: TenantId,
	},
	/// Token endpoint answered with a status other than 200 or 401.
	#[error("Token request failed with HTTP {status}: {body}")]
	TokenRequestFailed {
		/// HTTP status code returned by the token endpoint.
		status: u16,
		/// Raw response body kept for diagnostics.
		body: String,
	},
	/// Token endpoint answered 200 but the payload is unusable.
	#[error("Token endpoint returned an invalid payload: {reason}.")]
	InvalidTokenResponse {
		/// What was wrong with the payload.
		reason: String,
	},
	/// Stored tenant map cannot be turned into a tenant.
	#[error("Stored tenant record is invalid: {reason}.")]
	InvalidRecord {
		/// Human-readable reason.
		reason: String,
	},
	/// Capabilities document lacks a required field.
	#[error("Capabilities document is invalid.")]
	InvalidCapabilities {
		/// Structured parsing failure carrying the offending path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Assertion could not be signed.
	#[error("Unable to sign assertion.")]
	SigningFailed(#[from] crate::auth::SigningError),
	/// Inbound assertion failed signature or claim validation.
	#[error("Assertion is invalid.")]
	InvalidAssertion(#[source] jsonwebtoken::errors::Error),
}
impl Error {
	/// HTTP status the inbound request boundary should answer with, when the failure is
	/// attributable to the caller rather than the broker.
	pub fn http_status(&self) -> Option<u16> {
		match self {
			Self::TenantNotFound { .. } => Some(400),
			_ => None,
		}
	}

	/// Returns `true` when the failure means the tenant must be uninstalled.
	pub fn should_uninstall(&self) -> bool {
		matches!(self, Self::ClientInvalid { .. })
	}
}

/// Configuration and validation failures raised by the broker.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Tenant's token URL cannot be parsed.
	#[error("Tenant token URL is invalid.")]
	InvalidTokenUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Tenant lacks a field required by the requested operation.
	#[error("Tenant is missing the `{field}` field required for this operation.")]
	MissingCredential {
		/// Name of the absent field.
		field: &'static str,
	},
	/// Request scopes cannot be normalized.
	#[error("Requested scopes are invalid.")]
	InvalidScope(#[from] crate::auth::ScopeValidationError),
	/// Identifier failed validation.
	#[error(transparent)]
	InvalidIdentifier(#[from] crate::auth::IdentifierError),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the token endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Token endpoint did not answer within the configured timeout.
	#[error("Request timed out while calling the token endpoint.")]
	Timeout,
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the token endpoint.")]
	Io(#[from] std::io::Error),
	/// HTTP client failed for a reason it could only describe as text.
	#[error("HTTP client error occurred while calling the token endpoint: {message}.")]
	Other {
		/// Client-supplied description.
		message: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::Timeout } else { Self::network(e) }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn only_missing_tenants_map_to_bad_request() {
		let missing = Error::TenantNotFound { id: "ghost".into() };
		let failed = Error::TokenRequestFailed { status: 500, body: "boom".into() };

		assert_eq!(missing.http_status(), Some(400));
		assert_eq!(failed.http_status(), None);
	}

	#[test]
	fn client_invalid_requests_uninstall() {
		let tenant = TenantId::new("tenant-1").expect("Tenant fixture should be valid.");
		let err = Error::ClientInvalid { tenant };

		assert!(err.should_uninstall());
		assert!(err.to_string().contains("tenant-1"));
		assert!(!Error::TenantNotFound { id: "tenant-1".into() }.should_uninstall());
	}

	#[test]
	fn token_request_failure_carries_body() {
		let err = Error::TokenRequestFailed { status: 503, body: "{\"error\":\"down\"}".into() };

		assert!(err.to_string().contains("503"));
		assert!(err.to_string().contains("down"));
	}
}
