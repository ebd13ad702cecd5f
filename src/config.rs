//! Broker configuration.

// self
use crate::{
	_prelude::*,
	auth::{DEFAULT_ASSERTION_TTL, DEFAULT_SCOPE, ScopeSet},
};

/// Default namespace for cached bearer tokens.
pub const DEFAULT_CACHE_PREFIX: &str = "hipchat-tokens";
/// Default timeout applied to each token endpoint request.
pub const DEFAULT_TOKEN_TIMEOUT: Duration = Duration::seconds(10);

/// Tunables shared by every operation of a [`TenantBroker`](crate::broker::TenantBroker).
///
/// Deserializes from partial documents; absent fields fall back to their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerConfig {
	/// Per-request timeout for token generation.
	pub token_timeout: Duration,
	/// Namespace prefixed to token cache keys.
	pub cache_prefix: String,
	/// Scopes requested when the caller names none.
	pub default_scopes: ScopeSet,
	/// Lifetime of signed assertions.
	pub assertion_ttl: Duration,
}
impl BrokerConfig {
	/// Overrides the token request timeout. Negative values clamp to zero.
	pub fn with_token_timeout(mut self, timeout: Duration) -> Self {
		self.token_timeout = if timeout.is_negative() { Duration::ZERO } else { timeout };

		self
	}

	/// Overrides the token cache namespace.
	pub fn with_cache_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.cache_prefix = prefix.into();

		self
	}

	/// Overrides the default scopes.
	pub fn with_default_scopes(mut self, scopes: ScopeSet) -> Self {
		self.default_scopes = scopes;

		self
	}

	/// Overrides the assertion lifetime. Negative values clamp to zero.
	pub fn with_assertion_ttl(mut self, ttl: Duration) -> Self {
		self.assertion_ttl = if ttl.is_negative() { Duration::ZERO } else { ttl };

		self
	}
}
impl Default for BrokerConfig {
	fn default() -> Self {
		Self {
			token_timeout: DEFAULT_TOKEN_TIMEOUT,
			cache_prefix: DEFAULT_CACHE_PREFIX.into(),
			default_scopes: ScopeSet::new([DEFAULT_SCOPE]).unwrap_or_default(),
			assertion_ttl: DEFAULT_ASSERTION_TTL,
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn defaults_match_token_contract() {
		let config = BrokerConfig::default();

		assert_eq!(config.token_timeout, Duration::seconds(10));
		assert_eq!(config.cache_prefix, "hipchat-tokens");
		assert_eq!(config.default_scopes.as_slice(), ["send_notification".to_string()]);
		assert_eq!(config.assertion_ttl, Duration::hours(1));
	}

	#[test]
	fn partial_documents_fill_defaults() {
		let config: BrokerConfig =
			serde_json::from_value(serde_json::json!({ "cache_prefix": "addon-tokens" }))
				.expect("Partial config should deserialize.");

		assert_eq!(config.cache_prefix, "addon-tokens");
		assert_eq!(config.token_timeout, DEFAULT_TOKEN_TIMEOUT);
	}

	#[test]
	fn default_scopes_accept_delimited_string() {
		let config: BrokerConfig = serde_json::from_value(
			serde_json::json!({ "default_scopes": "view_group send_notification" }),
		)
		.expect("Space-delimited default scopes should deserialize.");

		assert_eq!(
			config.default_scopes.as_slice(),
			["send_notification".to_string(), "view_group".to_string()]
		);
	}

	#[test]
	fn negative_durations_clamp() {
		let config = BrokerConfig::default()
			.with_token_timeout(Duration::seconds(-5))
			.with_assertion_ttl(Duration::seconds(-1));

		assert_eq!(config.token_timeout, Duration::ZERO);
		assert_eq!(config.assertion_ttl, Duration::ZERO);
	}
}
