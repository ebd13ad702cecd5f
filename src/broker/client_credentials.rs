//! Client Credentials token acquisition with a key-value cache.
//!
//! [`TenantBroker::get_token`] serves bearer tokens from the store when a token for the
//! same tenant + normalized scope set was cached before, and mints one otherwise. Callers
//! that need the full token response (expiry, granted scopes) bypass the cache entirely.
//! Nothing here retries: a timeout, a 5xx, or a rejected client surfaces immediately.

// crates.io
use oauth2::AsyncHttpClient;
// self
use crate::{
	_prelude::*,
	auth::{BearerToken, ScopeSet},
	broker::TenantBroker,
	http::TokenHttpClient,
	oauth::{self, TransportErrorMapper},
	obs::{self, BrokerOp},
	store::{KeyValueStore, StoreKey},
	tenant::Tenant,
};

/// Parameters for [`TenantBroker::get_token`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenRequest {
	/// Scopes to request; `None` uses the broker's configured default scopes.
	pub scope: Option<ScopeSet>,
	/// When true, return only the bearer token and use the cache.
	pub token_only: bool,
}
impl TokenRequest {
	/// Creates a cached, token-only request for the default scopes.
	pub fn new() -> Self {
		Self { scope: None, token_only: true }
	}

	/// Requests the provided scopes instead of the defaults.
	pub fn with_scope(mut self, scope: ScopeSet) -> Self {
		self.scope = Some(scope);

		self
	}

	/// Overrides the token-only flag.
	pub fn with_token_only(mut self, token_only: bool) -> Self {
		self.token_only = token_only;

		self
	}

	/// Asks for the full token response, bypassing the cache.
	pub fn full_response(self) -> Self {
		self.with_token_only(false)
	}
}
impl Default for TokenRequest {
	fn default() -> Self {
		Self::new()
	}
}

/// Result of [`TenantBroker::get_token`].
#[derive(Clone, Debug, PartialEq)]
pub enum TokenGrant {
	/// Bearer token, possibly served from the cache.
	Bearer(BearerToken),
	/// Full token endpoint payload, freshly minted.
	Response(JsonValue),
}
impl TokenGrant {
	/// Bearer token carried by this grant, if any.
	pub fn bearer(&self) -> Option<&BearerToken> {
		match self {
			Self::Bearer(token) => Some(token),
			Self::Response(_) => None,
		}
	}

	/// Token endpoint payload carried by this grant, if any.
	pub fn into_response(self) -> Option<JsonValue> {
		match self {
			Self::Bearer(_) => None,
			Self::Response(payload) => Some(payload),
		}
	}
}

impl<C, M> TenantBroker<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Acquires a token for `tenant`.
	///
	/// Token-only requests go through [`bearer_token`](Self::bearer_token); full-response
	/// requests go through [`token_response`](Self::token_response).
	pub async fn get_token(&self, tenant: &Tenant, request: TokenRequest) -> Result<TokenGrant> {
		if request.token_only {
			self.bearer_token(tenant, request.scope).await.map(TokenGrant::Bearer)
		} else {
			self.token_response(tenant, request.scope).await.map(TokenGrant::Response)
		}
	}

	/// Bearer token for `scope` (or the default scopes), served from the cache when possible.
	///
	/// The cache key is `{cache_prefix}:{tenant id}:{comma-joined scopes}`; a miss mints a
	/// token and stores it there. The cached value carries no expiry of its own.
	pub async fn bearer_token(
		&self,
		tenant: &Tenant,
		scope: Option<ScopeSet>,
	) -> Result<BearerToken> {
		let scope = scope.unwrap_or_else(|| self.config.default_scopes.clone());

		obs::observe(BrokerOp::Token, "bearer_token", async {
			let key = StoreKey::token(&self.config.cache_prefix, &tenant.id, &scope);
			let stored = self.store.get(key.as_str()).await?;
			let cached = stored.as_ref().and_then(JsonValue::as_str).filter(|token| !token.is_empty());

			obs::token_cache(&tenant.id, cached.is_some());

			if let Some(token) = cached {
				return Ok(BearerToken::new(token));
			}

			let payload = self.generate_token(tenant, &scope).await?;
			let token = oauth::extract_access_token(&payload)?;

			self.store.set(key.as_str(), JsonValue::String(token.expose().to_owned())).await?;

			Ok(token)
		})
		.await
	}

	/// Freshly minted token endpoint payload for `scope` (or the default scopes).
	///
	/// Always calls the token endpoint and leaves the cache untouched.
	pub async fn token_response(
		&self,
		tenant: &Tenant,
		scope: Option<ScopeSet>,
	) -> Result<JsonValue> {
		let scope = scope.unwrap_or_else(|| self.config.default_scopes.clone());

		obs::observe(BrokerOp::Token, "token_response", self.generate_token(tenant, &scope)).await
	}

	async fn generate_token(&self, tenant: &Tenant, scope: &ScopeSet) -> Result<JsonValue> {
		let request = oauth::build_token_request(tenant, scope)?;
		let handle = self.http_client.with_timeout(self.config.token_timeout);
		let response = handle
			.call(request)
			.await
			.map_err(|e| self.transport_mapper.map_transport_error(e))?;

		obs::token_response(&tenant.id, response.status().as_u16());

		let payload = oauth::interpret_token_response(&tenant.id, &response);

		if let Err(Error::ClientInvalid { tenant }) = &payload {
			obs::client_invalid(tenant);
		}

		payload
	}
}
