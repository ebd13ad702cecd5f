//! Tenant broker: the registry, token cache, and signer bound to injected collaborators.

mod client_credentials;
mod registry;

pub use client_credentials::*;

// self
use crate::{
	_prelude::*,
	auth::{self, UserId},
	config::BrokerConfig,
	http::TokenHttpClient,
	oauth::TransportErrorMapper,
	obs::{self, BrokerOp},
	store::KeyValueStore,
	tenant::Tenant,
};
#[cfg(feature = "reqwest")]
use crate::{http::ReqwestHttpClient, oauth::ReqwestTransportErrorMapper};

#[cfg(feature = "reqwest")]
/// Broker specialized for the crate's default reqwest transport stack.
pub type ReqwestBroker = TenantBroker<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Coordinates tenant records, cached bearer tokens, and signed assertions.
///
/// The broker keeps no per-tenant state of its own: records and cached tokens live in the
/// injected [`KeyValueStore`], and every token generation goes through the injected
/// [`TokenHttpClient`]. Concurrent callers asking for the same tenant + scopes may both
/// mint a token; the last cache write wins.
#[derive(Clone)]
pub struct TenantBroker<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// HTTP client wrapper used for every token endpoint request.
	pub http_client: Arc<C>,
	/// Mapper applied to transport-layer errors before surfacing them to callers.
	pub transport_mapper: Arc<M>,
	/// Store holding tenant records and cached tokens.
	pub store: Arc<dyn KeyValueStore>,
	/// Timeouts, cache namespace, default scopes, and assertion lifetime.
	pub config: BrokerConfig,
}
impl<C, M> TenantBroker<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a broker that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(
		store: Arc<dyn KeyValueStore>,
		config: BrokerConfig,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		Self { http_client: http_client.into(), transport_mapper: mapper.into(), store, config }
	}

	/// Signs an assertion for `tenant` valid for the configured assertion lifetime.
	///
	/// Pure apart from reading the clock; no store or network access.
	pub fn sign_assertion(
		&self,
		tenant: &Tenant,
		user: Option<&UserId>,
		extra_claims: JsonMap<String, JsonValue>,
	) -> Result<String> {
		obs::observe_sync(BrokerOp::Assertion, "sign_assertion", || {
			auth::sign_assertion_with_ttl(tenant, user, extra_claims, self.config.assertion_ttl)
		})
	}
}
#[cfg(feature = "reqwest")]
impl TenantBroker<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a broker with its own reqwest-backed transport.
	pub fn new(store: Arc<dyn KeyValueStore>, config: BrokerConfig) -> Result<Self> {
		Ok(Self::with_http_client(
			store,
			config,
			ReqwestHttpClient::new()?,
			Arc::new(ReqwestTransportErrorMapper),
		))
	}
}
impl<C, M> Debug for TenantBroker<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TenantBroker").field("config", &self.config).finish()
	}
}
