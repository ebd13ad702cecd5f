//! Tenant record persistence: install, load, and uninstall.

// self
use crate::{
	_prelude::*,
	auth::TenantId,
	broker::TenantBroker,
	http::TokenHttpClient,
	oauth::TransportErrorMapper,
	obs::{self, BrokerOp},
	store::{KeyValueStore, StoreKey},
	tenant::{Tenant, TenantQuery},
};

impl<C, M> TenantBroker<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Loads the tenant stored under `id`.
	///
	/// Fails with [`Error::TenantNotFound`] when nothing (or an empty record) is stored;
	/// request handlers should answer such failures with [`Error::http_status`]. A record whose
	/// own `id` differs from `id` is rejected as [`Error::InvalidRecord`].
	pub async fn load(&self, id: &str) -> Result<Tenant> {
		obs::observe(BrokerOp::Load, "load", async {
			let missing = || -> Result<Tenant> {
				obs::tenant_missing(id);

				Err(Error::TenantNotFound { id: id.to_owned() })
			};
			// An id that cannot be valid cannot have been installed either.
			let Ok(tenant_id) = TenantId::new(id) else {
				return missing();
			};
			let query = TenantQuery { id: tenant_id };
			let stored = self.store.get(StoreKey::tenant(&query.id).as_str()).await?;
			let Some(value) = stored.filter(|value| !is_blank(value)) else {
				return missing();
			};
			let tenant = Tenant::from_value(&value)?;

			if tenant.id_query() != query {
				return Err(Error::InvalidRecord {
					reason: format!("record stored under `{id}` belongs to tenant `{}`", tenant.id),
				});
			}

			Ok(tenant)
		})
		.await
	}

	/// Persists `tenant`, replacing any record stored under the same id.
	pub async fn install(&self, tenant: &Tenant) -> Result<()> {
		obs::observe(BrokerOp::Install, "install", async {
			let record = JsonValue::Object(tenant.to_map());

			self.store.set(StoreKey::tenant(&tenant.id).as_str(), record).await.map_err(Error::from)
		})
		.await
	}

	/// Removes the record stored under `id`, returning whether one existed.
	///
	/// Callers invoke this when a token request fails with [`Error::ClientInvalid`].
	pub async fn uninstall(&self, id: &TenantId) -> Result<bool> {
		obs::observe(BrokerOp::Uninstall, "uninstall", async {
			let previous = self.store.remove(StoreKey::tenant(id).as_str()).await?;

			Ok(previous.is_some_and(|value| !is_blank(&value)))
		})
		.await
	}
}

fn is_blank(value: &JsonValue) -> bool {
	match value {
		JsonValue::Null | JsonValue::Bool(false) => true,
		JsonValue::String(s) => s.is_empty(),
		JsonValue::Array(items) => items.is_empty(),
		JsonValue::Object(map) => map.is_empty(),
		JsonValue::Bool(true) | JsonValue::Number(_) => false,
	}
}
