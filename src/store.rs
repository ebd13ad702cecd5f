//! Key-value store contract shared by tenant records and the token cache, plus built-in
//! implementations.
//!
//! The broker never holds a process-wide store handle; callers inject an
//! `Arc<dyn KeyValueStore>` so tests and deployments choose their own backend. Backends
//! must provide atomic single-key `get`/`set`; no multi-key transactions are required.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{
	_prelude::*,
	auth::{ScopeSet, TenantId},
};

/// Boxed future returned by [`KeyValueStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Storage backend contract implemented by broker stores.
pub trait KeyValueStore
where
	Self: Send + Sync,
{
	/// Fetches the value stored under `key`, if present.
	fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<JsonValue>>;

	/// Stores or replaces the value under `key`.
	fn set<'a>(&'a self, key: &'a str, value: JsonValue) -> StoreFuture<'a, ()>;

	/// Removes `key`, returning the previous value.
	fn remove<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<JsonValue>>;
}

/// Error type produced by [`KeyValueStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Key addressing either a tenant record or a cached bearer token.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreKey(String);
impl StoreKey {
	/// Tenant records are stored under the bare tenant id.
	pub fn tenant(id: &TenantId) -> Self {
		Self(id.to_string())
	}

	/// Cached tokens live under `{prefix}:{tenant id}:{comma-joined normalized scopes}`.
	pub fn token(prefix: &str, tenant: &TenantId, scope: &ScopeSet) -> Self {
		Self(format!("{prefix}:{tenant}:{}", scope.cache_segment()))
	}

	/// Borrowed key string.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for StoreKey {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Display for StoreKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
