//! Fixtures shared by the integration tests.

#![allow(dead_code)]

// std
use std::sync::Arc;
// self
use tenant_broker::{
	auth::TenantId,
	broker::ReqwestBroker,
	config::BrokerConfig,
	store::{KeyValueStore, MemoryStore},
	tenant::Tenant,
};

/// Constructs a [`ReqwestBroker`] backed by an in-memory store and the default
/// configuration, returning the concrete store so tests can inspect it.
pub fn build_reqwest_test_broker() -> (ReqwestBroker, Arc<MemoryStore>) {
	build_reqwest_test_broker_with(BrokerConfig::default())
}

/// Same as [`build_reqwest_test_broker`] with a caller-supplied configuration.
pub fn build_reqwest_test_broker_with(config: BrokerConfig) -> (ReqwestBroker, Arc<MemoryStore>) {
	let store_backend = Arc::new(MemoryStore::default());
	let store: Arc<dyn KeyValueStore> = store_backend.clone();
	let broker =
		ReqwestBroker::new(store, config).expect("Failed to build reqwest-backed broker for tests.");

	(broker, store_backend)
}

/// Builds a tenant whose token endpoint points at `token_url`.
pub fn test_tenant(id: &str, secret: &str, token_url: &str) -> Tenant {
	Tenant::builder(TenantId::new(id).expect("Tenant fixture identifier should be valid."))
		.secret(secret)
		.token_url(token_url)
		.build()
}
