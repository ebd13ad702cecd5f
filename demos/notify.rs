//! Walks a tenant through install, a cached token lookup, a signed assertion, and the
//! uninstall that follows once the authorization server rejects its credentials.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::Map as JsonMap;
// self
use tenant_broker::{
	auth::{TenantId, UserId},
	broker::ReqwestBroker,
	config::BrokerConfig,
	store::{KeyValueStore, MemoryStore},
	tenant::{CapabilitiesDocument, Tenant},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/v2/oauth/token").header_exists("authorization");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"demo-access\",\"token_type\":\"bearer\",\"expires_in\":3599}",
			);
		})
		.await;
	let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::default());
	let broker = ReqwestBroker::new(store, BrokerConfig::default())?;
	let capabilities = CapabilitiesDocument::from_json(serde_json::json!({
		"links": {
			"homepage": server.url("/"),
			"self": server.url("/v2/capabilities")
		},
		"capabilities": { "oauth2Provider": { "tokenUrl": server.url("/v2/oauth/token") } }
	}))?;
	let tenant = Tenant::builder(TenantId::new("demo-tenant")?)
		.secret("demo-secret")
		.room_id("42")
		.capabilities(capabilities)
		.build();

	broker.install(&tenant).await?;

	let tenant = broker.load("demo-tenant").await?;

	for _ in 0..2 {
		let token = broker.bearer_token(&tenant, None).await?;

		println!("Bearer token for {}: {} characters.", tenant.id, token.expose().len());
	}

	token_mock.assert_hits_async(1).await;

	let assertion =
		broker.sign_assertion(&tenant, Some(&UserId::new("user-1")?), JsonMap::new())?;

	println!("Signed assertion: {assertion}.");

	token_mock.delete_async().await;
	server
		.mock_async(|when, then| {
			when.method(POST).path("/v2/oauth/token");
			then.status(401).body("{\"error\":\"invalid_client\"}");
		})
		.await;

	let scope = "view_group".parse()?;

	match broker.bearer_token(&tenant, Some(scope)).await {
		Err(e) if e.should_uninstall() => {
			let removed = broker.uninstall(&tenant.id).await?;

			println!("Credentials were revoked; tenant removed: {removed}.");
		},
		other => println!("Unexpected outcome: {other:?}."),
	}

	Ok(())
}
