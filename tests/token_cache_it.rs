mod common;

// std
use std::time::Duration as StdDuration;
// crates.io
use httpmock::prelude::*;
use serde_json::Value as JsonValue;
use time::Duration;
// self
use common::*;
use tenant_broker::{
	auth::ScopeSet,
	broker::{TokenGrant, TokenRequest},
	config::BrokerConfig,
	error::{Error, TransportError},
	store::{KeyValueStore, StoreKey},
};

const TENANT_ID: &str = "tenant-cc";
const TENANT_SECRET: &str = "secret-cc";
// base64("tenant-cc:secret-cc")
const BASIC_AUTH: &str = "Basic dGVuYW50LWNjOnNlY3JldC1jYw==";

fn token_body(token: &str) -> String {
	format!("{{\"access_token\":\"{token}\",\"token_type\":\"bearer\",\"expires_in\":3599}}")
}

#[tokio::test]
async fn cache_miss_mints_and_populates_cache() {
	let server = MockServer::start_async().await;
	let (broker, store) = build_reqwest_test_broker();
	let tenant = test_tenant(TENANT_ID, TENANT_SECRET, &server.url("/v2/oauth/token"));
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/v2/oauth/token")
				.header("authorization", BASIC_AUTH)
				.body("grant_type=client_credentials&scope=send_notification");
			then.status(200).header("content-type", "application/json").body(token_body("T"));
		})
		.await;
	let token = broker
		.bearer_token(&tenant, None)
		.await
		.expect("Cache miss should mint a token.");

	assert_eq!(token.expose(), "T");

	mock.assert_async().await;

	let key = StoreKey::token("hipchat-tokens", &tenant.id, &broker.config.default_scopes);
	let cached = store
		.get(key.as_str())
		.await
		.expect("Store lookup should succeed.")
		.expect("Minted token should be cached.");

	assert_eq!(key.as_str(), "hipchat-tokens:tenant-cc:send_notification");
	assert_eq!(cached, JsonValue::from("T"));
}

#[tokio::test]
async fn cached_token_skips_token_endpoint() {
	let server = MockServer::start_async().await;
	let (broker, store) = build_reqwest_test_broker();
	let tenant = test_tenant(TENANT_ID, TENANT_SECRET, &server.url("/v2/oauth/token"));
	let scope = ScopeSet::new(["view_group", "send_notification"])
		.expect("Scope fixture should be valid.");
	let key = StoreKey::token("hipchat-tokens", &tenant.id, &scope);

	store
		.set(key.as_str(), "pre-cached".into())
		.await
		.expect("Seeding the cache should succeed.");

	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/v2/oauth/token");
			then.status(200).body(token_body("fresh"));
		})
		.await;
	let reordered =
		ScopeSet::new(["send_notification", "view_group"]).expect("Scope fixture should be valid.");
	let token = broker
		.bearer_token(&tenant, Some(reordered))
		.await
		.expect("Cached token should be returned.");

	assert_eq!(token.expose(), "pre-cached");

	mock.assert_calls_async(0).await;
}

#[tokio::test]
async fn repeated_cached_requests_mint_once() {
	let server = MockServer::start_async().await;
	let (broker, _store) = build_reqwest_test_broker();
	let tenant = test_tenant(TENANT_ID, TENANT_SECRET, &server.url("/token"));
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(200).body(token_body("once"));
		})
		.await;

	for _ in 0..3 {
		let grant = broker
			.get_token(&tenant, TokenRequest::new())
			.await
			.expect("Token-only requests should succeed.");

		assert_eq!(grant.bearer().map(|token| token.expose()), Some("once"));
	}

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn full_response_bypasses_cache() {
	let server = MockServer::start_async().await;
	let (broker, store) = build_reqwest_test_broker();
	let tenant = test_tenant(TENANT_ID, TENANT_SECRET, &server.url("/token"));
	let key = StoreKey::token("hipchat-tokens", &tenant.id, &broker.config.default_scopes);

	store.set(key.as_str(), "stale".into()).await.expect("Seeding the cache should succeed.");

	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(200).body(
				"{\"access_token\":\"full\",\"expires_in\":3599,\"scope\":\"send_notification\"}",
			);
		})
		.await;

	for _ in 0..2 {
		let grant = broker
			.get_token(&tenant, TokenRequest::new().full_response())
			.await
			.expect("Full-response requests should succeed.");
		let payload = grant.into_response().expect("Full-response requests return the payload.");

		assert_eq!(payload["expires_in"], 3599);
		assert_eq!(payload["scope"], "send_notification");
	}

	mock.assert_calls_async(2).await;

	let cached = store
		.get(key.as_str())
		.await
		.expect("Store lookup should succeed.")
		.expect("Cached value should be untouched.");

	assert_eq!(cached, JsonValue::from("stale"));
}

#[tokio::test]
async fn unauthorized_maps_to_client_invalid() {
	let server = MockServer::start_async().await;
	let (broker, store) = build_reqwest_test_broker();
	let tenant = test_tenant(TENANT_ID, TENANT_SECRET, &server.url("/token"));
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(401).body("{\"error\":\"invalid_client\"}");
		})
		.await;
	let err = broker
		.bearer_token(&tenant, None)
		.await
		.expect_err("Rejected credentials should surface to the caller.");

	match &err {
		Error::ClientInvalid { tenant: rejected } => assert_eq!(rejected, &tenant.id),
		other => panic!("Unexpected error variant: {other:?}."),
	}

	assert!(err.should_uninstall());
	assert!(store.is_empty(), "Failed requests must not populate the cache.");

	mock.assert_async().await;
}

#[tokio::test]
async fn server_error_carries_body() {
	let server = MockServer::start_async().await;
	let (broker, _store) = build_reqwest_test_broker();
	let tenant = test_tenant(TENANT_ID, TENANT_SECRET, &server.url("/token"));
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(500).body("internal explosion");
		})
		.await;
	let err = broker
		.get_token(&tenant, TokenRequest::new())
		.await
		.expect_err("Server errors should surface to the caller.");

	match err {
		Error::TokenRequestFailed { status, body } => {
			assert_eq!(status, 500);
			assert_eq!(body, "internal explosion");
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn token_response_helper_returns_payload() {
	let server = MockServer::start_async().await;
	let (broker, _store) = build_reqwest_test_broker();
	let tenant = test_tenant(TENANT_ID, TENANT_SECRET, &server.url("/token"));
	let scope = ScopeSet::new(["admin_room"]).expect("Scope fixture should be valid.");
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/token")
				.body("grant_type=client_credentials&scope=admin_room");
			then.status(200).body(token_body("admin"));
		})
		.await;
	let payload = broker
		.token_response(&tenant, Some(scope))
		.await
		.expect("Full token response should be returned.");

	assert_eq!(payload["access_token"], "admin");
	assert!(TokenGrant::Response(payload).bearer().is_none());

	mock.assert_async().await;
}

#[tokio::test]
async fn slow_endpoint_times_out() {
	let server = MockServer::start_async().await;
	let (broker, store) = build_reqwest_test_broker_with(
		BrokerConfig::default().with_token_timeout(Duration::seconds(1)),
	);
	let tenant = test_tenant(TENANT_ID, TENANT_SECRET, &server.url("/v2/oauth/token"));
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/v2/oauth/token");
			then.status(200)
				.header("content-type", "application/json")
				.body(token_body("late"))
				.delay(StdDuration::from_secs(3));
		})
		.await;
	let err = broker
		.bearer_token(&tenant, None)
		.await
		.expect_err("Token requests must give up after the configured timeout.");

	assert!(matches!(err, Error::Transport(TransportError::Timeout)), "Unexpected error: {err:?}");
	assert!(store.is_empty(), "Timed-out requests must not populate the cache.");
}
