mod common;

// crates.io
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde_json::{Map as JsonMap, Value as JsonValue, json};
use time::Duration;
// self
use common::*;
use tenant_broker::{
	auth::{ClientSecret, SigningError, TenantId, UserId, verify_assertion},
	config::BrokerConfig,
	error::Error,
	tenant::Tenant,
};

const SECRET: &str = "assertion-secret";

fn decode(token: &str) -> JsonMap<String, JsonValue> {
	let mut validation = Validation::new(Algorithm::HS256);

	validation.required_spec_claims.clear();

	jsonwebtoken::decode::<JsonMap<String, JsonValue>>(
		token,
		&DecodingKey::from_secret(SECRET.as_bytes()),
		&validation,
	)
	.expect("Assertion should decode with the tenant secret.")
	.claims
}

fn lifetime(claims: &JsonMap<String, JsonValue>) -> i64 {
	let iat = claims.get("iat").and_then(JsonValue::as_i64).expect("iat should be an integer.");
	let exp = claims.get("exp").and_then(JsonValue::as_i64).expect("exp should be an integer.");

	exp - iat
}

#[test]
fn user_assertion_names_tenant_and_user() {
	let (broker, _store) = build_reqwest_test_broker();
	let tenant = test_tenant("oauth-jwt", SECRET, "https://chat.example.com/v2/oauth/token");
	let user = UserId::new("u1").expect("User id should be valid.");
	let mut extra = JsonMap::new();

	extra.insert("context".into(), json!({ "room_id": 42 }));

	let token = broker.sign_assertion(&tenant, Some(&user), extra).expect("Signing should succeed.");
	let claims = decode(&token);

	assert_eq!(claims.get("iss"), Some(&JsonValue::from("oauth-jwt")));
	assert_eq!(claims.get("prn"), Some(&JsonValue::from("u1")));
	assert_eq!(claims.get("context"), Some(&json!({ "room_id": 42 })));
	assert_eq!(lifetime(&claims), 3600);
}

#[test]
fn tenant_assertion_omits_principal() {
	let (broker, _store) = build_reqwest_test_broker();
	let tenant = test_tenant("oauth-jwt", SECRET, "https://chat.example.com/v2/oauth/token");
	let token =
		broker.sign_assertion(&tenant, None, JsonMap::new()).expect("Signing should succeed.");
	let claims = decode(&token);

	assert!(!claims.contains_key("prn"));
	assert_eq!(claims.len(), 3);
}

#[test]
fn configured_lifetime_is_applied() {
	let (broker, _store) = build_reqwest_test_broker_with(
		BrokerConfig::default().with_assertion_ttl(Duration::minutes(5)),
	);
	let tenant = test_tenant("oauth-jwt", SECRET, "https://chat.example.com/v2/oauth/token");
	let token =
		broker.sign_assertion(&tenant, None, JsonMap::new()).expect("Signing should succeed.");

	assert_eq!(lifetime(&decode(&token)), 300);
}

#[test]
fn signed_assertion_round_trips_through_verification() {
	let tenant = test_tenant("oauth-jwt", SECRET, "https://chat.example.com/v2/oauth/token");
	let token = tenant.sign_assertion(None, JsonMap::new()).expect("Signing should succeed.");
	let claims = verify_assertion(&token, &ClientSecret::new(SECRET))
		.expect("Assertion should verify with the tenant secret.");

	assert_eq!(claims.get("iss"), Some(&JsonValue::from("oauth-jwt")));

	let err = verify_assertion(&token, &ClientSecret::new("someone-else"))
		.expect_err("Assertions must not verify with another secret.");

	assert!(matches!(err, Error::InvalidAssertion(_)));
}

#[test]
fn tenant_without_secret_cannot_sign() {
	let (broker, _store) = build_reqwest_test_broker();
	let tenant =
		Tenant::builder(TenantId::new("no-secret").expect("Tenant id should be valid.")).build();
	let err = broker
		.sign_assertion(&tenant, None, JsonMap::new())
		.expect_err("Signing without a secret must fail.");

	assert!(matches!(err, Error::SigningFailed(SigningError::MissingSecret)));
}
