//! Signed session assertions identifying a tenant (and optionally a user) to downstream APIs.
//!
//! Assertions are HS256 JWTs keyed with the tenant's client secret. Signing is pure apart
//! from reading the clock, so it is safe to call from any task without coordination.

// crates.io
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
// self
use crate::{
	_prelude::*,
	auth::{ClientSecret, UserId},
	tenant::Tenant,
};

/// Lifetime of an assertion (`exp - iat`) unless configured otherwise.
pub const DEFAULT_ASSERTION_TTL: Duration = Duration::hours(1);

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Failures raised while signing an assertion.
#[derive(Debug, ThisError)]
pub enum SigningError {
	/// Tenant has no usable secret to sign with.
	#[error("Tenant has no signing secret.")]
	MissingSecret,
	/// Signing primitive rejected the claims or key.
	#[error(transparent)]
	Jwt(#[from] jsonwebtoken::errors::Error),
}

impl Tenant {
	/// Signs an assertion for this tenant with the default one-hour lifetime.
	///
	/// See [`sign_assertion`].
	pub fn sign_assertion(
		&self,
		user: Option<&UserId>,
		extra_claims: JsonMap<String, JsonValue>,
	) -> Result<String> {
		sign_assertion(self, user, extra_claims)
	}
}

/// Signs an assertion valid for [`DEFAULT_ASSERTION_TTL`].
///
/// Claims start from `extra_claims`; `iss`, `iat`, and `exp` overwrite any caller-supplied
/// values, and `prn` is added when `user` is present.
pub fn sign_assertion(
	tenant: &Tenant,
	user: Option<&UserId>,
	extra_claims: JsonMap<String, JsonValue>,
) -> Result<String> {
	sign_assertion_with_ttl(tenant, user, extra_claims, DEFAULT_ASSERTION_TTL)
}

/// Signs an assertion whose `exp` lies `ttl` after `iat`.
pub fn sign_assertion_with_ttl(
	tenant: &Tenant,
	user: Option<&UserId>,
	extra_claims: JsonMap<String, JsonValue>,
	ttl: Duration,
) -> Result<String> {
	let secret = tenant.require_secret().map_err(|_| SigningError::MissingSecret)?;
	let claims = build_claims(tenant, user, extra_claims, OffsetDateTime::now_utc(), ttl);
	let key = EncodingKey::from_secret(secret.expose().as_bytes());

	jsonwebtoken::encode(&Header::new(ALGORITHM), &claims, &key)
		.map_err(|e| SigningError::from(e).into())
}

/// Verifies an assertion's signature and expiry, returning its claims.
pub fn verify_assertion(token: &str, secret: &ClientSecret) -> Result<JsonMap<String, JsonValue>> {
	let key = DecodingKey::from_secret(secret.expose().as_bytes());
	let validation = Validation::new(ALGORITHM);

	jsonwebtoken::decode::<JsonMap<String, JsonValue>>(token, &key, &validation)
		.map(|data| data.claims)
		.map_err(Error::InvalidAssertion)
}

fn build_claims(
	tenant: &Tenant,
	user: Option<&UserId>,
	mut claims: JsonMap<String, JsonValue>,
	now: OffsetDateTime,
	ttl: Duration,
) -> JsonMap<String, JsonValue> {
	let iat = now.unix_timestamp();

	claims.insert("iss".into(), JsonValue::String(tenant.id.to_string()));
	claims.insert("iat".into(), iat.into());
	claims.insert("exp".into(), (iat + ttl.whole_seconds()).into());

	if let Some(user) = user {
		claims.insert("prn".into(), JsonValue::String(user.to_string()));
	}

	claims
}
