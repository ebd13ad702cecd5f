//! Client-credentials token requests: construction, response classification, and
//! transport error mapping.

pub use oauth2;

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use oauth2::{
	HttpClientError, HttpRequest, HttpResponse,
	http::{Method, Request, StatusCode, header},
};
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	auth::{BearerToken, ScopeSet, TenantId},
	error::{ConfigError, TransportError},
	tenant::Tenant,
};

const GRANT_TYPE: &str = "client_credentials";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Maps HTTP transport failures into broker [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted by the transport into a broker error.
	fn map_transport_error(&self, error: HttpClientError<E>) -> Error;
}

/// Mapper for any transport; every transport-specific failure becomes a network error.
#[derive(Clone, Debug, Default)]
pub struct GenericTransportErrorMapper;
impl<E> TransportErrorMapper<E> for GenericTransportErrorMapper
where
	E: 'static + Send + Sync + StdError,
{
	fn map_transport_error(&self, error: HttpClientError<E>) -> Error {
		match error {
			HttpClientError::Reqwest(inner) => TransportError::network(*inner).into(),
			other => map_common_transport_error(other),
		}
	}
}

/// Default mapper for reqwest-backed transports; distinguishes timeouts and builder errors.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(&self, error: HttpClientError<ReqwestError>) -> Error {
		match error {
			HttpClientError::Reqwest(inner) if inner.is_builder() => ConfigError::from(*inner).into(),
			HttpClientError::Reqwest(inner) => TransportError::from(*inner).into(),
			other => map_common_transport_error(other),
		}
	}
}

fn map_common_transport_error<E>(error: HttpClientError<E>) -> Error
where
	E: 'static + Send + Sync + StdError,
{
	match error {
		HttpClientError::Http(inner) => ConfigError::from(inner).into(),
		HttpClientError::Io(inner) => TransportError::Io(inner).into(),
		HttpClientError::Other(message) => TransportError::Other { message }.into(),
		HttpClientError::Reqwest(inner) => TransportError::network(*inner).into(),
		_ => TransportError::Other { message: "unrecognized HTTP client failure".into() }.into(),
	}
}

/// Builds the `client_credentials` POST for `tenant`'s token endpoint.
///
/// The body carries `grant_type` and the space-joined `scope` (omitted when empty); the
/// client authenticates with HTTP Basic using the tenant id and secret.
pub fn build_token_request(tenant: &Tenant, scope: &ScopeSet) -> Result<HttpRequest> {
	let secret = tenant.require_secret()?;
	let token_url = tenant
		.token_url
		.as_deref()
		.filter(|url| !url.is_empty())
		.ok_or(ConfigError::MissingCredential { field: "token_url" })?;
	let token_url =
		Url::parse(token_url).map_err(|source| ConfigError::InvalidTokenUrl { source })?;
	let mut form = form_urlencoded::Serializer::new(String::new());

	form.append_pair("grant_type", GRANT_TYPE);

	if !scope.is_empty() {
		form.append_pair("scope", &scope.normalized());
	}

	let credentials = STANDARD.encode(format!("{}:{}", tenant.id, secret.expose()));
	let request = Request::builder()
		.method(Method::POST)
		.uri(token_url.as_str())
		.header(header::AUTHORIZATION, format!("Basic {credentials}"))
		.header(header::CONTENT_TYPE, FORM_CONTENT_TYPE)
		.header(header::ACCEPT, "application/json")
		.body(form.finish().into_bytes())
		.map_err(ConfigError::from)?;

	Ok(request)
}

/// Classifies a token endpoint response.
///
/// 200 yields the parsed JSON body, 401 yields [`Error::ClientInvalid`], anything else
/// yields [`Error::TokenRequestFailed`] with the raw body.
pub fn interpret_token_response(tenant: &TenantId, response: &HttpResponse) -> Result<JsonValue> {
	match response.status() {
		StatusCode::OK => serde_json::from_slice(response.body())
			.map_err(|e| Error::InvalidTokenResponse { reason: e.to_string() }),
		StatusCode::UNAUTHORIZED => Err(Error::ClientInvalid { tenant: tenant.clone() }),
		status => Err(Error::TokenRequestFailed {
			status: status.as_u16(),
			body: String::from_utf8_lossy(response.body()).into_owned(),
		}),
	}
}

/// Pulls the `access_token` string out of a token response payload.
pub fn extract_access_token(payload: &JsonValue) -> Result<BearerToken> {
	payload
		.get("access_token")
		.and_then(JsonValue::as_str)
		.filter(|token| !token.is_empty())
		.map(BearerToken::new)
		.ok_or_else(|| Error::InvalidTokenResponse {
			reason: "response does not contain an access_token string".into(),
		})
}
