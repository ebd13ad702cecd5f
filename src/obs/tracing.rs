// self
use crate::{_prelude::*, auth::TenantId, obs::BrokerOp};

#[cfg(feature = "tracing")]
fn span(op: BrokerOp, stage: &'static str) -> tracing::Span {
	tracing::info_span!("tenant_broker.op", op = op.label(), stage)
}

pub(super) async fn in_span<F>(op: BrokerOp, stage: &'static str, fut: F) -> F::Output
where
	F: Future,
{
	#[cfg(feature = "tracing")]
	{
		use tracing::Instrument;

		fut.instrument(span(op, stage)).await
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (op, stage);

		fut.await
	}
}

pub(super) fn in_span_sync<T>(op: BrokerOp, stage: &'static str, f: impl FnOnce() -> T) -> T {
	#[cfg(feature = "tracing")]
	{
		span(op, stage).in_scope(f)
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (op, stage);

		f()
	}
}

/// Warns that a tenant lookup found nothing.
pub fn tenant_missing(id: &str) {
	#[cfg(feature = "tracing")]
	tracing::warn!(tenant = id, "Cannot find tenant.");
	#[cfg(not(feature = "tracing"))]
	let _ = id;
}

/// Reports that the authorization server rejected a tenant's credentials.
pub fn client_invalid(tenant: &TenantId) {
	#[cfg(feature = "tracing")]
	tracing::error!(
		tenant = %tenant,
		"Client is invalid but no uninstall was received; the tenant should be uninstalled."
	);
	#[cfg(not(feature = "tracing"))]
	let _ = tenant;
}

/// Records the status of a token endpoint response; the body is never logged.
pub fn token_response(tenant: &TenantId, status: u16) {
	#[cfg(feature = "tracing")]
	tracing::debug!(tenant = %tenant, status, "Token endpoint responded.");
	#[cfg(not(feature = "tracing"))]
	let _ = (tenant, status);
}

pub(super) fn token_cache(tenant: &TenantId, hit: bool) {
	#[cfg(feature = "tracing")]
	tracing::debug!(tenant = %tenant, hit, "Token cache lookup.");
	#[cfg(not(feature = "tracing"))]
	let _ = (tenant, hit);
}
