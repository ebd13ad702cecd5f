//! Optional observability for broker operations.
//!
//! # Feature Flags
//!
//! - `tracing`: every operation runs inside a `tenant_broker.op` span carrying `op` and
//!   `stage`; missing tenants, rejected client credentials, token endpoint statuses, and
//!   cache lookups emit events. Events carry identifiers and status codes only.
//! - `metrics`: `tenant_broker_op_total{op, outcome}` counts attempts, successes, and
//!   failures; `tenant_broker_token_cache_total{result}` counts cache hits and misses.
//!
//! With both features disabled every helper compiles down to a passthrough.

mod metrics;
mod tracing;

pub use tracing::{client_invalid, tenant_missing, token_response};

// self
use crate::_prelude::*;

/// Broker operations observed by spans and counters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BrokerOp {
	/// Bearer token acquisition, cached or not.
	Token,
	/// Tenant record lookup.
	Load,
	/// Tenant record write.
	Install,
	/// Tenant record removal.
	Uninstall,
	/// Assertion signing.
	Assertion,
}
impl BrokerOp {
	/// Stable label used in span fields and metric labels.
	pub const fn label(self) -> &'static str {
		match self {
			Self::Token => "token",
			Self::Load => "load",
			Self::Install => "install",
			Self::Uninstall => "uninstall",
			Self::Assertion => "assertion",
		}
	}
}

/// Outcome labels recorded per operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpOutcome {
	/// Entry to a broker operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl OpOutcome {
	/// Stable label used in metric labels.
	pub const fn label(self) -> &'static str {
		match self {
			Self::Attempt => "attempt",
			Self::Success => "success",
			Self::Failure => "failure",
		}
	}

	fn of<T>(result: &Result<T>) -> Self {
		if result.is_ok() { Self::Success } else { Self::Failure }
	}
}

/// Runs `fut` inside the operation span, counting the attempt and its outcome.
pub async fn observe<T, F>(op: BrokerOp, stage: &'static str, fut: F) -> Result<T>
where
	F: Future<Output = Result<T>>,
{
	metrics::op(op, OpOutcome::Attempt);

	let result = tracing::in_span(op, stage, fut).await;

	metrics::op(op, OpOutcome::of(&result));

	result
}

/// Synchronous counterpart of [`observe`].
pub fn observe_sync<T>(
	op: BrokerOp,
	stage: &'static str,
	f: impl FnOnce() -> Result<T>,
) -> Result<T> {
	metrics::op(op, OpOutcome::Attempt);

	let result = tracing::in_span_sync(op, stage, f);

	metrics::op(op, OpOutcome::of(&result));

	result
}

/// Records a token cache lookup for `tenant`.
pub fn token_cache(tenant: &crate::auth::TenantId, hit: bool) {
	metrics::cache(hit);
	tracing::token_cache(tenant, hit);
}
