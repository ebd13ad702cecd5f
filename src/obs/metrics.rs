// self
use crate::obs::{BrokerOp, OpOutcome};

pub(super) fn op(op: BrokerOp, outcome: OpOutcome) {
	#[cfg(feature = "metrics")]
	metrics::counter!(
		"tenant_broker_op_total",
		"op" => op.label(),
		"outcome" => outcome.label()
	)
	.increment(1);
	#[cfg(not(feature = "metrics"))]
	let _ = (op, outcome);
}

pub(super) fn cache(hit: bool) {
	#[cfg(feature = "metrics")]
	metrics::counter!("tenant_broker_token_cache_total", "result" => if hit { "hit" } else { "miss" })
		.increment(1);
	#[cfg(not(feature = "metrics"))]
	let _ = hit;
}
