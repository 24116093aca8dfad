// self
use crate::obs::{FlowKind, FlowOutcome};

/// Bumps the flow counter via the global metrics recorder (when enabled).
///
/// Counters are labeled per flow kind, per auth method, and per outcome, so a
/// dashboard can watch a single provider's failure rate in isolation.
pub fn record_flow_outcome(kind: FlowKind, auth_method: &str, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"idp_broker_flow_total",
			"flow" => kind.as_str(),
			"provider" => auth_method.to_owned(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, auth_method, outcome);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn record_flow_outcome_noop_without_metrics() {
		record_flow_outcome(FlowKind::Callback, "google", FlowOutcome::Failure);
	}
}
