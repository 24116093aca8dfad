/// Future wrapper type: instrumented when tracing is enabled, the bare future otherwise.
#[cfg(feature = "tracing")]
pub type InstrumentedFlow<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedFlow<F> = F;

pub use imp::{FlowSpan, FlowSpanGuard};

#[cfg(feature = "tracing")]
mod imp {
	// crates.io
	use tracing::{Instrument, Span, span::EnteredSpan};
	// self
	use super::InstrumentedFlow;
	use crate::{_prelude::*, obs::FlowKind};

	/// Span handle covering one authorization-flow operation.
	///
	/// Each span is tagged with the flow kind and the auth method it targets, so
	/// traces for the same provider can be correlated across the redirect/callback
	/// gap.
	#[derive(Clone, Debug)]
	pub struct FlowSpan(Span);
	impl FlowSpan {
		/// Opens a span for the given flow kind against the named auth method.
		pub fn new(kind: FlowKind, auth_method: &str) -> Self {
			Self(tracing::info_span!(
				"idp_broker.flow",
				flow = kind.as_str(),
				provider = auth_method
			))
		}

		/// Enters the span for a synchronous section, returning an RAII guard.
		pub fn entered(self) -> FlowSpanGuard {
			FlowSpanGuard(self.0.entered())
		}

		/// Attaches the span to a future; the guard-free form safe across `.await`
		/// points.
		pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedFlow<Fut>
		where
			Fut: Future,
		{
			fut.instrument(self.0.clone())
		}
	}

	/// RAII guard returned by [`FlowSpan::entered`].
	#[allow(dead_code)]
	pub struct FlowSpanGuard(EnteredSpan);
	impl Debug for FlowSpanGuard {
		fn fmt(&self, f: &mut Formatter) -> FmtResult {
			f.write_str("FlowSpanGuard(..)")
		}
	}
}
#[cfg(not(feature = "tracing"))]
mod imp {
	// self
	use super::InstrumentedFlow;
	use crate::{_prelude::*, obs::FlowKind};

	/// Span handle covering one authorization-flow operation; a no-op without the
	/// `tracing` feature.
	#[derive(Clone, Debug)]
	pub struct FlowSpan;
	impl FlowSpan {
		/// Opens a span for the given flow kind against the named auth method.
		pub fn new(_kind: FlowKind, _auth_method: &str) -> Self {
			Self
		}

		/// Enters the span for a synchronous section, returning an RAII guard.
		pub fn entered(self) -> FlowSpanGuard {
			FlowSpanGuard
		}

		/// Attaches the span to a future; the guard-free form safe across `.await`
		/// points.
		pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedFlow<Fut>
		where
			Fut: Future,
		{
			fut
		}
	}

	/// RAII guard returned by [`FlowSpan::entered`].
	pub struct FlowSpanGuard;
	impl Debug for FlowSpanGuard {
		fn fmt(&self, f: &mut Formatter) -> FmtResult {
			f.write_str("FlowSpanGuard(..)")
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::obs::FlowKind;

	#[test]
	fn flow_span_guard_outlives_creation() {
		let _guard = FlowSpan::new(FlowKind::Refresh, "google").entered();
	}

	#[cfg(feature = "tracing")]
	#[tokio::test]
	async fn instrument_passes_output_through() {
		let span = FlowSpan::new(FlowKind::Callback, "github");
		let value = span.instrument(async { 7 }).await;

		assert_eq!(value, 7);
	}
}
