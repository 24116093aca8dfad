//! The per-attempt authorization state machine.
//!
//! `Init → Redirected → CallbackReceived → Verified → Normalized → Completed`, with
//! `Failed` reachable from every non-terminal stage. The redirect gap between
//! `Redirected` and `CallbackReceived` spans two independent HTTP exchanges; the
//! orchestrator resumes the walk from the callback itself, holding nothing in between.

// self
use crate::_prelude::*;

/// Stages an authorization attempt moves through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowStage {
	/// Request constructed and the adapter resolved.
	Init,
	/// Consent-screen redirect produced; the attempt now lives in the user's browser.
	Redirected,
	/// Provider callback arrived.
	CallbackReceived,
	/// Token exchange completed and the adapter accepted the raw profile.
	Verified,
	/// Canonical identity built.
	Normalized,
	/// Identity handed to the continuation collaborator; terminal.
	Completed,
	/// Terminal failure; exactly one failure response is produced.
	Failed,
}
impl FlowStage {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowStage::Init => "init",
			FlowStage::Redirected => "redirected",
			FlowStage::CallbackReceived => "callback_received",
			FlowStage::Verified => "verified",
			FlowStage::Normalized => "normalized",
			FlowStage::Completed => "completed",
			FlowStage::Failed => "failed",
		}
	}

	/// Returns true for the two terminal stages.
	pub const fn is_terminal(self) -> bool {
		matches!(self, FlowStage::Completed | FlowStage::Failed)
	}

	/// Returns true when `self → to` is a legal transition.
	pub const fn can_transition(self, to: FlowStage) -> bool {
		if matches!(to, FlowStage::Failed) {
			return !self.is_terminal();
		}

		matches!(
			(self, to),
			(FlowStage::Init, FlowStage::Redirected)
				| (FlowStage::Redirected, FlowStage::CallbackReceived)
				| (FlowStage::CallbackReceived, FlowStage::Verified)
				| (FlowStage::Verified, FlowStage::Normalized)
				| (FlowStage::Normalized, FlowStage::Completed)
		)
	}
}
impl Display for FlowStage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Tracks one attempt's walk through the state machine.
///
/// The orchestrator advances this monotonically; `advance` asserts legality in debug
/// builds because the call sites encode the only legal order.
#[derive(Clone, Copy, Debug)]
pub struct FlowAttempt {
	stage: FlowStage,
}
impl FlowAttempt {
	/// Starts a fresh attempt at `Init`.
	pub fn start() -> Self {
		Self { stage: FlowStage::Init }
	}

	/// Resumes an attempt at `Redirected`, reconstructed from the inbound callback.
	///
	/// Sessions are disabled for this flow, so nothing in-process survived the gap; the
	/// relay state the provider round-tripped is the sole carrier of context.
	pub fn resume_redirected() -> Self {
		Self { stage: FlowStage::Redirected }
	}

	/// Current stage.
	pub fn stage(&self) -> FlowStage {
		self.stage
	}

	/// Advances to the next stage.
	pub fn advance(&mut self, to: FlowStage) {
		debug_assert!(
			self.stage.can_transition(to),
			"illegal flow transition {} -> {}",
			self.stage,
			to,
		);

		self.stage = to;
	}

	/// Marks the attempt as terminally failed.
	pub fn fail(&mut self) {
		debug_assert!(!self.stage.is_terminal(), "flow already terminal at {}", self.stage);

		self.stage = FlowStage::Failed;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn happy_path_transitions_are_legal() {
		let chain = [
			FlowStage::Init,
			FlowStage::Redirected,
			FlowStage::CallbackReceived,
			FlowStage::Verified,
			FlowStage::Normalized,
			FlowStage::Completed,
		];

		for pair in chain.windows(2) {
			assert!(pair[0].can_transition(pair[1]), "{} -> {} must be legal", pair[0], pair[1]);
		}
	}

	#[test]
	fn failed_is_reachable_from_every_non_terminal_stage() {
		for stage in [
			FlowStage::Init,
			FlowStage::Redirected,
			FlowStage::CallbackReceived,
			FlowStage::Verified,
			FlowStage::Normalized,
		] {
			assert!(stage.can_transition(FlowStage::Failed));
		}

		assert!(!FlowStage::Completed.can_transition(FlowStage::Failed));
		assert!(!FlowStage::Failed.can_transition(FlowStage::Failed));
	}

	#[test]
	fn skipping_stages_is_illegal() {
		assert!(!FlowStage::Init.can_transition(FlowStage::CallbackReceived));
		assert!(!FlowStage::CallbackReceived.can_transition(FlowStage::Normalized));
		assert!(!FlowStage::Completed.can_transition(FlowStage::Init));
		assert!(!FlowStage::Verified.can_transition(FlowStage::CallbackReceived));
	}

	#[test]
	fn attempt_walks_and_fails_once() {
		let mut attempt = FlowAttempt::start();

		assert_eq!(attempt.stage(), FlowStage::Init);

		attempt.advance(FlowStage::Redirected);

		assert_eq!(attempt.stage(), FlowStage::Redirected);

		let mut resumed = FlowAttempt::resume_redirected();

		resumed.advance(FlowStage::CallbackReceived);
		resumed.fail();

		assert_eq!(resumed.stage(), FlowStage::Failed);
		assert!(resumed.stage().is_terminal());
	}
}
