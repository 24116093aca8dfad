//! Inbound request shapes and the redirect the orchestrator answers with.

// self
use crate::{
	_prelude::*,
	identity::{AuthMethodId, ScopeSet},
};

/// One authorization attempt, created per login attempt and immutable during the flow.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthRequest {
	/// Auth method selecting the adapter instance.
	pub auth_method_id: AuthMethodId,
	/// Requested scopes; the adapter's default scope applies when empty.
	#[serde(default)]
	pub scope: ScopeSet,
	/// Opaque client state echoed back to the caller after the flow completes.
	#[serde(default)]
	pub client_state: Option<String>,
}
impl AuthRequest {
	/// Creates a request for the given auth method with default scopes.
	pub fn new(auth_method_id: AuthMethodId) -> Self {
		Self { auth_method_id, scope: ScopeSet::default(), client_state: None }
	}

	/// Overrides the requested scopes.
	pub fn with_scope(mut self, scope: ScopeSet) -> Self {
		self.scope = scope;

		self
	}

	/// Attaches opaque client state.
	pub fn with_client_state(mut self, state: impl Into<String>) -> Self {
		self.client_state = Some(state.into());

		self
	}
}

/// Redirect the router collaborator must write to move the user to the provider's
/// consent screen. Producing this value is the whole of the `Init → Redirected`
/// transition; no application data exists yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RedirectAction {
	/// Fully formed authorize URL, including scopes and the signed relay state.
	pub url: Url,
}

/// Query parameters of the inbound provider callback.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackQuery {
	/// Authorization code, present on success.
	pub code: Option<String>,
	/// Relay state, round-tripped through the provider.
	pub state: Option<String>,
	/// OAuth error code, present when the provider denied the attempt.
	pub error: Option<String>,
	/// OAuth error description accompanying `error`.
	pub error_description: Option<String>,
}
impl CallbackQuery {
	/// Parses the query portion of a callback URL.
	pub fn from_url(url: &Url) -> Self {
		let mut query = Self::default();

		for (key, value) in url.query_pairs() {
			match key.as_ref() {
				"code" => query.code = Some(value.into_owned()),
				"state" => query.state = Some(value.into_owned()),
				"error" => query.error = Some(value.into_owned()),
				"error_description" => query.error_description = Some(value.into_owned()),
				_ => {},
			}
		}

		query
	}
}
