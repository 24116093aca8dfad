//! Route metadata adapters publish so the router collaborator can mount them.
//!
//! This is declarative data, not executed logic: the router maps each definition onto
//! its own dispatch table under the adapter's base path and invokes the named
//! orchestrator operation on matching requests.

// self
use crate::_prelude::*;

/// HTTP methods an adapter route may declare.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
	/// HTTP GET.
	Get,
	/// HTTP POST.
	Post,
}
impl HttpMethod {
	/// Returns the uppercase wire label.
	pub const fn as_str(self) -> &'static str {
		match self {
			HttpMethod::Get => "GET",
			HttpMethod::Post => "POST",
		}
	}
}
impl Display for HttpMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Middleware the router must run before the handler.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Middleware {
	#[default]
	/// No middleware required.
	None,
	/// Parse the provider callback query and reject structurally invalid requests.
	VerifyCallback,
}

/// Orchestrator operation the route should be wired to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandlerKind {
	/// Invoke [`FlowEngine::continue_authorization`](crate::flow::FlowEngine::continue_authorization).
	ContinueAuthorization,
}

/// One mountable route: `{method, path, middleware, handler}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointDefinition {
	/// HTTP method to match.
	pub method: HttpMethod,
	/// Path relative to the adapter's base path.
	pub path: String,
	/// Middleware the router must apply.
	pub middleware: Middleware,
	/// Orchestrator operation to invoke.
	pub handler: HandlerKind,
}
impl EndpointDefinition {
	/// The provider callback endpoint every adapter needs at minimum.
	pub fn callback() -> Self {
		Self {
			method: HttpMethod::Get,
			path: "/callback".into(),
			middleware: Middleware::VerifyCallback,
			handler: HandlerKind::ContinueAuthorization,
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn callback_definition_matches_the_contract_minimum() {
		let endpoint = EndpointDefinition::callback();

		assert_eq!(endpoint.method, HttpMethod::Get);
		assert_eq!(endpoint.path, "/callback");
		assert_eq!(endpoint.middleware, Middleware::VerifyCallback);
		assert_eq!(endpoint.handler, HandlerKind::ContinueAuthorization);
	}

	#[test]
	fn definitions_serialize_for_router_consumption() {
		let payload = serde_json::to_string(&EndpointDefinition::callback())
			.expect("Endpoint metadata should serialize to JSON.");

		assert!(payload.contains("\"GET\""));
		assert!(payload.contains("\"verify_callback\""));
		assert!(payload.contains("\"continue_authorization\""));
	}
}
