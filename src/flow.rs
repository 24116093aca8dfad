//! Authorization flow orchestration.
//!
//! [`FlowEngine`] drives every login attempt through the same stage sequence
//! regardless of provider: build the redirect, receive the callback, exchange the
//! code, verify, normalize, and hand the canonical identity to the gateway's
//! [`Continuation`]. Adapters only contribute the provider-specific pieces; the
//! engine owns ordering, state verification, and failure translation.

pub mod request;
pub mod stage;
pub mod state;

pub use request::*;
pub use stage::*;
pub use state::*;

// std
use std::sync::atomic::{AtomicU64, Ordering};
// crates.io
use serde_json::Deserializer as JsonDeserializer;
// self
use crate::{
	_prelude::*,
	error::TransportError,
	http::{HttpReply, ProviderHttpClient},
	identity::{
		AuthMethodId, CallbackTokens, CanonicalIdentity, RefreshDecision, ResolvedIdentity,
		TokenInfo, TokenSecret,
	},
	normalize,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	provider::{IdentityProvider, ProviderRegistry},
};

/// Boxed future returned by [`Continuation`] implementations.
pub type ContinuationFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Downstream hook invoked once a callback has produced a canonical identity.
///
/// The gateway implements this to look up or create its own user record. The engine
/// never inspects the resolved user; it only forwards the continuation's answer.
pub trait Continuation
where
	Self: Send + Sync,
{
	/// Consumes the normalized identity and resolves it to a gateway user.
	fn continue_authorize<'a>(
		&'a self,
		request: &'a AuthRequest,
		identity: CanonicalIdentity,
	) -> ContinuationFuture<'a, ResolvedIdentity>;
}

/// Thread-safe counters for flow attempts.
#[derive(Debug, Default)]
pub struct FlowMetrics {
	attempts: AtomicU64,
	success: AtomicU64,
	failure: AtomicU64,
}
impl FlowMetrics {
	/// Returns the total number of flow attempts.
	pub fn attempts(&self) -> u64 {
		self.attempts.load(Ordering::Relaxed)
	}

	/// Returns the number of flows that completed successfully.
	pub fn successes(&self) -> u64 {
		self.success.load(Ordering::Relaxed)
	}

	/// Returns the number of flows that ended in the failed stage.
	pub fn failures(&self) -> u64 {
		self.failure.load(Ordering::Relaxed)
	}

	pub(crate) fn record_attempt(&self) {
		self.attempts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_success(&self) {
		self.success.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_failure(&self) {
		self.failure.fetch_add(1, Ordering::Relaxed);
	}
}

/// Coordinates authorization flows across every registered identity provider.
///
/// The engine owns the HTTP client, the adapter registry, and the shared metrics
/// recorder so adapters can stay free of transport and bookkeeping concerns.
pub struct FlowEngine<C>
where
	C: ProviderHttpClient,
{
	/// HTTP client used for token exchanges and profile fetches.
	pub http_client: Arc<C>,
	/// Registered provider adapters, keyed by auth method id.
	pub registry: ProviderRegistry,
	/// Shared counters for flow outcomes.
	pub metrics: Arc<FlowMetrics>,
}
impl<C> FlowEngine<C>
where
	C: ProviderHttpClient,
{
	/// Creates an engine over the provided registry and transport.
	pub fn new(registry: ProviderRegistry, http_client: impl Into<Arc<C>>) -> Self {
		Self { http_client: http_client.into(), registry, metrics: Default::default() }
	}

	/// Starts an interactive authorization flow.
	///
	/// Issues a signed relay state, asks the adapter for its authorization redirect,
	/// and returns the redirect for the gateway to send to the browser. The engine
	/// holds no state afterwards; everything a callback needs travels inside `state`.
	pub fn begin_authorization(&self, request: &AuthRequest) -> Result<RedirectAction> {
		const KIND: FlowKind = FlowKind::AuthorizeUi;

		let span = FlowSpan::new(KIND, &request.auth_method_id);
		let _guard = span.entered();

		obs::record_flow_outcome(KIND, &request.auth_method_id, FlowOutcome::Attempt);
		self.metrics.record_attempt();

		let mut attempt = FlowAttempt::start();
		let result = self.run_begin(request, &mut attempt);

		self.finish(KIND, &request.auth_method_id, &mut attempt, &result);

		result
	}

	/// Continues an authorization flow from the provider's callback.
	///
	/// Verifies the relay state, exchanges the code, fetches and verifies the raw
	/// profile, normalizes it, and hands the canonical identity to `continuation`.
	/// Verification always precedes normalization; no unverified profile is ever
	/// normalized.
	pub async fn continue_authorization(
		&self,
		auth_method: &AuthMethodId,
		query: &CallbackQuery,
		continuation: &dyn Continuation,
	) -> Result<ResolvedIdentity> {
		const KIND: FlowKind = FlowKind::Callback;

		let span = FlowSpan::new(KIND, auth_method);

		obs::record_flow_outcome(KIND, auth_method, FlowOutcome::Attempt);
		self.metrics.record_attempt();

		let mut attempt = FlowAttempt::resume_redirected();
		let result = span
			.instrument(self.run_callback(auth_method, query, continuation, &mut attempt))
			.await;

		self.finish(KIND, auth_method, &mut attempt, &result);

		result
	}

	/// Attempts headless username/password authorization.
	///
	/// Redirect-only adapters answer with [`Error::UnsupportedGrantType`] via the
	/// contract's default; the engine merely routes and records the outcome. The
	/// redirect state machine does not apply here: the adapter performs the whole
	/// exchange in one step, so the attempt never claims the redirect stages.
	pub async fn authorize_headless(
		&self,
		auth_method: &AuthMethodId,
		username: &str,
		password: &str,
	) -> Result<CanonicalIdentity> {
		const KIND: FlowKind = FlowKind::Headless;

		let span = FlowSpan::new(KIND, auth_method);

		obs::record_flow_outcome(KIND, auth_method, FlowOutcome::Attempt);
		self.metrics.record_attempt();

		let mut attempt = FlowAttempt::start();
		let result = span
			.instrument(async {
				let adapter = self.registry.resolve(auth_method)?;

				adapter.authorize_by_user_pass(username, password).await
			})
			.await;

		self.finish(KIND, auth_method, &mut attempt, &result);

		result
	}

	/// Asks the adapter whether a previously issued token may be refreshed.
	pub async fn check_refresh(
		&self,
		auth_method: &AuthMethodId,
		token: &TokenInfo,
	) -> Result<RefreshDecision> {
		const KIND: FlowKind = FlowKind::Refresh;

		let span = FlowSpan::new(KIND, auth_method);

		obs::record_flow_outcome(KIND, auth_method, FlowOutcome::Attempt);

		let result = span
			.instrument(async {
				let adapter = self.registry.resolve(auth_method)?;

				adapter.check_refresh_token(token).await
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, auth_method, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, auth_method, FlowOutcome::Failure),
		}

		result
	}

	fn run_begin(&self, request: &AuthRequest, attempt: &mut FlowAttempt) -> Result<RedirectAction> {
		let adapter = self.registry.resolve(&request.auth_method_id)?;
		let relay_state =
			RelayState::issue(request).encode(adapter.credentials().client_secret.expose());
		let redirect = adapter.authorize_with_ui(request, &relay_state)?;

		attempt.advance(FlowStage::Redirected);

		Ok(redirect)
	}

	async fn run_callback(
		&self,
		auth_method: &AuthMethodId,
		query: &CallbackQuery,
		continuation: &dyn Continuation,
		attempt: &mut FlowAttempt,
	) -> Result<ResolvedIdentity> {
		let adapter = self.registry.resolve(auth_method)?;

		attempt.advance(FlowStage::CallbackReceived);

		if let Some(code) = &query.error {
			return Err(Error::ProviderRejected {
				reason: format!("provider returned authorization error `{code}`"),
			});
		}

		let raw_state = query.state.as_deref().ok_or_else(|| Error::ProviderRejected {
			reason: "callback carried no state parameter".into(),
		})?;
		let relay =
			RelayState::decode(raw_state, adapter.credentials().client_secret.expose())?;

		if relay.auth_method_id != *auth_method {
			return Err(Error::ProviderRejected {
				reason: "relay state belongs to a different auth method".into(),
			});
		}

		let code = query.code.as_deref().ok_or_else(|| Error::ProviderRejected {
			reason: "callback carried no authorization code".into(),
		})?;
		let request = relay.into_request();
		let tokens = self.exchange_code(adapter.as_ref(), code).await?;
		let profile =
			adapter.fetch_profile(self.http_client.as_ref(), tokens.access_token.expose()).await?;

		adapter.verify_callback(&tokens, &profile)?;
		attempt.advance(FlowStage::Verified);

		let identity = normalize::normalize(auth_method, &profile)?;

		attempt.advance(FlowStage::Normalized);

		let resolved = continuation.continue_authorize(&request, identity).await?;

		attempt.advance(FlowStage::Completed);

		Ok(resolved)
	}

	async fn exchange_code(
		&self,
		adapter: &dyn IdentityProvider,
		code: &str,
	) -> Result<CallbackTokens> {
		let credentials = adapter.credentials();
		let form = BTreeMap::from([
			("grant_type".to_owned(), "authorization_code".to_owned()),
			("code".to_owned(), code.to_owned()),
			("redirect_uri".to_owned(), credentials.callback_url.to_string()),
			("client_id".to_owned(), credentials.client_id.clone()),
			("client_secret".to_owned(), credentials.client_secret.expose().to_owned()),
		]);
		let reply =
			self.http_client.post_form(&adapter.descriptor().endpoints.token, &form).await?;

		parse_token_reply(reply)
	}

	fn finish<T>(
		&self,
		kind: FlowKind,
		auth_method: &str,
		attempt: &mut FlowAttempt,
		result: &Result<T>,
	) {
		match result {
			Ok(_) => {
				self.metrics.record_success();
				obs::record_flow_outcome(kind, auth_method, FlowOutcome::Success);
			},
			Err(_) => {
				attempt.fail();
				self.metrics.record_failure();
				obs::record_flow_outcome(kind, auth_method, FlowOutcome::Failure);
			},
		}
	}
}
impl<C> Debug for FlowEngine<C>
where
	C: ProviderHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("FlowEngine")
			.field("registry", &self.registry)
			.field("metrics", &self.metrics)
			.finish()
	}
}

/// Token endpoint response shape shared by OAuth 2.0 providers.
#[derive(Debug, Deserialize)]
struct TokenResponse {
	access_token: String,
	#[serde(default)]
	refresh_token: Option<String>,
	#[serde(default)]
	expires_in: Option<i64>,
}

fn parse_token_reply(reply: HttpReply) -> Result<CallbackTokens> {
	if !reply.is_success() {
		if reply.status >= 500 {
			return Err(TransportError::Upstream { status: reply.status }.into());
		}

		return Err(Error::ProviderRejected {
			reason: format!("token endpoint answered HTTP {}", reply.status),
		});
	}

	let mut deserializer = JsonDeserializer::from_slice(&reply.body);
	let response: TokenResponse =
		serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
			Error::ProviderRejected {
				reason: format!("token endpoint returned a malformed body at `{}`", err.path()),
			}
		})?;
	let expires_at =
		response.expires_in.map(|secs| OffsetDateTime::now_utc() + Duration::seconds(secs));

	Ok(CallbackTokens {
		access_token: TokenSecret::new(response.access_token),
		refresh_token: response.refresh_token.map(TokenSecret::new),
		expires_at,
	})
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn reply(status: u16, body: &str) -> HttpReply {
		HttpReply { status, body: body.as_bytes().to_vec() }
	}

	#[test]
	fn token_reply_parses_full_responses() {
		let tokens = parse_token_reply(reply(
			200,
			r#"{"access_token":"at-1","token_type":"bearer","refresh_token":"rt-1","expires_in":3600}"#,
		))
		.expect("A complete token response should parse.");

		assert_eq!(tokens.access_token.expose(), "at-1");
		assert_eq!(tokens.refresh_token.as_ref().map(TokenSecret::expose), Some("rt-1"));
		assert!(tokens.expires_at.is_some());
	}

	#[test]
	fn token_reply_tolerates_minimal_responses() {
		let tokens = parse_token_reply(reply(200, r#"{"access_token":"at-2"}"#))
			.expect("A bare access token should parse.");

		assert!(tokens.refresh_token.is_none());
		assert!(tokens.expires_at.is_none());
	}

	#[test]
	fn token_reply_maps_client_errors_to_rejections() {
		let err = parse_token_reply(reply(400, r#"{"error":"invalid_grant"}"#))
			.expect_err("A 4xx token reply must be a provider rejection.");

		assert!(matches!(err, Error::ProviderRejected { .. }));
	}

	#[test]
	fn token_reply_maps_server_errors_to_network_failures() {
		let err = parse_token_reply(reply(502, ""))
			.expect_err("A 5xx token reply must be a network failure.");

		assert!(matches!(err, Error::Network(TransportError::Upstream { status: 502 })));
	}

	#[test]
	fn token_reply_rejects_malformed_bodies() {
		let err = parse_token_reply(reply(200, r#"{"access_token":42}"#))
			.expect_err("A malformed token body must be a provider rejection.");

		assert!(matches!(err, Error::ProviderRejected { .. }));
	}

	#[test]
	fn metrics_count_outcomes() {
		let metrics = FlowMetrics::default();

		metrics.record_attempt();
		metrics.record_attempt();
		metrics.record_success();
		metrics.record_failure();

		assert_eq!(metrics.attempts(), 2);
		assert_eq!(metrics.successes(), 1);
		assert_eq!(metrics.failures(), 1);
	}
}
