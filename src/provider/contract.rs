//! The capability interface every identity-provider integration implements.
//!
//! The contract is deliberately dyn-safe: optional operations carry default bodies so
//! a redirect-only OAuth2 provider is complete after supplying its descriptor,
//! credentials, and profile fetch. The default `authorize_by_user_pass` failure is a
//! required behavior, not a stub: redirect-only providers must answer headless
//! credential checks with a typed `UnsupportedGrantType` error.

// self
use crate::{
	_prelude::*,
	flow::{AuthRequest, RedirectAction},
	http::ProviderHttpClient,
	identity::{
		AuthMethodId, CallbackTokens, CanonicalIdentity, RawProviderProfile, RefreshDecision,
		TokenInfo,
	},
	provider::{EndpointDefinition, ProviderCredentials, ProviderDescriptor},
};

/// Boxed future returned by asynchronous adapter operations, keeping the contract
/// object-safe for `Arc<dyn IdentityProvider>` registries.
pub type AdapterFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Capability contract for one configured identity provider.
///
/// Implementations are constructed once, hold no per-attempt state, and must be safe
/// for concurrent use across many simultaneous authorization attempts.
pub trait IdentityProvider: Send + Sync {
	/// Stable provider type label (e.g., `google`).
	fn provider_type(&self) -> &'static str;

	/// Auth method identifier this adapter instance is registered under.
	fn auth_method_id(&self) -> &AuthMethodId;

	/// Validated endpoint metadata for the provider.
	fn descriptor(&self) -> &ProviderDescriptor;

	/// Validated credentials and derived URLs.
	fn credentials(&self) -> &ProviderCredentials;

	/// Begins the redirect-based flow: builds the consent-screen redirect for the
	/// request, carrying the signed relay state through the provider round trip.
	///
	/// The transition to the provider is the redirect itself; no application data is
	/// produced yet. The default implementation covers the standard
	/// `response_type=code` query; providers add extras via
	/// [`augment_authorize_url`](Self::augment_authorize_url).
	fn authorize_with_ui(&self, request: &AuthRequest, relay_state: &str) -> Result<RedirectAction> {
		let descriptor = self.descriptor();
		let credentials = self.credentials();
		let mut url = descriptor.endpoints.authorization.clone();

		{
			let mut pairs = url.query_pairs_mut();

			pairs.append_pair("response_type", "code");
			pairs.append_pair("client_id", &credentials.client_id);
			pairs.append_pair("redirect_uri", credentials.callback_url.as_str());

			let scope =
				if request.scope.is_empty() { &descriptor.default_scope } else { &request.scope };

			if let Some(value) = scope.joined(descriptor.scope_delimiter) {
				pairs.append_pair("scope", &value);
			}

			pairs.append_pair("state", relay_state);
		}

		self.augment_authorize_url(&mut url);

		Ok(RedirectAction { url })
	}

	/// Hook for provider-specific authorize-URL parameters (prompt, access_type, …).
	///
	/// The default implementation does nothing, which is enough for most providers.
	fn augment_authorize_url(&self, _url: &mut Url) {}

	/// Attempts headless (non-redirect) authentication with directly supplied
	/// credentials.
	///
	/// Redirect-only OAuth2 providers cannot verify a username/password pair; the
	/// default implementation therefore fails with
	/// [`Error::UnsupportedGrantType`] and never attempts a partial exchange.
	fn authorize_by_user_pass<'a>(
		&'a self,
		_username: &'a str,
		_password: &'a str,
	) -> AdapterFuture<'a, CanonicalIdentity> {
		Box::pin(async move {
			Err(Error::UnsupportedGrantType { provider: self.provider_type().into() })
		})
	}

	/// Decides whether a previously issued token may be refreshed without
	/// re-authentication.
	///
	/// Default policy: allow. Third-party IdPs expose no revocation signal the gateway
	/// could consult, so the check cannot do better than trust the provider; adapters
	/// with a server-side signal should override this.
	fn check_refresh_token<'a>(&'a self, _token: &'a TokenInfo) -> AdapterFuture<'a, RefreshDecision> {
		Box::pin(async move { Ok(RefreshDecision::allow()) })
	}

	/// Fetches the raw user profile from the provider and maps its wire shape into the
	/// common [`RawProviderProfile`] form.
	fn fetch_profile<'a>(
		&'a self,
		http: &'a dyn ProviderHttpClient,
		access_token: &'a str,
	) -> AdapterFuture<'a, RawProviderProfile>;

	/// Verifies the exchanged tokens and raw profile before normalization.
	///
	/// Runs invariably after the token exchange and before the normalizer; no profile
	/// reaches normalization unverified. The default implementation accepts every
	/// profile the provider authenticated, which matches plain OAuth2 providers.
	fn verify_callback(
		&self,
		_tokens: &CallbackTokens,
		_profile: &RawProviderProfile,
	) -> Result<()> {
		Ok(())
	}

	/// Declares the additional HTTP routes the adapter needs; metadata only.
	fn endpoints(&self) -> Vec<EndpointDefinition> {
		vec![EndpointDefinition::callback()]
	}
}
