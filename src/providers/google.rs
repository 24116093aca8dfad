//! Google login adapter.
//!
//! Talks to Google's OAuth 2.0 endpoints and maps the OpenID Connect `userinfo`
//! payload into [`RawProviderProfile`]. Google exposes no login-style username, so the
//! normalizer's display-name fallback chain supplies one.

// self
use crate::{
	_prelude::*,
	error::ConfigError,
	http::ProviderHttpClient,
	identity::{AuthMethodId, RawProviderProfile, ScopeSet},
	provider::{
		AdapterFuture, IdentityProvider, IdpConfig, ProviderCredentials, ProviderDescriptor,
	},
	providers,
};

const AUTHORIZATION_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const USER_INFO_ENDPOINT: &str = "https://openidconnect.googleapis.com/v1/userinfo";

/// Google identity provider adapter.
#[derive(Debug)]
pub struct GoogleIdp {
	auth_method_id: AuthMethodId,
	descriptor: ProviderDescriptor,
	credentials: ProviderCredentials,
}
impl GoogleIdp {
	/// Constructs the adapter from gateway configuration, validating credentials and
	/// assembling the callback URL up front.
	pub fn new(auth_method_id: AuthMethodId, config: &IdpConfig) -> Result<Self, ConfigError> {
		let credentials = ProviderCredentials::from_config(&auth_method_id, config)?;
		let descriptor = Self::default_descriptor()?;

		Ok(Self { auth_method_id, descriptor, credentials })
	}

	/// Replaces the endpoint descriptor, e.g. to point the adapter at a stand-in
	/// server.
	pub fn with_descriptor(mut self, descriptor: ProviderDescriptor) -> Self {
		self.descriptor = descriptor;

		self
	}

	/// Google's production endpoints with the `profile` + `email` default scopes.
	pub fn default_descriptor() -> Result<ProviderDescriptor, ConfigError> {
		let descriptor = ProviderDescriptor::builder()
			.authorization_endpoint(providers::parse_endpoint(AUTHORIZATION_ENDPOINT)?)
			.token_endpoint(providers::parse_endpoint(TOKEN_ENDPOINT)?)
			.user_info_endpoint(providers::parse_endpoint(USER_INFO_ENDPOINT)?)
			.default_scope(ScopeSet::new(["profile", "email"])?)
			.scope_delimiter(' ')
			.build()?;

		Ok(descriptor)
	}
}
impl IdentityProvider for GoogleIdp {
	fn provider_type(&self) -> &'static str {
		"google"
	}

	fn auth_method_id(&self) -> &AuthMethodId {
		&self.auth_method_id
	}

	fn descriptor(&self) -> &ProviderDescriptor {
		&self.descriptor
	}

	fn credentials(&self) -> &ProviderCredentials {
		&self.credentials
	}

	fn fetch_profile<'a>(
		&'a self,
		http: &'a dyn ProviderHttpClient,
		access_token: &'a str,
	) -> AdapterFuture<'a, RawProviderProfile> {
		Box::pin(async move {
			let reply =
				http.get_json(&self.descriptor.endpoints.user_info, access_token).await?;
			let info = providers::parse_profile_reply::<GoogleUserInfo>(reply)?;

			Ok(info.into_raw_profile())
		})
	}
}

/// Wire shape of Google's OpenID Connect `userinfo` response.
#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
	sub: String,
	#[serde(default)]
	name: Option<String>,
	#[serde(default)]
	given_name: Option<String>,
	#[serde(default)]
	family_name: Option<String>,
	#[serde(default)]
	email: Option<String>,
}
impl GoogleUserInfo {
	fn into_raw_profile(self) -> RawProviderProfile {
		RawProviderProfile {
			id: self.sub,
			display_name: self.name,
			username: None,
			given_name: self.given_name,
			family_name: self.family_name,
			emails: self.email.into_iter().collect(),
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn default_descriptor_is_valid() {
		let descriptor =
			GoogleIdp::default_descriptor().expect("Built-in Google endpoints must validate.");

		assert_eq!(descriptor.scope_delimiter, ' ');
		assert!(descriptor.default_scope.contains("profile"));
		assert!(descriptor.default_scope.contains("email"));
		assert!(descriptor.endpoints.user_emails.is_none());
	}

	#[test]
	fn userinfo_maps_into_raw_profile() {
		let info: GoogleUserInfo = serde_json::from_str(
			r#"{
				"sub": "1098413",
				"name": "Ann Lee",
				"given_name": "Ann",
				"family_name": "Lee",
				"email": "ann@example.com",
				"email_verified": true,
				"picture": "https://example.com/ann.png"
			}"#,
		)
		.expect("Sample userinfo payload should deserialize.");
		let profile = info.into_raw_profile();

		assert_eq!(profile.id, "1098413");
		assert_eq!(profile.display_name.as_deref(), Some("Ann Lee"));
		assert_eq!(profile.username, None);
		assert_eq!(profile.emails, ["ann@example.com"]);
	}

	#[test]
	fn userinfo_tolerates_sparse_payloads() {
		let info: GoogleUserInfo = serde_json::from_str(r#"{"sub":"42"}"#)
			.expect("A subject-only payload should deserialize.");
		let profile = info.into_raw_profile();

		assert_eq!(profile.id, "42");
		assert!(profile.emails.is_empty());
	}
}
