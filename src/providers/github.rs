//! GitHub login adapter.
//!
//! GitHub's `/user` payload omits the email unless it is public, so the adapter also
//! queries `/user/emails` (best effort) and orders the results so the primary verified
//! address comes first. GitHub supplies a real login, which becomes the username
//! fallback.

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

const AUTHORIZATION_ENDPOINT: &str = "https://github.com/login/oauth/authorize";
const TOKEN_ENDPOINT: &str = "https://github.com/login/oauth/access_token";
const USER_INFO_ENDPOINT: &str = "https://api.github.com/user";
const USER_EMAILS_ENDPOINT: &str = "https://api.github.com/user/emails";

/// GitHub identity provider adapter.
#[derive(Debug)]
pub struct GitHubIdp {
	auth_method_id: AuthMethodId,
	descriptor: ProviderDescriptor,
	credentials: ProviderCredentials,
}
impl GitHubIdp {
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

	/// GitHub's production endpoints, including the separate emails listing.
	pub fn default_descriptor() -> Result<ProviderDescriptor, ConfigError> {
		let descriptor = ProviderDescriptor::builder()
			.authorization_endpoint(providers::parse_endpoint(AUTHORIZATION_ENDPOINT)?)
			.token_endpoint(providers::parse_endpoint(TOKEN_ENDPOINT)?)
			.user_info_endpoint(providers::parse_endpoint(USER_INFO_ENDPOINT)?)
			.user_emails_endpoint(providers::parse_endpoint(USER_EMAILS_ENDPOINT)?)
			.default_scope(ScopeSet::new(["read:user", "user:email"])?)
			.scope_delimiter(' ')
			.build()?;

		Ok(descriptor)
	}
}
impl IdentityProvider for GitHubIdp {
	fn provider_type(&self) -> &'static str {
		"github"
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
			let user = providers::parse_profile_reply::<GitHubUser>(reply)?;
			// Email listing is best effort; a user without the `user:email` scope still
			// gets a profile, just without addresses.
			let emails = match &self.descriptor.endpoints.user_emails {
				Some(endpoint) => match http.get_json(endpoint, access_token).await {
					Ok(reply) if reply.is_success() =>
						providers::parse_profile_reply::<Vec<GitHubEmail>>(reply)
							.unwrap_or_default(),
					_ => Vec::new(),
				},
				None => Vec::new(),
			};

			Ok(into_raw_profile(user, emails))
		})
	}
}

/// Wire shape of GitHub's `/user` response.
#[derive(Debug, Deserialize)]
struct GitHubUser {
	id: u64,
	login: String,
	#[serde(default)]
	name: Option<String>,
	#[serde(default)]
	email: Option<String>,
}

/// Wire shape of one entry in GitHub's `/user/emails` response.
#[derive(Debug, Deserialize)]
struct GitHubEmail {
	email: String,
	#[serde(default)]
	primary: bool,
	#[serde(default)]
	verified: bool,
}

fn into_raw_profile(user: GitHubUser, mut emails: Vec<GitHubEmail>) -> RawProviderProfile {
	// Primary verified address first, then remaining verified ones.
	emails.sort_by_key(|entry| (!entry.primary, !entry.verified));

	let mut addresses: Vec<_> = emails
		.into_iter()
		.filter(|entry| entry.verified)
		.map(|entry| entry.email)
		.collect();

	if addresses.is_empty() {
		addresses.extend(user.email);
	}

	RawProviderProfile {
		id: user.id.to_string(),
		display_name: user.name,
		username: Some(user.login),
		given_name: None,
		family_name: None,
		emails: addresses,
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn user(json: &str) -> GitHubUser {
		serde_json::from_str(json).expect("Sample user payload should deserialize.")
	}

	#[test]
	fn default_descriptor_is_valid() {
		let descriptor =
			GitHubIdp::default_descriptor().expect("Built-in GitHub endpoints must validate.");

		assert!(descriptor.endpoints.user_emails.is_some());
		assert!(descriptor.default_scope.contains("user:email"));
	}

	#[test]
	fn primary_verified_email_wins() {
		let emails: Vec<GitHubEmail> = serde_json::from_str(
			r#"[
				{"email": "old@example.com", "primary": false, "verified": true},
				{"email": "spam@example.com", "primary": false, "verified": false},
				{"email": "ann@example.com", "primary": true, "verified": true}
			]"#,
		)
		.expect("Sample emails payload should deserialize.");
		let profile =
			into_raw_profile(user(r#"{"id": 583231, "login": "annlee"}"#), emails);

		assert_eq!(profile.emails, ["ann@example.com", "old@example.com"]);
		assert_eq!(profile.username.as_deref(), Some("annlee"));
		assert_eq!(profile.id, "583231");
	}

	#[test]
	fn public_profile_email_is_the_fallback() {
		let profile = into_raw_profile(
			user(r#"{"id": 1, "login": "annlee", "email": "public@example.com"}"#),
			Vec::new(),
		);

		assert_eq!(profile.emails, ["public@example.com"]);
	}

	#[test]
	fn missing_emails_stay_missing() {
		let profile = into_raw_profile(user(r#"{"id": 1, "login": "annlee"}"#), Vec::new());

		assert!(profile.emails.is_empty());
	}
}
