//! Provider descriptor data structures shared by all adapters.
//!
//! A descriptor captures everything endpoint-shaped about a provider in a
//! transport-agnostic way so the orchestrator can run the same callback sequence
//! against any of them.

// self
use crate::{_prelude::*, identity::ScopeSet};

/// Endpoint set declared by a provider descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEndpoints {
	/// Authorization (consent screen) endpoint the UI flow redirects to.
	pub authorization: Url,
	/// Token endpoint used for the authorization-code exchange.
	pub token: Url,
	/// User-info endpoint the profile fetch reads from.
	pub user_info: Url,
	/// Optional secondary endpoint for email lookups (GitHub's `/user/emails`).
	pub user_emails: Option<Url>,
}

/// Immutable provider descriptor consumed by the orchestrator and adapters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
	/// Endpoint definitions exposed by the provider.
	pub endpoints: ProviderEndpoints,
	/// Scopes requested when an authorization request does not name its own.
	pub default_scope: ScopeSet,
	/// Character used to join scopes when constructing `scope` parameters.
	pub scope_delimiter: char,
}
impl ProviderDescriptor {
	/// Creates a new builder.
	pub fn builder() -> ProviderDescriptorBuilder {
		ProviderDescriptorBuilder::new()
	}
}

/// Errors raised while constructing or validating descriptors.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum ProviderDescriptorError {
	/// Authorization endpoint is required.
	#[error("Missing authorization endpoint.")]
	MissingAuthorizationEndpoint,
	/// Token endpoint is required.
	#[error("Missing token endpoint.")]
	MissingTokenEndpoint,
	/// User-info endpoint is required.
	#[error("Missing user-info endpoint.")]
	MissingUserInfoEndpoint,
	/// Non-loopback endpoints must use HTTPS.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Reject scope delimiters that are control characters.
	#[error("Scope delimiter must be a printable character.")]
	InvalidScopeDelimiter {
		/// Invalid delimiter that was supplied.
		delimiter: char,
	},
}

/// Builder for [`ProviderDescriptor`] values.
#[derive(Debug, Default)]
pub struct ProviderDescriptorBuilder {
	/// Authorization endpoint.
	pub authorization_endpoint: Option<Url>,
	/// Token endpoint.
	pub token_endpoint: Option<Url>,
	/// User-info endpoint.
	pub user_info_endpoint: Option<Url>,
	/// Optional email-list endpoint.
	pub user_emails_endpoint: Option<Url>,
	/// Default scopes.
	pub default_scope: ScopeSet,
	/// Scope delimiter (defaults to a space).
	pub scope_delimiter: Option<char>,
}
impl ProviderDescriptorBuilder {
	/// Creates an empty builder.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the authorization endpoint.
	pub fn authorization_endpoint(mut self, url: Url) -> Self {
		self.authorization_endpoint = Some(url);

		self
	}

	/// Sets the token endpoint.
	pub fn token_endpoint(mut self, url: Url) -> Self {
		self.token_endpoint = Some(url);

		self
	}

	/// Sets the user-info endpoint.
	pub fn user_info_endpoint(mut self, url: Url) -> Self {
		self.user_info_endpoint = Some(url);

		self
	}

	/// Sets the optional email-list endpoint.
	pub fn user_emails_endpoint(mut self, url: Url) -> Self {
		self.user_emails_endpoint = Some(url);

		self
	}

	/// Sets the default scope set.
	pub fn default_scope(mut self, scope: ScopeSet) -> Self {
		self.default_scope = scope;

		self
	}

	/// Overrides the scope delimiter.
	pub fn scope_delimiter(mut self, delimiter: char) -> Self {
		self.scope_delimiter = Some(delimiter);

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<ProviderDescriptor, ProviderDescriptorError> {
		let authorization = self
			.authorization_endpoint
			.ok_or(ProviderDescriptorError::MissingAuthorizationEndpoint)?;
		let token = self.token_endpoint.ok_or(ProviderDescriptorError::MissingTokenEndpoint)?;
		let user_info =
			self.user_info_endpoint.ok_or(ProviderDescriptorError::MissingUserInfoEndpoint)?;
		let descriptor = ProviderDescriptor {
			endpoints: ProviderEndpoints {
				authorization,
				token,
				user_info,
				user_emails: self.user_emails_endpoint,
			},
			default_scope: self.default_scope,
			scope_delimiter: self.scope_delimiter.unwrap_or(' '),
		};

		descriptor.validate()?;

		Ok(descriptor)
	}
}

impl ProviderDescriptor {
	/// Validates invariants for the descriptor.
	fn validate(&self) -> Result<(), ProviderDescriptorError> {
		validate_endpoint("authorization", &self.endpoints.authorization)?;
		validate_endpoint("token", &self.endpoints.token)?;
		validate_endpoint("user-info", &self.endpoints.user_info)?;

		if let Some(emails) = self.endpoints.user_emails.as_ref() {
			validate_endpoint("user-emails", emails)?;
		}
		if self.scope_delimiter.is_control() {
			return Err(ProviderDescriptorError::InvalidScopeDelimiter {
				delimiter: self.scope_delimiter,
			});
		}

		Ok(())
	}
}

// Plain HTTP is tolerated for loopback hosts only (local gateways, test doubles).
fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), ProviderDescriptorError> {
	if url.scheme() == "https" || is_loopback(url) {
		Ok(())
	} else {
		Err(ProviderDescriptorError::InsecureEndpoint { endpoint: name, url: url.to_string() })
	}
}

fn is_loopback(url: &Url) -> bool {
	match url.host() {
		Some(url::Host::Ipv4(ip)) => ip.is_loopback(),
		Some(url::Host::Ipv6(ip)) => ip.is_loopback(),
		Some(url::Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
		None => false,
	}
}
