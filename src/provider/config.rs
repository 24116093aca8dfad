//! Per-provider configuration and the fatally validated credentials derived from it.

// self
use crate::{
	_prelude::*,
	error::ConfigError,
	identity::{AuthMethodId, TokenSecret},
};

/// Per-provider configuration object, deserialized from the gateway's auth method
/// configuration. Field names are camelCase on the wire.
///
/// `clientId` and `clientSecret` are required; their absence is a fatal configuration
/// error raised at adapter construction, before any request can be served.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IdpConfig {
	/// Provider-issued OAuth client identifier.
	pub client_id: Option<String>,
	/// Provider-issued OAuth client secret.
	pub client_secret: Option<String>,
	/// Public base URL of the gateway, used to build the adapter's callback URL.
	pub external_url_base: Option<Url>,
	/// Gateway base path, used to build failure redirects.
	pub base_path: Option<String>,
}
impl IdpConfig {
	/// Creates a configuration with the required credential pair.
	pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
		Self {
			client_id: Some(client_id.into()),
			client_secret: Some(client_secret.into()),
			external_url_base: None,
			base_path: None,
		}
	}

	/// Sets the public gateway base URL.
	pub fn with_external_url_base(mut self, base: Url) -> Self {
		self.external_url_base = Some(base);

		self
	}

	/// Sets the gateway base path.
	pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
		self.base_path = Some(base_path.into());

		self
	}
}

/// Validated provider credentials and the URLs computed from them.
///
/// Loaded once at adapter construction, immutable afterwards, and owned exclusively by
/// the adapter instance.
#[derive(Clone, Debug)]
pub struct ProviderCredentials {
	/// Provider-issued OAuth client identifier.
	pub client_id: String,
	/// Provider-issued OAuth client secret; also keys the relay-state digest.
	pub client_secret: TokenSecret,
	/// Callback URL registered with the provider:
	/// `{externalUrlBase}/{authMethodId}/callback`.
	pub callback_url: Url,
	/// Path the gateway redirects UI flows to on terminal failure:
	/// `{basePath}/failure`.
	pub failure_redirect: String,
}
impl ProviderCredentials {
	/// Validates the configuration and assembles the derived URLs.
	///
	/// Missing `clientId` or `clientSecret` fails here, fatally; a misconfigured adapter
	/// is never constructed, let alone registered.
	pub fn from_config(
		auth_method: &AuthMethodId,
		config: &IdpConfig,
	) -> Result<Self, ConfigError> {
		let client_id = config
			.client_id
			.as_deref()
			.map(str::trim)
			.filter(|id| !id.is_empty())
			.ok_or_else(|| ConfigError::MissingClientId { auth_method: auth_method.to_string() })?
			.to_owned();
		let client_secret = config
			.client_secret
			.as_deref()
			.map(str::trim)
			.filter(|secret| !secret.is_empty())
			.ok_or_else(|| ConfigError::MissingClientSecret {
				auth_method: auth_method.to_string(),
			})?;
		let base = config.external_url_base.as_ref().ok_or_else(|| {
			ConfigError::MissingExternalUrlBase { auth_method: auth_method.to_string() }
		})?;
		let callback_url = Url::parse(&format!(
			"{}/{auth_method}/callback",
			base.as_str().trim_end_matches('/')
		))
		.map_err(|source| ConfigError::InvalidCallbackUrl { source })?;
		let failure_redirect =
			format!("{}/failure", config.base_path.as_deref().unwrap_or_default().trim_end_matches('/'));

		#[cfg(feature = "tracing")]
		tracing::info!(
			auth_method = %auth_method,
			callback_url = %callback_url,
			"Expected provider callback URL."
		);

		Ok(Self {
			client_id,
			client_secret: TokenSecret::new(client_secret),
			callback_url,
			failure_redirect,
		})
	}
}
