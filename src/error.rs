//! Typed error taxonomy shared across adapters and the flow orchestrator, plus the
//! failure translator that turns every error into one stable, externally safe response.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical adapter-core error exposed by public APIs.
///
/// Construction-time failures surface as [`Error::Config`] and are fatal: the adapter is
/// never registered. Everything else is a per-request failure that the translator maps
/// into exactly one [`FailureResponse`].
#[derive(Debug, ThisError)]
pub enum Error {
	/// Adapter misconfiguration detected at construction.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS) or upstream provider outage.
	#[error(transparent)]
	Network(#[from] TransportError),
	/// Raw provider profile could not be normalized.
	#[error(transparent)]
	Normalization(#[from] NormalizationError),

	/// Headless credential authorization against a provider that cannot support it.
	#[error("Provider `{provider}` does not support headless username/password authorization.")]
	UnsupportedGrantType {
		/// Provider type label (e.g., `google`).
		provider: String,
	},
	/// No adapter is registered under the requested auth method identifier.
	#[error("No identity provider is registered under `{auth_method}`.")]
	UnknownProvider {
		/// Auth method identifier that failed to resolve.
		auth_method: String,
	},
	/// Provider-side denial during callback handling (user declined, bad code, bad state).
	#[error("Provider rejected the authorization attempt: {reason}.")]
	ProviderRejected {
		/// Internal summary of the rejection; never surfaced to callers verbatim.
		reason: String,
	},
}
impl Error {
	/// Translates the error into its stable externally visible form.
	///
	/// The returned response carries only the typed code and a fixed human-readable
	/// message; provider-raw error text and source chains stay inside the process.
	pub fn to_failure(&self) -> FailureResponse {
		let code = self.failure_code();

		FailureResponse {
			code,
			message: code.message(),
			status: code.status(),
			redirect: None,
		}
	}

	/// Returns the stable failure code for this error.
	pub fn failure_code(&self) -> FailureCode {
		match self {
			Error::Config(_) => FailureCode::ConfigurationError,
			Error::Network(_) => FailureCode::NetworkError,
			Error::Normalization(_) => FailureCode::NormalizationError,
			Error::UnsupportedGrantType { .. } => FailureCode::UnsupportedGrantType,
			Error::UnknownProvider { .. } => FailureCode::UnknownProvider,
			Error::ProviderRejected { .. } => FailureCode::ProviderRejected,
		}
	}
}

/// Configuration and validation failures raised while constructing adapters.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Required `clientId` option is absent.
	#[error("Auth method `{auth_method}`: the `clientId` configuration property is missing.")]
	MissingClientId {
		/// Auth method identifier being configured.
		auth_method: String,
	},
	/// Required `clientSecret` option is absent.
	#[error("Auth method `{auth_method}`: the `clientSecret` configuration property is missing.")]
	MissingClientSecret {
		/// Auth method identifier being configured.
		auth_method: String,
	},
	/// Required `externalUrlBase` option is absent; the callback URL cannot be built.
	#[error("Auth method `{auth_method}`: the `externalUrlBase` configuration property is missing.")]
	MissingExternalUrlBase {
		/// Auth method identifier being configured.
		auth_method: String,
	},
	/// Computed callback URL cannot be parsed.
	#[error("Callback URL assembled from `externalUrlBase` is invalid.")]
	InvalidCallbackUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A provider endpoint URL cannot be parsed.
	#[error("Provider endpoint URL `{url}` is invalid.")]
	InvalidEndpointUrl {
		/// Offending URL text.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Provider descriptor failed validation.
	#[error(transparent)]
	InvalidDescriptor(#[from] crate::provider::ProviderDescriptorError),
	/// Identifier validation failed.
	#[error(transparent)]
	InvalidIdentifier(#[from] crate::identity::IdentifierError),
	/// Requested scopes cannot be normalized.
	#[error("Requested scopes are invalid.")]
	InvalidScope(#[from] crate::identity::ScopeValidationError),
	/// An adapter is already registered under the same auth method identifier.
	#[error("An adapter is already registered under `{auth_method}`.")]
	DuplicateAuthMethod {
		/// Conflicting auth method identifier.
		auth_method: String,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}

/// Transport-level failures (network, upstream outages).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the provider.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Provider endpoint answered with a server-side failure status.
	#[error("Provider endpoint returned a server-side failure (HTTP {status}).")]
	Upstream {
		/// HTTP status code returned by the provider.
		status: u16,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Failures raised by the profile normalizer.
#[derive(Debug, ThisError)]
pub enum NormalizationError {
	/// Provider profile carries no usable subject identifier.
	#[error("Provider profile is missing a subject identifier.")]
	MissingSubject,
	/// Neither display name nor provider username yields a non-empty candidate.
	#[error("Provider profile yields no usable username.")]
	NoUsableUsername,
	/// Provider payload could not be decoded into the expected wire shape.
	#[error("Provider profile payload is malformed.")]
	MalformedProfile {
		/// Structured parsing failure, including the offending JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}

/// Stable machine-readable failure codes surfaced uniformly regardless of provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCode {
	/// Adapter misconfigured; raised at construction and fatal.
	ConfigurationError,
	/// Headless authorization is not supported by the provider.
	UnsupportedGrantType,
	/// Requested auth method does not resolve to a registered adapter.
	UnknownProvider,
	/// Provider denied the authorization attempt.
	ProviderRejected,
	/// Transport failure while talking to the provider.
	NetworkError,
	/// Verified profile could not be normalized.
	NormalizationError,
}
impl FailureCode {
	/// Returns the stable wire label for the code.
	pub const fn as_str(self) -> &'static str {
		match self {
			FailureCode::ConfigurationError => "configuration_error",
			FailureCode::UnsupportedGrantType => "unsupported_grant_type",
			FailureCode::UnknownProvider => "unknown_provider",
			FailureCode::ProviderRejected => "provider_rejected",
			FailureCode::NetworkError => "network_error",
			FailureCode::NormalizationError => "normalization_error",
		}
	}

	/// Returns the HTTP status the gateway should answer with.
	pub const fn status(self) -> u16 {
		match self {
			FailureCode::ConfigurationError => 500,
			FailureCode::UnsupportedGrantType => 400,
			FailureCode::UnknownProvider => 404,
			FailureCode::ProviderRejected => 401,
			FailureCode::NetworkError => 502,
			FailureCode::NormalizationError => 500,
		}
	}

	/// Returns the fixed human-readable message paired with the code.
	pub const fn message(self) -> &'static str {
		match self {
			FailureCode::ConfigurationError => "The authentication method is misconfigured.",
			FailureCode::UnsupportedGrantType =>
				"This provider does not support username/password authorization.",
			FailureCode::UnknownProvider => "The requested authentication method does not exist.",
			FailureCode::ProviderRejected => "The identity provider rejected the login attempt.",
			FailureCode::NetworkError => "The identity provider could not be reached.",
			FailureCode::NormalizationError => "The identity provider returned an unusable profile.",
		}
	}
}
impl Display for FailureCode {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Externally visible failure shape written by the gateway on any terminal flow failure.
///
/// Exactly one of these is produced per failed authorization attempt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FailureResponse {
	/// Stable machine-readable code.
	pub code: FailureCode,
	/// Fixed human-readable message; never contains provider-raw error text.
	pub message: &'static str,
	/// HTTP status the router collaborator should answer with.
	pub status: u16,
	/// Optional failure redirect for UI flows (the adapter's configured `{basePath}/failure`).
	pub redirect: Option<String>,
}
impl FailureResponse {
	/// Attaches the UI-flow failure redirect.
	pub fn with_redirect(mut self, redirect: impl Into<String>) -> Self {
		self.redirect = Some(redirect.into());

		self
	}
}
