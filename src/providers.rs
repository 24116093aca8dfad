//! Built-in provider adapters.
//!
//! Each adapter binds the generic contract to one real provider: its production
//! endpoints, default scopes, and the wire shape of its profile payloads. Custom
//! providers live outside this module and implement
//! [`IdentityProvider`](crate::provider::IdentityProvider) directly.

pub mod github;
pub mod google;

pub use github::*;
pub use google::*;

// crates.io
use serde::de::DeserializeOwned;
use serde_json::Deserializer as JsonDeserializer;
// self
use crate::{
	_prelude::*,
	error::{ConfigError, NormalizationError, TransportError},
	http::HttpReply,
};

/// Parses a hardcoded endpoint constant; failures indicate a broken build-in table
/// rather than bad user configuration, but still surface as typed errors.
pub(crate) fn parse_endpoint(raw: &str) -> Result<Url, ConfigError> {
	Url::parse(raw).map_err(|source| ConfigError::InvalidEndpointUrl { url: raw.into(), source })
}

/// Classifies a profile-endpoint reply and deserializes its JSON body.
///
/// 5xx replies are provider outages, other non-2xx replies mean the provider refused
/// the token, and undeserializable bodies are normalization failures because the
/// provider answered with something the adapter's wire shape cannot represent.
pub(crate) fn parse_profile_reply<T>(reply: HttpReply) -> Result<T>
where
	T: DeserializeOwned,
{
	if !reply.is_success() {
		if reply.status >= 500 {
			return Err(TransportError::Upstream { status: reply.status }.into());
		}

		return Err(Error::ProviderRejected {
			reason: format!("profile endpoint answered HTTP {}", reply.status),
		});
	}

	let mut deserializer = JsonDeserializer::from_slice(&reply.body);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| NormalizationError::MalformedProfile { source }.into())
}
