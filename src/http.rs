//! Transport primitives for provider-facing HTTP calls.
//!
//! [`ProviderHttpClient`] is the core's only dependency on an HTTP stack: flows and
//! adapters speak in terms of [`HttpReply`] values and crate-owned errors, never
//! transport-specific types. The default implementation wraps reqwest behind the
//! `reqwest` feature.

// self
use crate::{_prelude::*, error::TransportError};

/// User agent sent with every provider call; some providers (GitHub) reject requests
/// without one.
pub const USER_AGENT: &str = concat!("idp-broker/", env!("CARGO_PKG_VERSION"));

/// Boxed future returned by [`ProviderHttpClient`] operations.
pub type HttpFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, TransportError>> + 'a + Send>>;

/// Raw HTTP outcome surfaced to flows for status-aware error translation.
#[derive(Clone, Debug)]
pub struct HttpReply {
	/// HTTP status code.
	pub status: u16,
	/// Response body bytes.
	pub body: Vec<u8>,
}
impl HttpReply {
	/// Returns true for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Abstraction over HTTP transports capable of executing token exchanges and profile
/// fetches.
///
/// Implementations must be `Send + Sync + 'static` so a single client can serve many
/// concurrent authorization attempts. Transport-level failures map into
/// [`TransportError`]; non-2xx replies are returned as data so flows can classify them.
pub trait ProviderHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Submits an `application/x-www-form-urlencoded` POST, accepting JSON back.
	fn post_form<'a>(
		&'a self,
		url: &'a Url,
		form: &'a BTreeMap<String, String>,
	) -> HttpFuture<'a, HttpReply>;

	/// Submits a GET with a bearer token, accepting JSON back.
	fn get_json<'a>(&'a self, url: &'a Url, bearer: &'a str) -> HttpFuture<'a, HttpReply>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Both operations send an explicit `Accept: application/json` header because some
/// token endpoints (GitHub) default to form-encoded responses otherwise.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	async fn into_reply(response: reqwest::Response) -> Result<HttpReply, TransportError> {
		let status = response.status().as_u16();
		let body = response.bytes().await.map_err(TransportError::from)?.to_vec();

		Ok(HttpReply { status, body })
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ProviderHttpClient for ReqwestHttpClient {
	fn post_form<'a>(
		&'a self,
		url: &'a Url,
		form: &'a BTreeMap<String, String>,
	) -> HttpFuture<'a, HttpReply> {
		Box::pin(async move {
			let response = self
				.0
				.post(url.clone())
				.header(reqwest::header::ACCEPT, "application/json")
				.header(reqwest::header::USER_AGENT, USER_AGENT)
				.form(form)
				.send()
				.await
				.map_err(TransportError::from)?;

			Self::into_reply(response).await
		})
	}

	fn get_json<'a>(&'a self, url: &'a Url, bearer: &'a str) -> HttpFuture<'a, HttpReply> {
		Box::pin(async move {
			let response = self
				.0
				.get(url.clone())
				.bearer_auth(bearer)
				.header(reqwest::header::ACCEPT, "application/json")
				.header(reqwest::header::USER_AGENT, USER_AGENT)
				.send()
				.await
				.map_err(TransportError::from)?;

			Self::into_reply(response).await
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn reply_success_covers_2xx_only() {
		assert!(HttpReply { status: 200, body: Vec::new() }.is_success());
		assert!(HttpReply { status: 204, body: Vec::new() }.is_success());
		assert!(!HttpReply { status: 302, body: Vec::new() }.is_success());
		assert!(!HttpReply { status: 401, body: Vec::new() }.is_success());
		assert!(!HttpReply { status: 502, body: Vec::new() }.is_success());
	}
}
