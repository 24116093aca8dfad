//! Identity-provider adapter core—one authorization flow, one canonical identity, any OAuth 2.0
//! login provider behind an authentication gateway.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod error;
pub mod flow;
pub mod http;
pub mod identity;
pub mod normalize;
pub mod obs;
pub mod provider;
pub mod providers;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// std
	use std::sync::Mutex;
	// self
	use crate::{
		flow::{AuthRequest, Continuation, ContinuationFuture, FlowEngine},
		http::ReqwestHttpClient,
		identity::{CanonicalIdentity, ResolvedIdentity, UserId},
		provider::{IdentityProvider, ProviderRegistry},
	};

	/// Flow engine type alias used by reqwest-backed integration tests.
	pub type ReqwestTestEngine = FlowEngine<ReqwestHttpClient>;

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Constructs a [`FlowEngine`] over the provided adapters and the reqwest transport used
	/// across integration tests.
	pub fn build_reqwest_test_engine(
		adapters: impl IntoIterator<Item = Arc<dyn IdentityProvider>>,
	) -> ReqwestTestEngine {
		let mut registry = ProviderRegistry::new();

		for adapter in adapters {
			registry.register(adapter).expect("Test adapters should register without conflicts.");
		}

		FlowEngine::new(registry, test_reqwest_http_client())
	}

	/// Continuation stub that records every handed-off identity and assigns a fixed user id.
	#[derive(Debug, Default)]
	pub struct RecordingContinuation {
		/// Identities received from the orchestrator, in arrival order.
		pub received: Mutex<Vec<CanonicalIdentity>>,
	}
	impl Continuation for RecordingContinuation {
		fn continue_authorize<'a>(
			&'a self,
			_request: &'a AuthRequest,
			identity: CanonicalIdentity,
		) -> ContinuationFuture<'a, ResolvedIdentity> {
			Box::pin(async move {
				self.received
					.lock()
					.expect("Recording continuation lock should never be poisoned.")
					.push(identity.clone());

				let user_id = UserId::new("user-under-test")
					.expect("Fixed test user id should be considered valid.");

				Ok(ResolvedIdentity { user_id, identity })
			})
		}
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _, tokio as _};
