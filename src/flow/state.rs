//! Signed relay state bridging the redirect gap without server-side sessions.
//!
//! The orchestrator holds nothing between the redirect and the callback: the `state`
//! query parameter itself carries the authorization context, as URL-safe base64 JSON
//! followed by an HMAC-SHA256 tag. The adapter's client secret keys the MAC, so a
//! callback can only resume flows the same adapter started.

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use rand::{Rng, distr::Alphanumeric};
use sha2::Sha256;
// self
use crate::{
	_prelude::*,
	flow::AuthRequest,
	identity::{AuthMethodId, ScopeSet},
};

const NONCE_LEN: usize = 32;
const TAG_SEPARATOR: char = '.';

type TagMac = Hmac<Sha256>;

/// Authorization context round-tripped through the provider inside the `state`
/// parameter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayState {
	/// Auth method that started the flow.
	pub auth_method_id: AuthMethodId,
	/// Scopes the attempt requested.
	#[serde(default)]
	pub scope: ScopeSet,
	/// Opaque client state to echo back after completion.
	#[serde(default)]
	pub client_state: Option<String>,
	/// Random nonce making every encoded state unique.
	pub nonce: String,
	/// Issue instant; gateways may reject stale states at the router layer.
	#[serde(with = "time::serde::timestamp")]
	pub issued_at: OffsetDateTime,
}
impl RelayState {
	/// Issues a fresh relay state for the request.
	pub fn issue(request: &AuthRequest) -> Self {
		Self {
			auth_method_id: request.auth_method_id.clone(),
			scope: request.scope.clone(),
			client_state: request.client_state.clone(),
			nonce: random_nonce(),
			issued_at: whole_second_now(),
		}
	}

	/// Encodes the state as `<payload>.<tag>`, both URL-safe base64 without padding.
	pub fn encode(&self, key: &str) -> String {
		// Serializing a struct of plain fields cannot fail.
		let json = serde_json::to_vec(self).unwrap_or_default();
		let payload = URL_SAFE_NO_PAD.encode(&json);
		let tag = compute_tag(key, &payload);

		format!("{payload}{TAG_SEPARATOR}{tag}")
	}

	/// Decodes and verifies a state string returned by the provider.
	///
	/// Any structural defect or tag mismatch means the callback does not belong to a
	/// flow this adapter started; all such cases surface as `ProviderRejected`.
	pub fn decode(raw: &str, key: &str) -> Result<Self> {
		let (payload, tag) = raw.split_once(TAG_SEPARATOR).ok_or_else(reject)?;

		if !verify_tag(key, payload, tag) {
			return Err(reject());
		}

		let json = URL_SAFE_NO_PAD.decode(payload).map_err(|_| reject())?;

		serde_json::from_slice(&json).map_err(|_| reject())
	}

	/// Rebuilds the original authorization request from the verified state.
	pub fn into_request(self) -> AuthRequest {
		AuthRequest {
			auth_method_id: self.auth_method_id,
			scope: self.scope,
			client_state: self.client_state,
		}
	}
}

fn reject() -> Error {
	Error::ProviderRejected { reason: "relay state failed verification".into() }
}

fn compute_tag(key: &str, payload: &str) -> String {
	// HMAC-SHA256 accepts keys of any length, so construction cannot fail.
	TagMac::new_from_slice(key.as_bytes())
		.map(|mut mac| {
			mac.update(payload.as_bytes());

			URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes())
		})
		.unwrap_or_default()
}

fn verify_tag(key: &str, payload: &str, tag: &str) -> bool {
	let Ok(tag_bytes) = URL_SAFE_NO_PAD.decode(tag) else {
		return false;
	};
	let Ok(mut mac) = TagMac::new_from_slice(key.as_bytes()) else {
		return false;
	};

	mac.update(payload.as_bytes());

	// `verify_slice` compares in constant time.
	mac.verify_slice(&tag_bytes).is_ok()
}

fn whole_second_now() -> OffsetDateTime {
	let now = OffsetDateTime::now_utc();

	// The wire format is a whole-second unix timestamp; the in-memory value keeps the
	// same precision so encode/decode is lossless.
	now.replace_nanosecond(0).unwrap_or(now)
}

fn random_nonce() -> String {
	rand::rng().sample_iter(Alphanumeric).take(NONCE_LEN).map(char::from).collect()
}
