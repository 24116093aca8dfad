//! Profile records exchanged between adapters, the normalizer, and the continuation
//! collaborator, plus refresh-eligibility inputs and outputs.

// self
use crate::{
	_prelude::*,
	identity::{CustomId, ScopeSet, UserId},
};

/// Redacted token secret wrapper keeping sensitive material out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Unvalidated provider profile produced by an adapter's profile fetch.
///
/// Transient: exists only within callback handling, between the token exchange and
/// normalization. Adapters map their provider's wire shape into this common form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawProviderProfile {
	/// Provider-issued subject identifier (Google `sub`, GitHub `id`, …).
	pub id: String,
	/// Human-readable display name, when the provider supplies one.
	pub display_name: Option<String>,
	/// Provider-side username/login, used as the username fallback.
	pub username: Option<String>,
	/// Given name, when available.
	pub given_name: Option<String>,
	/// Family name, when available.
	pub family_name: Option<String>,
	/// Email addresses in provider-preferred order; the first entry wins.
	pub emails: Vec<String>,
}

/// Normalized OIDC-style profile embedded in every [`CanonicalIdentity`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OidcProfile {
	/// Username candidate derived from the display-name fallback chain.
	pub username: String,
	/// Mirror of `username`, kept for OIDC consumers.
	pub preferred_username: String,
	/// Full display name.
	pub name: String,
	/// Given name; empty when the provider omitted it.
	pub given_name: String,
	/// Family name; empty when the provider omitted it.
	pub family_name: String,
	/// First provider-supplied email, if any.
	pub email: Option<String>,
	/// True exactly when an email was found; the provider is trusted as the
	/// verification authority (documented simplification of the base flow).
	pub email_verified: bool,
}

/// Canonical, provider-agnostic identity produced by the adapter core.
///
/// Immutable once built. It intentionally carries no gateway-local user id; the
/// continuation collaborator wraps it into a [`ResolvedIdentity`] instead of mutating
/// a shared record across the component boundary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalIdentity {
	/// Provider-qualified stable identifier (`<authMethodId>:<providerUserId>`).
	pub custom_id: CustomId,
	/// Normalized profile.
	pub profile: OidcProfile,
	/// Default group memberships; empty for plain OAuth2 providers.
	pub groups: Vec<String>,
}

/// Identity completed by the continuation collaborator after account resolution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedIdentity {
	/// Gateway-local user identifier assigned downstream.
	pub user_id: UserId,
	/// The canonical identity this resolution wraps.
	pub identity: CanonicalIdentity,
}

/// Tokens obtained from the provider's token endpoint during callback handling.
#[derive(Clone, Debug)]
pub struct CallbackTokens {
	/// Provider-issued access token.
	pub access_token: TokenSecret,
	/// Provider-issued refresh token, when the provider rotates one.
	pub refresh_token: Option<TokenSecret>,
	/// Access token expiry, when the provider reported `expires_in`.
	pub expires_at: Option<OffsetDateTime>,
}

/// Facts about a previously issued token, input to refresh-eligibility checks.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TokenInfo {
	/// Canonical identity the token was issued for, when known.
	pub custom_id: Option<CustomId>,
	/// Token expiry, when known.
	pub expires_at: Option<OffsetDateTime>,
	/// Scopes the token was issued with.
	pub scope: ScopeSet,
}

/// Outcome of a refresh-eligibility check; stateless and never persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshDecision {
	/// Whether the token may be renewed without re-authentication.
	pub allow: bool,
	/// Optional explanation, mainly for denials.
	pub reason: Option<String>,
}
impl RefreshDecision {
	/// Allows the refresh.
	pub fn allow() -> Self {
		Self { allow: true, reason: None }
	}

	/// Denies the refresh with an explanation.
	pub fn deny(reason: impl Into<String>) -> Self {
		Self { allow: false, reason: Some(reason.into()) }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn secret_formatters_redact() {
		let secret = TokenSecret::new("super-secret");

		assert_eq!(format!("{secret:?}"), "TokenSecret(\"<redacted>\")");
		assert_eq!(format!("{secret}"), "<redacted>");
	}

	#[test]
	fn refresh_decision_constructors() {
		assert_eq!(RefreshDecision::allow(), RefreshDecision { allow: true, reason: None });

		let denied = RefreshDecision::deny("account disabled");

		assert!(!denied.allow);
		assert_eq!(denied.reason.as_deref(), Some("account disabled"));
	}

	#[test]
	fn canonical_identity_serializes_custom_id_as_string() {
		let identity = CanonicalIdentity {
			custom_id: "google:42".parse().expect("Custom id fixture should parse."),
			profile: OidcProfile {
				username: "Ann Lee".into(),
				preferred_username: "Ann Lee".into(),
				name: "Ann Lee".into(),
				given_name: "Ann".into(),
				family_name: "Lee".into(),
				email: Some("ann@example.com".into()),
				email_verified: true,
			},
			groups: Vec::new(),
		};
		let payload =
			serde_json::to_string(&identity).expect("Canonical identity should serialize to JSON.");

		assert!(payload.contains("\"google:42\""));
		assert!(payload.contains("\"email_verified\":true"));
	}
}
