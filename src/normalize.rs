//! Deterministic profile normalization: provider profile in, canonical identity out.
//!
//! Pure mapping with no I/O. The fallback chain for the username candidate is total:
//! a non-empty username is always produced or normalization fails explicitly.

// self
use crate::{
	error::NormalizationError,
	identity::{AuthMethodId, CanonicalIdentity, CustomId, OidcProfile, ProviderUserId, RawProviderProfile},
};

/// Builds a [`CanonicalIdentity`] from a verified raw provider profile.
///
/// - `custom_id` is `<authMethodId>:<providerUserId>`, a pure function of its inputs.
/// - The username candidate prefers the human-readable display name and falls back to
///   the provider-supplied username.
/// - The email is the first entry of the profile's email list; `email_verified` is true
///   exactly when an email was found (the provider is trusted as verification authority).
/// - Missing given/family names pass through as empty strings rather than failing.
pub fn normalize(
	auth_method: &AuthMethodId,
	profile: &RawProviderProfile,
) -> Result<CanonicalIdentity, NormalizationError> {
	let provider_user = ProviderUserId::new(profile.id.trim())
		.map_err(|_| NormalizationError::MissingSubject)?;
	let custom_id = CustomId::new(auth_method.clone(), provider_user);
	let username = make_username(profile.display_name.as_deref(), profile.username.as_deref())?;
	let email = first_email(profile);
	let email_verified = email.is_some();
	let oidc = OidcProfile {
		preferred_username: username.clone(),
		name: profile.display_name.as_deref().map(tidy).unwrap_or_default(),
		given_name: profile.given_name.clone().unwrap_or_default(),
		family_name: profile.family_name.clone().unwrap_or_default(),
		email,
		email_verified,
		username,
	};

	Ok(CanonicalIdentity { custom_id, profile: oidc, groups: Vec::new() })
}

/// Derives the username candidate from the display name, falling back to the
/// provider-supplied username when the display name is absent or unusable.
pub fn make_username(
	display_name: Option<&str>,
	provider_username: Option<&str>,
) -> Result<String, NormalizationError> {
	for candidate in [display_name, provider_username].into_iter().flatten() {
		let cleaned = tidy(candidate);

		if !cleaned.is_empty() {
			return Ok(cleaned);
		}
	}

	Err(NormalizationError::NoUsableUsername)
}

/// Picks the provider-preferred email: the first entry of the email list, if any.
fn first_email(profile: &RawProviderProfile) -> Option<String> {
	profile.emails.first().map(|email| email.trim().to_owned()).filter(|email| !email.is_empty())
}

/// Trims and collapses inner whitespace runs; full username policy lives downstream.
fn tidy(value: &str) -> String {
	value.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn method(id: &str) -> AuthMethodId {
		AuthMethodId::new(id).expect("Auth method fixture should be valid.")
	}

	#[test]
	fn google_scenario_normalizes_exactly() {
		let raw = RawProviderProfile {
			id: "42".into(),
			display_name: Some("Ann Lee".into()),
			username: None,
			given_name: Some("Ann".into()),
			family_name: Some("Lee".into()),
			emails: vec!["ann@example.com".into()],
		};
		let identity = normalize(&method("google"), &raw)
			.expect("Well-formed profile should normalize successfully.");

		assert_eq!(identity.custom_id.to_string(), "google:42");
		assert_eq!(identity.profile.username, "Ann Lee");
		assert_eq!(identity.profile.preferred_username, "Ann Lee");
		assert_eq!(identity.profile.given_name, "Ann");
		assert_eq!(identity.profile.family_name, "Lee");
		assert_eq!(identity.profile.email.as_deref(), Some("ann@example.com"));
		assert!(identity.profile.email_verified);
		assert!(identity.groups.is_empty());
	}

	#[test]
	fn missing_emails_still_normalize() {
		let raw = RawProviderProfile {
			id: "42".into(),
			display_name: Some("Ann Lee".into()),
			..RawProviderProfile::default()
		};
		let identity =
			normalize(&method("google"), &raw).expect("Email-less profile should normalize.");

		assert_eq!(identity.profile.email, None);
		assert!(!identity.profile.email_verified);
	}

	#[test]
	fn first_email_wins() {
		let raw = RawProviderProfile {
			id: "7".into(),
			display_name: Some("Octo Cat".into()),
			emails: vec!["primary@example.com".into(), "secondary@example.com".into()],
			..RawProviderProfile::default()
		};
		let identity = normalize(&method("github"), &raw)
			.expect("Multi-email profile should normalize successfully.");

		assert_eq!(identity.profile.email.as_deref(), Some("primary@example.com"));
	}

	#[test]
	fn username_falls_back_to_provider_login() {
		let raw = RawProviderProfile {
			id: "7".into(),
			display_name: Some("   ".into()),
			username: Some("octocat".into()),
			..RawProviderProfile::default()
		};
		let identity = normalize(&method("github"), &raw)
			.expect("Fallback username should keep normalization total.");

		assert_eq!(identity.profile.username, "octocat");
	}

	#[test]
	fn missing_username_fails_explicitly() {
		let raw = RawProviderProfile { id: "7".into(), ..RawProviderProfile::default() };
		let err = normalize(&method("github"), &raw)
			.expect_err("A profile without any username candidate must fail.");

		assert!(matches!(err, NormalizationError::NoUsableUsername));
	}

	#[test]
	fn missing_subject_fails_explicitly() {
		let raw =
			RawProviderProfile { display_name: Some("Ann".into()), ..RawProviderProfile::default() };
		let err = normalize(&method("google"), &raw)
			.expect_err("A profile without a subject identifier must fail.");

		assert!(matches!(err, NormalizationError::MissingSubject));
	}

	#[test]
	fn custom_id_is_pure_over_its_inputs() {
		let raw = RawProviderProfile {
			id: "42".into(),
			display_name: Some("Ann Lee".into()),
			..RawProviderProfile::default()
		};
		let first = normalize(&method("google"), &raw).expect("Profile should normalize.");
		let second = normalize(&method("google"), &raw).expect("Profile should normalize again.");

		assert_eq!(first.custom_id, second.custom_id);

		let other_provider = normalize(&method("github"), &raw).expect("Profile should normalize.");

		assert_ne!(first.custom_id, other_provider.custom_id);
	}

	#[test]
	fn display_names_are_tidied() {
		assert_eq!(
			make_username(Some("  Ann   Lee "), None).expect("Padded name should be usable."),
			"Ann Lee"
		);
		assert!(make_username(None, None).is_err());
	}
}
