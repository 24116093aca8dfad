//! Strongly typed identifiers enforced across the adapter core.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Creates a new identifier after validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				let view = value.as_ref();

				validate_view($kind, view)?;

				Ok(Self(view.to_owned()))
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				validate_view($kind, &value)?;

				Ok(Self(value))
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
	};
}

const IDENTIFIER_MAX_LEN: usize = 128;
const CUSTOM_ID_SEPARATOR: char = ':';

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier (auth method, provider user, user).
		kind: &'static str,
	},
	/// The identifier contains whitespace characters.
	#[error("{kind} identifier contains whitespace.")]
	ContainsWhitespace {
		/// Kind of identifier (auth method, provider user, user).
		kind: &'static str,
	},
	/// The identifier contains the reserved custom-id separator.
	#[error("{kind} identifier contains the reserved `:` separator.")]
	ContainsSeparator {
		/// Kind of identifier (auth method, provider user, user).
		kind: &'static str,
	},
	/// The identifier exceeded the allowed character count.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier (auth method, provider user, user).
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
	/// A composite custom id was missing its separator.
	#[error("Custom identifier must take the `<authMethodId>:<providerUserId>` form.")]
	MalformedCustomId,
}

def_id! { AuthMethodId, "Identifier for a configured auth method (one registered adapter instance).", "AuthMethod" }
def_id! { ProviderUserId, "Stable user identifier issued by the upstream provider.", "ProviderUser" }
def_id! { UserId, "Gateway-local user identifier assigned by the continuation collaborator.", "User" }

/// Provider-qualified stable identifier in the `<authMethodId>:<providerUserId>` form.
///
/// Deterministic: the same provider account always yields the same custom id, and
/// distinct provider-user pairs never collide because the components reject the
/// separator character at construction.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CustomId {
	auth_method: AuthMethodId,
	provider_user: ProviderUserId,
}
impl CustomId {
	/// Composes a custom id from its validated parts.
	pub fn new(auth_method: AuthMethodId, provider_user: ProviderUserId) -> Self {
		Self { auth_method, provider_user }
	}

	/// Auth method component.
	pub fn auth_method(&self) -> &AuthMethodId {
		&self.auth_method
	}

	/// Provider user component.
	pub fn provider_user(&self) -> &ProviderUserId {
		&self.provider_user
	}
}
impl Display for CustomId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{}{CUSTOM_ID_SEPARATOR}{}", self.auth_method, self.provider_user)
	}
}
impl Debug for CustomId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "CustomId({self})")
	}
}
impl From<CustomId> for String {
	fn from(value: CustomId) -> Self {
		value.to_string()
	}
}
impl FromStr for CustomId {
	type Err = IdentifierError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let (method, user) =
			s.split_once(CUSTOM_ID_SEPARATOR).ok_or(IdentifierError::MalformedCustomId)?;

		Ok(Self { auth_method: AuthMethodId::new(method)?, provider_user: ProviderUserId::new(user)? })
	}
}
impl TryFrom<String> for CustomId {
	type Error = IdentifierError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		value.parse()
	}
}

fn validate_view(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace { kind });
	}
	if view.contains(CUSTOM_ID_SEPARATOR) {
		return Err(IdentifierError::ContainsSeparator { kind });
	}
	if view.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { kind, max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn identifiers_validate_shape() {
		assert!(AuthMethodId::new("").is_err());
		assert!(AuthMethodId::new("with space").is_err());
		assert!(AuthMethodId::new("with:colon").is_err(), "Separator must be rejected.");

		let method = AuthMethodId::new("google").expect("Plain identifier should be valid.");

		assert_eq!(method.as_ref(), "google");

		let too_long = "a".repeat(IDENTIFIER_MAX_LEN + 1);

		assert!(ProviderUserId::new(&too_long).is_err());
	}

	#[test]
	fn custom_id_is_deterministic_and_collision_free() {
		let method = AuthMethodId::new("google").expect("Auth method fixture should be valid.");
		let user = ProviderUserId::new("42").expect("Provider user fixture should be valid.");
		let lhs = CustomId::new(method.clone(), user.clone());
		let rhs = CustomId::new(method, user);

		assert_eq!(lhs, rhs);
		assert_eq!(lhs.to_string(), "google:42");

		let other = CustomId::new(
			AuthMethodId::new("google").expect("Auth method fixture should be valid."),
			ProviderUserId::new("43").expect("Provider user fixture should be valid."),
		);

		assert_ne!(lhs, other);
	}

	#[test]
	fn custom_id_round_trips_through_strings() {
		let parsed: CustomId =
			"github:octocat-1".parse().expect("Well-formed custom id should parse.");

		assert_eq!(parsed.auth_method().as_ref(), "github");
		assert_eq!(parsed.provider_user().as_ref(), "octocat-1");
		assert!("no-separator".parse::<CustomId>().is_err());

		let json = serde_json::to_string(&parsed).expect("Custom id should serialize to JSON.");

		assert_eq!(json, "\"github:octocat-1\"");

		let back: CustomId =
			serde_json::from_str(&json).expect("Custom id should deserialize from JSON.");

		assert_eq!(back, parsed);
	}

	#[test]
	fn borrow_supports_fast_lookup() {
		let map: HashMap<AuthMethodId, u8> = HashMap::from_iter([(
			AuthMethodId::new("github").expect("Auth method used for lookup should be valid."),
			7_u8,
		)]);

		assert_eq!(map.get("github"), Some(&7));
	}
}
