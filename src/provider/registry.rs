//! Construction-time adapter registry.
//!
//! Registration is the single serialization point of the core: adapters validate their
//! configuration in their constructors, so only well-configured instances ever reach
//! the registry, and the registry itself is immutable once the engine takes ownership.

// self
use crate::{_prelude::*, error::ConfigError, identity::AuthMethodId, provider::IdentityProvider};

/// Registry of active identity-provider adapters, keyed by auth method identifier.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
	adapters: HashMap<AuthMethodId, Arc<dyn IdentityProvider>>,
}
impl ProviderRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers an adapter under its auth method identifier.
	///
	/// Duplicate identifiers are a configuration error: two adapters answering the same
	/// auth method would make callback routing ambiguous.
	pub fn register(&mut self, adapter: Arc<dyn IdentityProvider>) -> Result<(), ConfigError> {
		let id = adapter.auth_method_id().clone();

		if self.adapters.contains_key(&id) {
			return Err(ConfigError::DuplicateAuthMethod { auth_method: id.to_string() });
		}

		self.adapters.insert(id, adapter);

		Ok(())
	}

	/// Resolves the adapter registered under the identifier.
	pub fn resolve(&self, auth_method: &AuthMethodId) -> Result<Arc<dyn IdentityProvider>> {
		self.adapters
			.get(auth_method)
			.cloned()
			.ok_or_else(|| Error::UnknownProvider { auth_method: auth_method.to_string() })
	}

	/// Iterates over the registered adapters.
	pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn IdentityProvider>> {
		self.adapters.values()
	}

	/// Number of registered adapters.
	pub fn len(&self) -> usize {
		self.adapters.len()
	}

	/// Returns true when no adapter is registered.
	pub fn is_empty(&self) -> bool {
		self.adapters.is_empty()
	}
}
impl Debug for ProviderRegistry {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ProviderRegistry")
			.field("auth_methods", &self.adapters.keys().collect::<Vec<_>>())
			.finish()
	}
}
