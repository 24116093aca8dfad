//! Identity-domain types: validated identifiers, scope sets, and profile records.

pub mod id;
pub mod profile;
pub mod scope;

pub use id::*;
pub use profile::*;
pub use scope::*;
