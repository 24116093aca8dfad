//! Provider-facing contract: the capability interface every IdP integration implements,
//! plus the validated metadata and configuration it is constructed from.
//!
//! `contract` defines [`IdentityProvider`], the fixed capability set checked at compile
//! time for every adapter. `descriptor` exposes validated endpoint metadata,
//! `config` the per-provider configuration and fatally validated credentials,
//! `endpoint` the route metadata adapters publish, and `registry` the construction-time
//! gate that keeps misconfigured adapters out of traffic entirely.

pub mod config;
pub mod contract;
pub mod descriptor;
pub mod endpoint;
pub mod registry;

pub use config::*;
pub use contract::*;
pub use descriptor::*;
pub use endpoint::*;
pub use registry::*;
