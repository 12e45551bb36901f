//! rolegate-domain: RBAC decision engine
//!
//! This crate contains the authorization logic:
//! - The policy model (request/policy/grouping shapes, effect, matcher)
//! - Role resolution over grouping rules
//! - keyMatch2 path-pattern matching
//! - Policy snapshots with set semantics and derived views
//! - The enforcer service that ties them to a rule store
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               rolegate-domain               │
//! ├─────────────────────────────────────────────┤
//! │  model/      - Model definition & effect    │
//! │  matcher/    - Path pattern matching        │
//! │  resolver/   - Role closure computation     │
//! │  validation/ - Rule field validation        │
//! │  policy/     - Snapshot & derived views     │
//! │  enforcer/   - Decision & mutation service  │
//! └─────────────────────────────────────────────┘
//! ```

pub mod enforcer;
pub mod error;
pub mod matcher;
pub mod model;
pub mod policy;
pub mod resolver;
pub mod validation;

// Re-export commonly used types at the crate root
pub use enforcer::{Enforcer, EnforcerConfig};
pub use error::{DomainError, DomainResult};
pub use matcher::key_match2;
pub use model::{ModelDefinition, Request, MODEL_CONF};
pub use policy::{PolicySnapshot, UserRoles};
pub use resolver::{ResolverConfig, RoleGraph, RoleSet};
