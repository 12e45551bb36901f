//! The enforcer service.
//!
//! Every call works on a fresh snapshot loaded from the rule store:
//!
//! - **Enforcement**: load, resolve the subject's role closure, apply the
//!   model matcher to each permission rule. Never takes the writer lock.
//!
//! - **Mutation**: load, apply the change in memory with set semantics, then
//!   save the whole snapshot. Unchanged snapshots are not saved. Mutations
//!   are serialised through a single-writer lock unless
//!   `EnforcerConfig::serialize_mutations` is off, in which case concurrent
//!   mutations race and the last save wins.

mod config;
mod service;

#[cfg(test)]
mod tests;

pub use config::EnforcerConfig;
pub use service::Enforcer;
