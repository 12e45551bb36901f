//! Role resolution over grouping rules.
//!
//! # Design
//!
//! - **Reachability**: a subject's roles are every group reachable through
//!   grouping edges, not only direct ones. Traversal is breadth-first so
//!   nearer groups are listed first.
//!
//! - **Cycle Detection**: a visited set guarantees termination on cyclic
//!   membership graphs. A subject reachable from itself through a cycle is
//!   part of its own closure.
//!
//! - **Depth Limiting**: groups more than `ResolverConfig::max_depth` hops
//!   from the subject are not followed. Nearer groups still resolve, so a
//!   deep branch never hides a direct membership.

mod config;
mod graph;
mod graph_proptest;

pub use config::{ResolverConfig, DEFAULT_MAX_DEPTH};
pub use graph::{RoleGraph, RoleSet};
