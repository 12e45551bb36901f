//! Tests for the enforcer service.
//!
//! Organized by functionality:
//! - Decisions: default deny, role closure, path patterns, failures
//! - Mutations: set semantics, update atomicity, persistence, concurrency


mod mutation_tests;
