//! Property-based tests for role resolution.
