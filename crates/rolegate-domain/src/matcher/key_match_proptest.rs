//! Property-based tests for path matching.
