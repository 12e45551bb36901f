//! rolegate-storage: Rule store abstraction layer
//!
//! This crate provides durable storage for authorization rules:
//! - Permission and grouping rule types and their flattened row layout
//! - The `RuleStore` trait consumed by the enforcer
//! - In-memory implementation for testing and ephemeral deployments
//! - PostgreSQL implementation for production
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              rolegate-storage               │
//! ├─────────────────────────────────────────────┤
//! │  rules.rs    - Rule types and row layout    │
//! │  traits.rs   - RuleStore trait definition   │
//! │  memory.rs   - In-memory implementation     │
//! │  postgres.rs - PostgreSQL implementation    │
//! └─────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod memory;
pub mod postgres;
pub mod rules;
pub mod traits;

// Re-export commonly used types
pub use error::{StorageError, StorageResult};
pub use memory::MemoryRuleStore;
pub use postgres::{PostgresConfig, PostgresRuleStore};
pub use rules::{GroupingRule, PermissionRule, PolicyRecord, Rule, RuleSet};
pub use traits::{HealthStatus, RuleStore};
