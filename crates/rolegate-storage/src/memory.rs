//! In-memory rule store.
//!
//! Keeps the flattened rows exactly as a relational backend would, so the
//! row encoding is exercised on every `load` and `save`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::instrument;

use crate::error::StorageResult;
use crate::rules::{PolicyRecord, RuleSet};
use crate::traits::{HealthStatus, RuleStore};

/// In-memory implementation of [`RuleStore`].
///
/// `save` swaps the whole row list under the write lock, so a concurrent
/// `load` sees either the previous or the new rule set, never a mix.
#[derive(Debug, Default)]
pub struct MemoryRuleStore {
    records: RwLock<Vec<PolicyRecord>>,
}

impl MemoryRuleStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store wrapped in Arc.
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Creates a store pre-populated with `rules`.
    pub fn with_rules(rules: &RuleSet) -> Self {
        Self {
            records: RwLock::new(rules.to_records()),
        }
    }

    /// Returns a copy of the raw rows, in storage order.
    pub async fn records(&self) -> Vec<PolicyRecord> {
        self.records.read().await.clone()
    }
}

#[async_trait]
impl RuleStore for MemoryRuleStore {
    #[instrument(skip(self))]
    async fn load(&self) -> StorageResult<RuleSet> {
        let records = self.records.read().await.clone();
        RuleSet::from_records(records)
    }

    #[instrument(skip(self, rules), fields(rules = rules.len()))]
    async fn save(&self, rules: &RuleSet) -> StorageResult<()> {
        let records = rules.to_records();
        *self.records.write().await = records;
        Ok(())
    }

    async fn health_check(&self) -> StorageResult<HealthStatus> {
        // No external dependency to probe.
        Ok(HealthStatus {
            healthy: true,
            latency: Duration::ZERO,
            message: Some("in-memory storage".to_string()),
        })
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
