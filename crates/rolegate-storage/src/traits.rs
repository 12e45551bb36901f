//! RuleStore trait definition.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::StorageResult;
use crate::rules::{PermissionRule, RuleSet};

/// Result of a storage readiness probe.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthStatus {
    pub healthy: bool,
    /// Round-trip time of the probe.
    pub latency: Duration,
    /// Backend-specific detail.
    pub message: Option<String>,
}

/// Durable holder of permission and grouping rules.
///
/// Implementations must be thread-safe (Send + Sync). A store holds exactly
/// one policy; `save` replaces it wholesale.
#[async_trait]
pub trait RuleStore: Send + Sync + 'static {
    /// Fetches the full current rule set.
    async fn load(&self) -> StorageResult<RuleSet>;

    /// Persists `rules` as the complete durable rule set, replacing whatever
    /// was stored before. Either all rules are written or none are.
    async fn save(&self, rules: &RuleSet) -> StorageResult<()>;

    /// Enumerates the durable permission rules in storage order.
    async fn list_permission_rules(&self) -> StorageResult<Vec<PermissionRule>> {
        Ok(self.load().await?.permissions)
    }

    /// Probes the backing storage.
    async fn health_check(&self) -> StorageResult<HealthStatus>;

    /// Short backend identifier used in logs and metrics.
    fn backend_name(&self) -> &'static str;
}
