use std::sync::Arc;

use rolegate_storage::{GroupingRule, HealthStatus, PermissionRule, RuleStore};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use super::EnforcerConfig;
use crate::error::{DomainError, DomainResult};
use crate::model::{ModelDefinition, Request, RBAC_WITH_PATHS};
use crate::policy::{PolicySnapshot, UserRoles};
use crate::resolver::RoleSet;
use crate::validation::{
    validate_grouping_rule, validate_grouping_target, validate_permission_rule,
    validate_permission_target,
};

/// Authorization decision and policy management service.
///
/// Holds a handle to the rule store; there is no process-wide instance.
pub struct Enforcer<S: RuleStore + ?Sized> {
    store: Arc<S>,
    model: ModelDefinition,
    config: EnforcerConfig,
    write_lock: Mutex<()>,
}

impl<S: RuleStore + ?Sized> Enforcer<S> {
    /// Creates an enforcer with default configuration.
    pub fn new(store: Arc<S>) -> Self {
        Self::with_config(store, EnforcerConfig::default())
    }

    pub fn with_config(store: Arc<S>, config: EnforcerConfig) -> Self {
        Self {
            store,
            model: RBAC_WITH_PATHS,
            config,
            write_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn config(&self) -> &EnforcerConfig {
        &self.config
    }

    pub fn model(&self) -> &ModelDefinition {
        &self.model
    }

    async fn load_snapshot(&self) -> DomainResult<PolicySnapshot> {
        match self.store.load().await {
            Ok(rules) => Ok(PolicySnapshot::new(rules)),
            Err(e) => {
                warn!(backend = self.store.backend_name(), error = %e, "Failed to load rules");
                Err(e.into())
            }
        }
    }

    /// Decides whether `subject` may perform `action` on `object`.
    ///
    /// `Ok(false)` is a deny. An `Err` means no decision could be reached
    /// and must not be treated as a deny.
    #[instrument(skip(self))]
    pub async fn enforce(&self, subject: &str, object: &str, action: &str) -> DomainResult<bool> {
        let request = Request::new(subject, object, action);
        if request.is_incomplete() {
            debug!("Incomplete request denied");
            record_decision("deny");
            return Ok(false);
        }

        let result = self.decide(&request).await;
        match &result {
            Ok(allowed) => {
                record_decision(if *allowed { "allow" } else { "deny" });
                debug!(allowed = *allowed, "Enforcement decision");
            }
            Err(e) => {
                record_decision("error");
                warn!(error = %e, "Enforcement failed");
            }
        }
        result
    }

    async fn decide(&self, request: &Request<'_>) -> DomainResult<bool> {
        let snapshot = self.load_snapshot().await?;
        let groups = snapshot
            .role_graph()
            .resolve_groups(request.subject, &self.config.resolver);
        Ok(self.model.decide(request, &groups, snapshot.permissions()))
    }

    /// Computes the transitive role closure of `subject`.
    #[instrument(skip(self))]
    pub async fn resolve_groups(&self, subject: &str) -> DomainResult<RoleSet> {
        let snapshot = self.load_snapshot().await?;
        Ok(snapshot
            .role_graph()
            .resolve_groups(subject, &self.config.resolver))
    }

    /// Whether `subject` is `group` or transitively belongs to it.
    #[instrument(skip(self))]
    pub async fn has_role(&self, subject: &str, group: &str) -> DomainResult<bool> {
        let snapshot = self.load_snapshot().await?;
        Ok(snapshot
            .role_graph()
            .has_link(subject, group, &self.config.resolver))
    }

    /// Permission rules granted to `subject` directly or through its roles.
    #[instrument(skip(self))]
    pub async fn implicit_permissions(&self, subject: &str) -> DomainResult<Vec<PermissionRule>> {
        let snapshot = self.load_snapshot().await?;
        Ok(snapshot.implicit_permissions(subject, &self.config.resolver))
    }

    /// Runs one load-mutate-save sequence.
    ///
    /// `apply` returns whether it changed the snapshot; nothing is saved
    /// otherwise.
    async fn mutate<F>(&self, operation: &'static str, apply: F) -> DomainResult<bool>
    where
        F: FnOnce(&mut PolicySnapshot) -> DomainResult<bool>,
    {
        let _guard = if self.config.serialize_mutations {
            Some(self.write_lock.lock().await)
        } else {
            None
        };

        let mut snapshot = self.load_snapshot().await?;
        if !apply(&mut snapshot)? {
            debug!(operation, "Policy unchanged, skipping save");
            return Ok(false);
        }

        if let Err(e) = self.store.save(snapshot.rules()).await {
            warn!(operation, backend = self.store.backend_name(), error = %e, "Failed to save rules");
            return Err(e.into());
        }
        info!(operation, rules = snapshot.rules().len(), "Policy updated");
        Ok(true)
    }

    /// Adds a permission rule. Returns false when it already existed.
    #[instrument(skip(self, rule), fields(rule = %rule))]
    pub async fn add_permission_rule(&self, rule: PermissionRule) -> DomainResult<bool> {
        validate_permission_rule(&rule)?;
        self.mutate("add_permission_rule", move |snapshot| {
            Ok(snapshot.add_permission(rule))
        })
        .await
    }

    /// Removes a permission rule. Removing a missing rule succeeds with
    /// `false`.
    #[instrument(skip(self, rule), fields(rule = %rule))]
    pub async fn remove_permission_rule(&self, rule: &PermissionRule) -> DomainResult<bool> {
        validate_permission_target(rule)?;
        self.mutate("remove_permission_rule", |snapshot| {
            Ok(snapshot.remove_permission(rule))
        })
        .await
    }

    /// Atomically replaces `old` with `new`.
    ///
    /// Fails with `RuleNotFound` when `old` does not exist; the stored
    /// rules are then left untouched.
    #[instrument(skip(self, old, new), fields(old = %old, new = %new))]
    pub async fn update_permission_rule(&self, old: &PermissionRule, new: PermissionRule) -> DomainResult<bool> {
        validate_permission_target(old)?;
        validate_permission_rule(&new)?;
        self.mutate("update_permission_rule", move |snapshot| {
            snapshot.update_permission(old, new)
        })
        .await
    }

    /// Lists durable permission rules in storage order.
    #[instrument(skip(self))]
    pub async fn list_permission_rules(&self) -> DomainResult<Vec<PermissionRule>> {
        Ok(self.store.list_permission_rules().await?)
    }

    /// Distinct role names across all grouping rules.
    #[instrument(skip(self))]
    pub async fn list_roles(&self) -> DomainResult<Vec<String>> {
        Ok(self.load_snapshot().await?.roles())
    }

    /// Every user with its directly assigned roles. Recomputed on each
    /// call.
    #[instrument(skip(self))]
    pub async fn list_users_with_roles(&self) -> DomainResult<Vec<UserRoles>> {
        Ok(self.load_snapshot().await?.users_with_roles())
    }

    /// Assigns `username` to `role`, creating the role implicitly.
    #[instrument(skip(self))]
    pub async fn add_user_to_role(&self, username: &str, role: &str) -> DomainResult<bool> {
        let rule = GroupingRule::new(username, role);
        validate_grouping_rule(&rule)?;
        self.mutate("add_user_to_role", move |snapshot| {
            Ok(snapshot.add_grouping(rule))
        })
        .await
    }

    /// Removes `username` from `role`. A missing assignment is a no-op.
    #[instrument(skip(self))]
    pub async fn remove_user_from_role(&self, username: &str, role: &str) -> DomainResult<bool> {
        let rule = GroupingRule::new(username, role);
        validate_grouping_target(&rule)?;
        self.mutate("remove_user_from_role", |snapshot| {
            Ok(snapshot.remove_grouping(&rule))
        })
        .await
    }

    /// Probes the underlying rule store.
    pub async fn health_check(&self) -> DomainResult<HealthStatus> {
        self.store
            .health_check()
            .await
            .map_err(DomainError::StoreUnavailable)
    }
}

fn record_decision(decision: &'static str) {
    metrics::counter!("rolegate_enforce_total", "decision" => decision).increment(1);
}

impl<S: RuleStore + ?Sized> std::fmt::Debug for Enforcer<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Enforcer")
            .field("backend", &self.store.backend_name())
            .field("config", &self.config)
            .finish()
    }
}
