//! In-memory policy snapshot.
//!
//! A `PolicySnapshot` is the working copy of the rule set for one decision
//! or one mutation. It enforces set semantics on both rule kinds and derives
//! the reporting views (roles, users) from its grouping rules.

use std::collections::HashMap;

use rolegate_storage::{GroupingRule, PermissionRule, RuleSet};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::resolver::{ResolverConfig, RoleGraph};

/// A user and the roles directly assigned to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRoles {
    pub username: String,
    /// In grouping-rule enumeration order.
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicySnapshot {
    rules: RuleSet,
}

impl PolicySnapshot {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn into_rules(self) -> RuleSet {
        self.rules
    }

    pub fn permissions(&self) -> &[PermissionRule] {
        &self.rules.permissions
    }

    pub fn groupings(&self) -> &[GroupingRule] {
        &self.rules.groupings
    }

    pub fn contains_permission(&self, rule: &PermissionRule) -> bool {
        self.rules.permissions.contains(rule)
    }

    pub fn contains_grouping(&self, rule: &GroupingRule) -> bool {
        self.rules.groupings.contains(rule)
    }

    /// Adds `rule` unless present. Returns whether the snapshot changed.
    pub fn add_permission(&mut self, rule: PermissionRule) -> bool {
        if self.contains_permission(&rule) {
            return false;
        }
        self.rules.permissions.push(rule);
        true
    }

    /// Removes `rule`. Returns false when it was absent.
    pub fn remove_permission(&mut self, rule: &PermissionRule) -> bool {
        let before = self.rules.permissions.len();
        self.rules.permissions.retain(|p| p != rule);
        self.rules.permissions.len() != before
    }

    pub fn add_grouping(&mut self, rule: GroupingRule) -> bool {
        if self.contains_grouping(&rule) {
            return false;
        }
        self.rules.groupings.push(rule);
        true
    }

    pub fn remove_grouping(&mut self, rule: &GroupingRule) -> bool {
        let before = self.rules.groupings.len();
        self.rules.groupings.retain(|g| g != rule);
        self.rules.groupings.len() != before
    }

    /// Replaces `old` with `new` in place.
    ///
    /// Fails with `RuleNotFound`, leaving the snapshot untouched, when `old`
    /// is absent. If `new` already exists elsewhere that copy is dropped so
    /// the permission set stays duplicate-free. Returns whether the snapshot
    /// changed.
    pub fn update_permission(&mut self, old: &PermissionRule, new: PermissionRule) -> DomainResult<bool> {
        let Some(slot) = self.rules.permissions.iter().position(|p| p == old) else {
            return Err(DomainError::RuleNotFound {
                rule: old.to_string(),
            });
        };
        if *old == new {
            return Ok(false);
        }

        let permissions = std::mem::take(&mut self.rules.permissions);
        self.rules.permissions = permissions
            .into_iter()
            .enumerate()
            .filter_map(|(i, p)| {
                if i == slot {
                    Some(new.clone())
                } else if p == new || p == *old {
                    None
                } else {
                    Some(p)
                }
            })
            .collect();
        Ok(true)
    }

    pub fn role_graph(&self) -> RoleGraph {
        RoleGraph::new(&self.rules.groupings)
    }

    /// Distinct group names in first-appearance order.
    pub fn roles(&self) -> Vec<String> {
        let mut roles: Vec<String> = Vec::new();
        for rule in &self.rules.groupings {
            if !roles.contains(&rule.group) {
                roles.push(rule.group.clone());
            }
        }
        roles
    }

    /// Grouping rules grouped by member.
    ///
    /// Users appear in order of their first grouping rule, and each user's
    /// roles keep grouping-rule enumeration order.
    pub fn users_with_roles(&self) -> Vec<UserRoles> {
        let mut users: Vec<UserRoles> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();
        for rule in &self.rules.groupings {
            match index.get(rule.member.as_str()) {
                Some(&i) => {
                    let roles = &mut users[i].roles;
                    if !roles.contains(&rule.group) {
                        roles.push(rule.group.clone());
                    }
                }
                None => {
                    index.insert(&rule.member, users.len());
                    users.push(UserRoles {
                        username: rule.member.clone(),
                        roles: vec![rule.group.clone()],
                    });
                }
            }
        }
        users
    }

    /// Permission rules that apply to `subject` directly or through any of
    /// its groups, in enumeration order.
    pub fn implicit_permissions(&self, subject: &str, config: &ResolverConfig) -> Vec<PermissionRule> {
        let groups = self.role_graph().resolve_groups(subject, config);
        self.rules
            .permissions
            .iter()
            .filter(|p| p.subject == subject || groups.contains(&p.subject))
            .cloned()
            .collect()
    }
}
