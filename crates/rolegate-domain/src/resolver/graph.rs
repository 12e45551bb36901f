use std::collections::{HashMap, HashSet};

use rolegate_storage::GroupingRule;
use tracing::{debug, trace};

use super::ResolverConfig;

/// The set of groups a subject transitively belongs to.
///
/// Iteration yields groups in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleSet {
    ordered: Vec<String>,
    members: HashSet<String>,
}

impl RoleSet {
    fn insert(&mut self, group: &str) -> bool {
        if self.members.insert(group.to_string()) {
            self.ordered.push(group.to_string());
            true
        } else {
            false
        }
    }

    pub fn contains(&self, group: &str) -> bool {
        self.members.contains(group)
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ordered.iter().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.ordered
    }
}

/// Membership graph built from grouping rules.
///
/// Edges of one member keep grouping-rule enumeration order.
#[derive(Debug, Clone, Default)]
pub struct RoleGraph {
    edges: HashMap<String, Vec<String>>,
}

impl RoleGraph {
    pub fn new(groupings: &[GroupingRule]) -> Self {
        let mut edges: HashMap<String, Vec<String>> = HashMap::new();
        for rule in groupings {
            let groups = edges.entry(rule.member.clone()).or_default();
            if !groups.contains(&rule.group) {
                groups.push(rule.group.clone());
            }
        }
        Self { edges }
    }

    /// Groups `member` is directly assigned to.
    pub fn direct_groups(&self, member: &str) -> &[String] {
        self.edges.get(member).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Computes every group reachable from `subject` within
    /// `config.max_depth` hops.
    ///
    /// Returns an empty set when `subject` has no grouping edges. Groups
    /// further away than the limit are not followed; the walk stops quietly
    /// and returns what it found so far.
    pub fn resolve_groups(&self, subject: &str, config: &ResolverConfig) -> RoleSet {
        let mut closure = RoleSet::default();
        let mut frontier: Vec<&str> = vec![subject];
        let mut depth: u32 = 0;

        while !frontier.is_empty() && depth < config.max_depth {
            let mut next = Vec::new();
            for member in frontier {
                for group in self.direct_groups(member) {
                    if closure.insert(group) {
                        next.push(group.as_str());
                    }
                }
            }
            depth += 1;
            frontier = next;
        }

        let truncated = frontier
            .iter()
            .any(|member| self.direct_groups(member).iter().any(|g| !closure.contains(g)));
        if truncated {
            debug!(
                subject,
                max_depth = config.max_depth,
                "role hierarchy deeper than limit, closure truncated"
            );
        }
        trace!(subject, groups = closure.len(), depth, "resolved role closure");
        closure
    }

    /// Whether `subject` is `group` or belongs to it within the depth limit.
    pub fn has_link(&self, subject: &str, group: &str, config: &ResolverConfig) -> bool {
        subject == group || self.resolve_groups(subject, config).contains(group)
    }
}
