//! Rule value types and their flattened on-disk layout.
//!
//! Rules are persisted as rows of a single table `(ptype, v0, v1, v2, v3, v4, v5)`:
//!
//! | ptype | v0      | v1          | v2     | v3..v5 |
//! |-------|---------|-------------|--------|--------|
//! | `p`   | subject | object      | action | empty  |
//! | `g`   | member  | group       | empty  | empty  |
//!
//! In memory the two shapes are distinct types; [`PolicyRecord`] is only the
//! row representation used by backends.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{StorageError, StorageResult};

/// `ptype` value for permission rules.
pub const PERMISSION_PTYPE: &str = "p";
/// `ptype` value for grouping rules.
pub const GROUPING_PTYPE: &str = "g";

/// An allow rule: `subject` may perform `action` on paths matching `object`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermissionRule {
    pub subject: String,
    pub object: String,
    pub action: String,
}

impl PermissionRule {
    pub fn new(
        subject: impl Into<String>,
        object: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            object: object.into(),
            action: action.into(),
        }
    }
}

impl fmt::Display for PermissionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p, {}, {}, {}", self.subject, self.object, self.action)
    }
}

/// A membership edge: `member` belongs to `group`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupingRule {
    pub member: String,
    pub group: String,
}

impl GroupingRule {
    pub fn new(member: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            member: member.into(),
            group: group.into(),
        }
    }
}

impl fmt::Display for GroupingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g, {}, {}", self.member, self.group)
    }
}

/// Either rule shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Rule {
    Permission(PermissionRule),
    Grouping(GroupingRule),
}

/// The full rule set exchanged with a store by `load` and `save`.
///
/// Enumeration order is the order rules were persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    pub permissions: Vec<PermissionRule>,
    pub groupings: Vec<GroupingRule>,
}

impl RuleSet {
    pub fn new(permissions: Vec<PermissionRule>, groupings: Vec<GroupingRule>) -> Self {
        Self {
            permissions,
            groupings,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty() && self.groupings.is_empty()
    }

    /// Total number of rules of both kinds.
    pub fn len(&self) -> usize {
        self.permissions.len() + self.groupings.len()
    }

    /// Flattens the set into rows: permission rules first, then groupings.
    ///
    /// Stored row order is therefore not preserved across `load` and `save`
    /// when a table interleaves kinds, and backends assign fresh row ids on
    /// every save. Rule order within each kind is kept.
    pub fn to_records(&self) -> Vec<PolicyRecord> {
        self.permissions
            .iter()
            .map(PolicyRecord::from)
            .chain(self.groupings.iter().map(PolicyRecord::from))
            .collect()
    }

    /// Rebuilds a rule set from rows, preserving row order within each kind.
    pub fn from_records<I>(records: I) -> StorageResult<Self>
    where
        I: IntoIterator<Item = PolicyRecord>,
    {
        let mut set = RuleSet::default();
        for record in records {
            match Rule::try_from(record)? {
                Rule::Permission(p) => set.permissions.push(p),
                Rule::Grouping(g) => set.groupings.push(g),
            }
        }
        Ok(set)
    }
}

/// One flattened row of the rule table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PolicyRecord {
    pub ptype: String,
    pub v0: String,
    pub v1: String,
    pub v2: String,
    pub v3: String,
    pub v4: String,
    pub v5: String,
}

impl PolicyRecord {
    fn columns(&self) -> [&str; 6] {
        [&self.v0, &self.v1, &self.v2, &self.v3, &self.v4, &self.v5]
    }
}

impl From<&PermissionRule> for PolicyRecord {
    fn from(rule: &PermissionRule) -> Self {
        Self {
            ptype: PERMISSION_PTYPE.to_string(),
            v0: rule.subject.clone(),
            v1: rule.object.clone(),
            v2: rule.action.clone(),
            ..Default::default()
        }
    }
}

impl From<&GroupingRule> for PolicyRecord {
    fn from(rule: &GroupingRule) -> Self {
        Self {
            ptype: GROUPING_PTYPE.to_string(),
            v0: rule.member.clone(),
            v1: rule.group.clone(),
            ..Default::default()
        }
    }
}

impl From<&Rule> for PolicyRecord {
    fn from(rule: &Rule) -> Self {
        match rule {
            Rule::Permission(p) => p.into(),
            Rule::Grouping(g) => g.into(),
        }
    }
}

impl TryFrom<PolicyRecord> for Rule {
    type Error = StorageError;

    fn try_from(record: PolicyRecord) -> Result<Self, Self::Error> {
        let arity = match record.ptype.as_str() {
            PERMISSION_PTYPE => 3,
            GROUPING_PTYPE => 2,
            other => {
                return Err(StorageError::MalformedRecord {
                    message: format!("unknown ptype '{other}'"),
                })
            }
        };

        let columns = record.columns();
        if let Some(pos) = columns[..arity].iter().position(|v| v.is_empty()) {
            return Err(StorageError::MalformedRecord {
                message: format!("{} rule has empty v{pos}", record.ptype),
            });
        }
        if let Some(pos) = columns[arity..].iter().position(|v| !v.is_empty()) {
            return Err(StorageError::MalformedRecord {
                message: format!(
                    "{} rule uses reserved column v{}",
                    record.ptype,
                    arity + pos
                ),
            });
        }

        let PolicyRecord { v0, v1, v2, .. } = record;
        Ok(if arity == 3 {
            Rule::Permission(PermissionRule {
                subject: v0,
                object: v1,
                action: v2,
            })
        } else {
            Rule::Grouping(GroupingRule {
                member: v0,
                group: v1,
            })
        })
    }
}
