//! The fixed RBAC model with path-pattern objects.

use rolegate_storage::{GroupingRule, PermissionRule, Rule, RuleSet};

use crate::error::{DomainError, DomainResult};
use crate::matcher::key_match2;
use crate::resolver::RoleSet;
use crate::validation::validate_rule;

/// Textual form of the model, in the conventional policy-model layout.
pub const MODEL_CONF: &str = include_str!("model.conf");

/// How the outcomes of individual rule matches combine into a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Allow iff at least one permission rule matches. No deny rules exist.
    AllowOverride,
}

impl Effect {
    pub fn combine<I>(self, matches: I) -> bool
    where
        I: IntoIterator<Item = bool>,
    {
        match self {
            Effect::AllowOverride => matches.into_iter().any(|m| m),
        }
    }
}

/// An access request: may `subject` perform `action` on `object`?
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request<'a> {
    pub subject: &'a str,
    pub object: &'a str,
    pub action: &'a str,
}

impl<'a> Request<'a> {
    pub fn new(subject: &'a str, object: &'a str, action: &'a str) -> Self {
        Self {
            subject,
            object,
            action,
        }
    }

    /// A request with any empty field can never be allowed.
    pub fn is_incomplete(&self) -> bool {
        self.subject.is_empty() || self.object.is_empty() || self.action.is_empty()
    }
}

/// Static description of the policy model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelDefinition {
    pub request_arity: usize,
    pub policy_arity: usize,
    pub grouping_arity: usize,
    pub effect: Effect,
}

/// `g(r.sub, p.sub) && keyMatch2(r.obj, p.obj) && r.act == p.act` with
/// some-allow effect.
pub const RBAC_WITH_PATHS: ModelDefinition = ModelDefinition {
    request_arity: 3,
    policy_arity: 3,
    grouping_arity: 2,
    effect: Effect::AllowOverride,
};

impl Default for ModelDefinition {
    fn default() -> Self {
        RBAC_WITH_PATHS
    }
}

fn check_arity(kind: &str, expected: usize, fields: &[&str]) -> DomainResult<()> {
    if fields.len() != expected {
        return Err(DomainError::EvaluationError {
            message: format!(
                "{kind} expects {expected} fields, got {}",
                fields.len()
            ),
        });
    }
    Ok(())
}

impl ModelDefinition {
    pub fn check_request_arity(&self, fields: &[&str]) -> DomainResult<()> {
        check_arity("request", self.request_arity, fields)
    }

    pub fn check_permission_arity(&self, fields: &[&str]) -> DomainResult<()> {
        check_arity("permission rule", self.policy_arity, fields)
    }

    pub fn check_grouping_arity(&self, fields: &[&str]) -> DomainResult<()> {
        check_arity("grouping rule", self.grouping_arity, fields)
    }

    /// Evaluates the matcher for one rule.
    ///
    /// `groups` is the role closure of `request.subject`.
    pub fn rule_matches(&self, request: &Request<'_>, groups: &RoleSet, rule: &PermissionRule) -> bool {
        let subject_matches =
            request.subject == rule.subject || groups.contains(&rule.subject);
        subject_matches
            && request.action == rule.action
            && key_match2(request.object, &rule.object)
    }

    /// Combines the matcher over every permission rule with the model effect.
    pub fn decide(&self, request: &Request<'_>, groups: &RoleSet, rules: &[PermissionRule]) -> bool {
        self.effect
            .combine(rules.iter().map(|rule| self.rule_matches(request, groups, rule)))
    }
}

/// Parses one policy line such as `p, admin, /api/user, GET` or
/// `g, leo, admin`.
pub fn parse_policy_line(line: &str) -> DomainResult<Rule> {
    let mut fields = line.split(',').map(str::trim);
    let ptype = fields.next().unwrap_or_default();
    let values: Vec<&str> = fields.collect();

    let rule = match ptype {
        "p" => {
            RBAC_WITH_PATHS.check_permission_arity(&values)?;
            Rule::Permission(PermissionRule::new(values[0], values[1], values[2]))
        }
        "g" => {
            RBAC_WITH_PATHS.check_grouping_arity(&values)?;
            Rule::Grouping(GroupingRule::new(values[0], values[1]))
        }
        other => {
            return Err(DomainError::EvaluationError {
                message: format!("unknown policy type '{other}'"),
            })
        }
    };
    validate_rule(&rule)?;
    Ok(rule)
}

/// Parses a policy document with one rule per line. Blank lines and lines
/// starting with `#` are skipped. Repeated rules are kept once.
pub fn parse_policy_text(text: &str) -> DomainResult<RuleSet> {
    let mut set = RuleSet::default();
    for line in text.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match parse_policy_line(line)? {
            Rule::Permission(p) if !set.permissions.contains(&p) => set.permissions.push(p),
            Rule::Grouping(g) if !set.groupings.contains(&g) => set.groupings.push(g),
            _ => {}
        }
    }
    Ok(set)
}
