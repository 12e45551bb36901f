//! Rule validation.
//!
//! Every rule a mutation writes is checked here before the store is
//! touched:
//! - fields are non-empty and carry no surrounding whitespace
//! - fields fit the storage column width
//! - fields contain no control characters
//! - permission objects are absolute path patterns
//!
//! Rules that are only looked up (removal targets, the `old` side of an
//! update) may already be stored by other tooling, so they only need
//! non-empty fields.

use rolegate_storage::{GroupingRule, PermissionRule, Rule};

use crate::error::{DomainError, DomainResult};

/// Maximum byte length of a single rule field.
pub const MAX_FIELD_LENGTH: usize = 100;

fn malformed(field: &str, reason: impl Into<String>) -> DomainError {
    DomainError::MalformedRule {
        field: field.to_string(),
        reason: reason.into(),
    }
}

/// Validates one rule field.
pub fn validate_field(field: &str, value: &str) -> DomainResult<()> {
    if value.is_empty() {
        return Err(malformed(field, "must not be empty"));
    }
    if value.trim() != value {
        return Err(malformed(field, "must not have leading or trailing whitespace"));
    }
    if value.len() > MAX_FIELD_LENGTH {
        return Err(malformed(
            field,
            format!("exceeds {MAX_FIELD_LENGTH} bytes"),
        ));
    }
    if value.chars().any(char::is_control) {
        return Err(malformed(field, "must not contain control characters"));
    }
    Ok(())
}

fn require_present(field: &str, value: &str) -> DomainResult<()> {
    if value.is_empty() {
        return Err(malformed(field, "must not be empty"));
    }
    Ok(())
}

/// Checks a permission rule that is looked up rather than written.
pub fn validate_permission_target(rule: &PermissionRule) -> DomainResult<()> {
    require_present("subject", &rule.subject)?;
    require_present("object", &rule.object)?;
    require_present("action", &rule.action)
}

/// Checks a grouping rule that is looked up rather than written.
pub fn validate_grouping_target(rule: &GroupingRule) -> DomainResult<()> {
    require_present("member", &rule.member)?;
    require_present("group", &rule.group)
}

pub fn validate_permission_rule(rule: &PermissionRule) -> DomainResult<()> {
    validate_field("subject", &rule.subject)?;
    validate_field("object", &rule.object)?;
    validate_field("action", &rule.action)?;
    if !rule.object.starts_with('/') {
        return Err(malformed("object", "must start with '/'"));
    }
    Ok(())
}

pub fn validate_grouping_rule(rule: &GroupingRule) -> DomainResult<()> {
    validate_field("member", &rule.member)?;
    validate_field("group", &rule.group)
}

pub fn validate_rule(rule: &Rule) -> DomainResult<()> {
    match rule {
        Rule::Permission(p) => validate_permission_rule(p),
        Rule::Grouping(g) => validate_grouping_rule(g),
    }
}
