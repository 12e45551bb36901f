use std::sync::Arc;

use rolegate_storage::{GroupingRule, PermissionRule, RuleSet, RuleStore};

use super::mocks::{CountingRuleStore, Failure, FailingRuleStore};
use crate::enforcer::{Enforcer, EnforcerConfig};
use crate::error::DomainError;
use crate::policy::UserRoles;

fn perm(subject: &str, object: &str, action: &str) -> PermissionRule {
    PermissionRule::new(subject, object, action)
}

fn example_rules() -> RuleSet {
    RuleSet::new(
        vec![
            perm("admin", "/api/user", "GET"),
            perm("admin", "/api/user", "DELETE"),
            perm("user", "/api/user", "GET"),
        ],
        vec![
            GroupingRule::new("leo", "admin"),
            GroupingRule::new("leo2", "admin"),
            GroupingRule::new("leo3", "user"),
        ],
    )
}

fn counting_enforcer(rules: &RuleSet) -> (Arc<CountingRuleStore>, Enforcer<CountingRuleStore>) {
    let store = Arc::new(CountingRuleStore::with_rules(rules));
    let enforcer = Enforcer::new(Arc::clone(&store));
    (store, enforcer)
}

// Test: Adding an existing rule is a no-op and skips the save
#[tokio::test]
async fn test_idempotent_add() {
    let (store, enforcer) = counting_enforcer(&example_rules());

    let added = enforcer
        .add_permission_rule(perm("admin", "/api/user", "POST"))
        .await
        .unwrap();
    assert!(added);
    assert_eq!(store.saves(), 1);

    let added = enforcer
        .add_permission_rule(perm("admin", "/api/user", "POST"))
        .await
        .unwrap();
    assert!(!added);
    assert_eq!(store.saves(), 1);

    let rules = enforcer.list_permission_rules().await.unwrap();
    assert_eq!(rules.len(), 4);
    assert_eq!(rules[3], perm("admin", "/api/user", "POST"));
}

// Test: Removing a missing rule succeeds without saving
#[tokio::test]
async fn test_remove_missing_is_noop_success() {
    let (store, enforcer) = counting_enforcer(&example_rules());
    let before = store.records().await;

    let removed = enforcer
        .remove_permission_rule(&perm("admin", "/nope", "GET"))
        .await
        .unwrap();

    assert!(!removed);
    assert_eq!(store.saves(), 0);
    assert_eq!(store.records().await, before);
}

// Test: Update with a missing old rule fails and leaves the store untouched
#[tokio::test]
async fn test_update_atomicity_missing_old() {
    let (store, enforcer) = counting_enforcer(&example_rules());
    let before = store.records().await;

    let err = enforcer
        .update_permission_rule(&perm("ghost", "/x", "GET"), perm("ghost", "/y", "GET"))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::RuleNotFound { ref rule } if rule == "p, ghost, /x, GET"));
    assert!(err.is_client_error());
    assert_eq!(store.saves(), 0);
    assert_eq!(store.records().await, before);
}

// Test: Update replaces the rule in place and takes effect immediately
#[tokio::test]
async fn test_update_replaces_rule() {
    let (_store, enforcer) = counting_enforcer(&example_rules());
    assert!(!enforcer.enforce("leo3", "/api/user/9", "GET").await.unwrap());

    let updated = enforcer
        .update_permission_rule(&perm("user", "/api/user", "GET"), perm("user", "/api/user/:id", "GET"))
        .await
        .unwrap();

    assert!(updated);
    assert!(enforcer.enforce("leo3", "/api/user/9", "GET").await.unwrap());
    assert!(!enforcer.enforce("leo3", "/api/user", "GET").await.unwrap());
    assert_eq!(
        enforcer.list_permission_rules().await.unwrap(),
        vec![
            perm("admin", "/api/user", "GET"),
            perm("admin", "/api/user", "DELETE"),
            perm("user", "/api/user/:id", "GET"),
        ]
    );
}

// Test: Updating onto an existing rule keeps the set duplicate-free
#[tokio::test]
async fn test_update_onto_existing_rule() {
    let (_store, enforcer) = counting_enforcer(&example_rules());

    enforcer
        .update_permission_rule(&perm("admin", "/api/user", "DELETE"), perm("admin", "/api/user", "GET"))
        .await
        .unwrap();

    assert_eq!(
        enforcer.list_permission_rules().await.unwrap(),
        vec![perm("admin", "/api/user", "GET"), perm("user", "/api/user", "GET")]
    );
}

// Test: Malformed rules are rejected before the store is touched
#[tokio::test]
async fn test_malformed_rule_rejected_before_store() {
    let (store, enforcer) = counting_enforcer(&example_rules());

    let err = enforcer
        .add_permission_rule(perm("admin", "api/user", "GET"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::MalformedRule { ref field, .. } if field == "object"));

    let err = enforcer.add_user_to_role("leo", "").await.unwrap_err();
    assert!(matches!(err, DomainError::MalformedRule { ref field, .. } if field == "group"));

    let err = enforcer
        .update_permission_rule(&perm("admin", "/api/user", "GET"), perm("admin", "/api/user", " GET"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::MalformedRule { ref field, .. } if field == "action"));

    assert_eq!(store.loads(), 0);
    assert_eq!(store.saves(), 0);
}

// Test: Stored rules that would fail new-rule checks can still be removed or replaced
#[tokio::test]
async fn test_nonconforming_stored_rules_can_be_removed() {
    let long_role = "r".repeat(120);
    let (store, enforcer) = counting_enforcer(&RuleSet::new(
        vec![
            perm("admin", "api/user", "GET"),
            perm("admin", "api/report", "GET"),
        ],
        vec![GroupingRule::new("leo", long_role.as_str())],
    ));

    assert!(enforcer
        .remove_permission_rule(&perm("admin", "api/user", "GET"))
        .await
        .unwrap());
    assert!(enforcer
        .update_permission_rule(&perm("admin", "api/report", "GET"), perm("admin", "/api/report", "GET"))
        .await
        .unwrap());
    assert!(enforcer.remove_user_from_role("leo", &long_role).await.unwrap());

    assert_eq!(
        enforcer.list_permission_rules().await.unwrap(),
        vec![perm("admin", "/api/report", "GET")]
    );
    assert!(enforcer.list_users_with_roles().await.unwrap().is_empty());
    assert_eq!(store.saves(), 3);

    // Empty fields are still refused for lookups.
    let err = enforcer
        .remove_permission_rule(&perm("admin", "", "GET"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::MalformedRule { ref field, .. } if field == "object"));
}

// Test: Users and roles views reflect grouping rules
#[tokio::test]
async fn test_user_role_management() {
    let (_store, enforcer) = counting_enforcer(&example_rules());

    assert_eq!(enforcer.list_roles().await.unwrap(), vec!["admin", "user"]);

    assert!(enforcer.add_user_to_role("leo", "auditor").await.unwrap());
    assert!(!enforcer.add_user_to_role("leo", "auditor").await.unwrap());
    assert!(enforcer.remove_user_from_role("leo2", "admin").await.unwrap());
    assert!(!enforcer.remove_user_from_role("leo2", "admin").await.unwrap());

    assert_eq!(
        enforcer.list_roles().await.unwrap(),
        vec!["admin", "user", "auditor"]
    );
    assert_eq!(
        enforcer.list_users_with_roles().await.unwrap(),
        vec![
            UserRoles {
                username: "leo".to_string(),
                roles: vec!["admin".to_string(), "auditor".to_string()],
            },
            UserRoles {
                username: "leo3".to_string(),
                roles: vec!["user".to_string()],
            },
        ]
    );
    assert!(!enforcer.enforce("leo2", "/api/user", "GET").await.unwrap());
}

// Test: Newly assigned role grants access on the next decision
#[tokio::test]
async fn test_role_assignment_affects_decisions() {
    let (_store, enforcer) = counting_enforcer(&example_rules());
    assert!(!enforcer.enforce("ana", "/api/user", "DELETE").await.unwrap());

    enforcer.add_user_to_role("ana", "admin").await.unwrap();

    assert!(enforcer.enforce("ana", "/api/user", "DELETE").await.unwrap());
}

// Test: Failed save surfaces the store error and leaves durable state
#[tokio::test]
async fn test_save_failure_propagates() {
    let store = Arc::new(FailingRuleStore::failing_saves(&example_rules(), Failure::Unavailable));
    let enforcer = Enforcer::new(Arc::clone(&store));
    let before = store.records().await;

    let err = enforcer
        .add_permission_rule(perm("admin", "/api/user", "POST"))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::StoreUnavailable(_)));
    assert_eq!(store.records().await, before);
    assert!(!enforcer.enforce("leo", "/api/user", "POST").await.unwrap());
}

// Test: Write conflicts are reported as such
#[tokio::test]
async fn test_write_conflict_propagates() {
    let store = Arc::new(FailingRuleStore::failing_saves(&example_rules(), Failure::Conflict));
    let enforcer = Enforcer::new(store);

    let err = enforcer.add_user_to_role("ana", "admin").await.unwrap_err();

    assert!(matches!(err, DomainError::WriteConflict { .. }));
    assert!(!err.is_evaluation_failure());
}

// Test: Saving a freshly loaded snapshot leaves durable state unchanged
#[tokio::test]
async fn test_round_trip_leaves_store_unchanged() {
    let (store, _enforcer) = counting_enforcer(&example_rules());
    let before = store.records().await;

    let loaded = store.load().await.unwrap();
    store.save(&loaded).await.unwrap();

    assert_eq!(store.records().await, before);
}

// Test: Serialised mutations never lose concurrent updates
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_mutations_are_not_lost() {
    let store = Arc::new(CountingRuleStore::default());
    let enforcer = Arc::new(Enforcer::with_config(
        Arc::clone(&store),
        EnforcerConfig::default().with_serialized_mutations(true),
    ));

    let mut handles = Vec::new();
    for i in 0..32 {
        let enforcer = Arc::clone(&enforcer);
        handles.push(tokio::spawn(async move {
            enforcer
                .add_permission_rule(perm("admin", &format!("/api/item{i}"), "GET"))
                .await
        }));
    }
    for handle in handles {
        assert!(handle.await.unwrap().unwrap());
    }

    assert_eq!(enforcer.list_permission_rules().await.unwrap().len(), 32);
    assert_eq!(store.saves(), 32);
}

// Test: Unserialised mutations still apply when they do not overlap
#[tokio::test]
async fn test_unserialized_sequential_mutations() {
    let store = Arc::new(CountingRuleStore::default());
    let enforcer = Enforcer::with_config(
        Arc::clone(&store),
        EnforcerConfig::default().with_serialized_mutations(false),
    );

    enforcer.add_user_to_role("leo", "admin").await.unwrap();
    enforcer
        .add_permission_rule(perm("admin", "/a", "GET"))
        .await
        .unwrap();

    assert!(enforcer.enforce("leo", "/a", "GET").await.unwrap());
    assert_eq!(store.saves(), 2);
}

// Test: Health check reports store failures as unavailable
#[tokio::test]
async fn test_health_check_failure() {
    let enforcer = Enforcer::new(Arc::new(FailingRuleStore::failing_loads(Failure::Unavailable)));

    let err = enforcer.health_check().await.unwrap_err();

    assert!(matches!(err, DomainError::StoreUnavailable(_)));
}
