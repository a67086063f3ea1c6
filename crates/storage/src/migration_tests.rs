use super::*;
use serde_json::json;

struct MockV1ToV2;

impl Migration for MockV1ToV2 {
    fn from_version(&self) -> u32 {
        1
    }

    fn to_version(&self) -> u32 {
        2
    }

    fn migrate(&self, mut snapshot: Value) -> Value {
        if let Some(obj) = snapshot.as_object_mut() {
            obj.insert("retry_count_default".to_string(), json!(0));
        }
        snapshot
    }
}

#[test]
fn snapshot_already_at_target_version_passes_through() {
    let registry = MigrationRegistry::new();
    let snapshot = json!({ "v": 2, "seq": 7 });
    let migrated = registry.migrate_to(snapshot.clone(), 2).unwrap();
    assert_eq!(migrated, snapshot);
}

#[test]
fn snapshot_newer_than_target_is_rejected() {
    let registry = MigrationRegistry::new();
    let snapshot = json!({ "v": 5, "seq": 1 });
    let err = registry.migrate_to(snapshot, 2).unwrap_err();
    assert!(matches!(err, MigrationError::TooNew { found: 5, target: 2 }));
}

#[test]
fn missing_migration_in_the_chain_is_reported() {
    let registry = MigrationRegistry::new();
    let snapshot = json!({ "v": 1, "seq": 1 });
    let err = registry.migrate_to(snapshot, 3).unwrap_err();
    assert!(matches!(err, MigrationError::NoPath { from: 1, to: 3 }));
}

#[test]
fn chain_application_preserves_unrelated_fields_while_bumping_version() {
    let mut registry = MigrationRegistry::new();
    registry.register(Box::new(MockV1ToV2));
    let snapshot = json!({ "v": 1, "seq": 42 });

    let migrated = registry.migrate_to(snapshot, 2).unwrap();
    assert_eq!(migrated["v"], json!(2));
    assert_eq!(migrated["seq"], json!(42));
    assert_eq!(migrated["retry_count_default"], json!(0));
}

#[test]
fn missing_version_field_is_treated_as_version_zero() {
    let registry = MigrationRegistry::new();
    let snapshot = json!({ "seq": 1 });
    let migrated = registry.migrate_to(snapshot, 0).unwrap();
    assert_eq!(migrated["seq"], json!(1));
}
