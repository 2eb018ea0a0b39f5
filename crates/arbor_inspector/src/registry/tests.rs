use super::*;
use pretty_assertions::assert_eq;

struct Thing;

impl Diagnosticable for Thing {}

fn value() -> InspectorObject {
    InspectorObject::Value(Rc::new(Thing))
}

#[test]
fn test_same_object_same_id() {
    let mut registry = ReferenceRegistry::new();
    let object = value();

    let first = registry.to_id(&object, "g");
    let second = registry.to_id(&object, "g");

    assert_eq!(first, "inspector-0");
    assert_eq!(first, second);
    assert_eq!(registry.ref_count(&first), Some(1));
    assert_eq!(registry.group_len("g"), 1);
}

#[test]
fn test_distinct_objects_get_distinct_ids() {
    let mut registry = ReferenceRegistry::new();
    let a = registry.to_id(&value(), "g");
    let b = registry.to_id(&InspectorObject::Node(Rc::new(DiagnosticsNode::block("x"))), "g");

    assert_ne!(a, b);
    assert_eq!(registry.len(), 2);
}

#[test]
fn test_dispose_group_evicts() {
    let mut registry = ReferenceRegistry::new();
    let object = value();
    let id = registry.to_id(&object, "g");
    registry.to_id(&object, "g");

    registry.dispose_group("g");

    assert_eq!(
        registry.to_object(&id).unwrap_err(),
        DiagnosticsError::not_found(id.clone())
    );
    assert!(registry.is_empty());
    assert_eq!(registry.group_len("g"), 0);
}

#[test]
fn test_other_groups_keep_objects_alive() {
    let mut registry = ReferenceRegistry::new();
    let object = value();
    let id = registry.to_id(&object, "a");
    assert_eq!(registry.to_id(&object, "b"), id);
    assert_eq!(registry.ref_count(&id), Some(2));

    registry.dispose_group("a");
    assert!(registry.to_object(&id).unwrap().same_object(&object));
    assert_eq!(registry.ref_count(&id), Some(1));

    registry.dispose_group("b");
    assert!(registry.to_object(&id).is_err());
}

#[test]
fn test_dispose_id() {
    let mut registry = ReferenceRegistry::new();
    let object = value();
    let id = registry.to_id(&object, "a");
    registry.to_id(&object, "b");

    assert!(matches!(
        registry.dispose_id(&id, "missing"),
        Err(DiagnosticsError::InvalidOperation(_))
    ));
    assert_eq!(
        registry.dispose_id("inspector-99", "a"),
        Err(DiagnosticsError::not_found("inspector-99"))
    );

    registry.dispose_id(&id, "a").unwrap();
    assert_eq!(registry.ref_count(&id), Some(1));
    assert!(matches!(
        registry.dispose_id(&id, "a"),
        Err(DiagnosticsError::InvalidOperation(_))
    ));

    registry.dispose_id(&id, "b").unwrap();
    assert!(registry.to_object(&id).is_err());
}

#[test]
fn test_dispose_all_groups_restarts_numbering() {
    let mut registry = ReferenceRegistry::new();
    registry.to_id(&value(), "a");
    registry.to_id(&value(), "b");

    registry.dispose_all_groups();

    assert!(registry.is_empty());
    assert_eq!(registry.to_id(&value(), "c"), "inspector-0");
}

#[test]
fn test_ids_are_not_reused_after_eviction() {
    let mut registry = ReferenceRegistry::new();
    let first = registry.to_id(&value(), "g");
    registry.dispose_group("g");
    let second = registry.to_id(&value(), "g");

    assert_ne!(first, second);
}
