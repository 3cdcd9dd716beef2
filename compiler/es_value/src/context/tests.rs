#![expect(clippy::unwrap_used, reason = "tests unwrap scope operations that must succeed")]

use super::*;
use pretty_assertions::assert_eq;

fn num(n: f64) -> Value {
    Value::Number(n)
}

fn get_num(arena: &ContextArena, id: ContextId, name: &str) -> Option<f64> {
    arena.get(id, name).unwrap().and_then(|v| v.as_number())
}

#[test]
fn test_lookup_walks_parents() {
    let mut arena = ContextArena::new();
    let root = arena.root();
    arena.declare(root, "a", num(1.0), SetOptions::default()).unwrap();
    let child = arena.new_child(root).unwrap();
    assert_eq!(get_num(&arena, child, "a"), Some(1.0));
    assert!(arena.has(child, "a"));
    assert!(!arena.has_own(child, "a"));
    assert_eq!(arena.get(child, "missing").unwrap().map(|v| v.to_string()), None);
}

#[test]
fn test_set_rebinds_nearest_or_creates_locally() {
    let mut arena = ContextArena::new();
    let root = arena.root();
    arena.declare(root, "a", num(1.0), SetOptions::default()).unwrap();
    let child = arena.new_child(root).unwrap();
    arena.set(child, "a", num(2.0), SetOptions::default()).unwrap();
    assert_eq!(get_num(&arena, root, "a"), Some(2.0));
    arena.set(child, "fresh", num(3.0), SetOptions::default()).unwrap();
    assert!(arena.has_own(child, "fresh"));
    assert!(!arena.has(root, "fresh"));
}

#[test]
fn test_constant_rejects_reassignment_unless_forced() {
    let mut arena = ContextArena::new();
    let root = arena.root();
    arena.declare(root, "c", num(1.0), SetOptions::constant()).unwrap();
    let err = arena.set(root, "c", num(2.0), SetOptions::default()).unwrap_err();
    assert_eq!(err, ContextError::Constant("c".into()));
    let forced = SetOptions {
        force_through_const: true,
        ..SetOptions::default()
    };
    arena.set_own(root, "c", num(5.0), forced).unwrap();
    assert_eq!(get_num(&arena, root, "c"), Some(5.0));
}

#[test]
fn test_redeclaration_is_rejected_in_same_scope_only() {
    let mut arena = ContextArena::new();
    let root = arena.root();
    arena.declare(root, "x", num(1.0), SetOptions::default()).unwrap();
    let err = arena.declare(root, "x", num(2.0), SetOptions::default()).unwrap_err();
    assert_eq!(err, ContextError::Redeclared("x".into()));
    let child = arena.new_child(root).unwrap();
    arena.declare(child, "x", num(3.0), SetOptions::default()).unwrap();
    assert_eq!(get_num(&arena, child, "x"), Some(3.0));
    assert_eq!(get_num(&arena, root, "x"), Some(1.0));
}

#[test]
fn test_global_binds_at_root() {
    let mut arena = ContextArena::new();
    let root = arena.root();
    let child = arena.new_child(root).unwrap();
    let grandchild = arena.new_child(child).unwrap();
    let opts = SetOptions {
        global: true,
        ..SetOptions::default()
    };
    arena.declare(grandchild, "g", num(9.0), opts).unwrap();
    assert!(arena.has_own(root, "g"));
    assert!(arena.get_symbol(root, "g").unwrap().unwrap().is_global());
}

#[test]
fn test_global_flag_cleared_outside_global_scope() {
    let mut arena = ContextArena::new();
    let root = arena.root();
    let child = arena.new_child(root).unwrap();
    let opts = SetOptions {
        global: true,
        ..SetOptions::default()
    };
    arena.set_own(child, "g", num(1.0), opts).unwrap();
    assert!(!arena.get_symbol(child, "g").unwrap().unwrap().is_global());
}

#[test]
fn test_hidden_symbol_is_inaccessible() {
    let mut arena = ContextArena::new();
    let root = arena.root();
    let opts = SetOptions {
        hidden: true,
        ..SetOptions::default()
    };
    arena.declare(root, "secret", num(1.0), opts).unwrap();
    assert_eq!(
        arena.get(root, "secret").unwrap_err(),
        ContextError::Inaccessible("secret".into())
    );
    assert!(arena.symbol_table(root).unwrap().is_empty());
}

#[test]
fn test_declared_type_survives_reassignment() {
    let mut arena = ContextArena::new();
    let root = arena.root();
    let ty = Value::primordial(crate::Primordial::Num);
    arena
        .declare(root, "n", num(1.0), SetOptions::default().typed(ty.clone()))
        .unwrap();
    arena.set(root, "n", num(2.0), SetOptions::default()).unwrap();
    let symbol = arena.get_symbol(root, "n").unwrap().unwrap();
    assert!(symbol.ty.as_ref().is_some_and(|t| t.identical(&ty)));
}

#[test]
fn test_remove_and_clear() {
    let mut arena = ContextArena::new();
    let root = arena.root();
    arena.declare(root, "a", num(1.0), SetOptions::default()).unwrap();
    arena.declare(root, "k", num(2.0), SetOptions::constant()).unwrap();
    let child = arena.new_child(root).unwrap();
    assert_eq!(arena.remove(child, "a").unwrap().as_number(), Some(1.0));
    assert_eq!(arena.remove(child, "a").unwrap_err(), ContextError::Undefined("a".into()));
    assert_eq!(arena.remove(child, "k").unwrap_err(), ContextError::Constant("k".into()));
    arena.clear(root).unwrap();
    assert!(arena.keys(root).unwrap().is_empty());
}

#[test]
fn test_release_invalidates_handle_and_reuses_slot() {
    let mut arena = ContextArena::new();
    let root = arena.root();
    let child = arena.new_child(root).unwrap();
    arena.declare(child, "a", num(1.0), SetOptions::default()).unwrap();
    arena.release(child);
    assert!(!arena.is_alive(child));
    assert_eq!(arena.get(child, "a").unwrap_err(), ContextError::Released);
    let reused = arena.new_child(root).unwrap();
    assert_ne!(reused, child);
    assert!(!arena.has(reused, "a"));
    assert_eq!(arena.live_count(), 2);
}

#[test]
fn test_pinned_chain_survives_release() {
    let mut arena = ContextArena::new();
    let root = arena.root();
    let outer = arena.new_child(root).unwrap();
    let inner = arena.new_child(outer).unwrap();
    arena.pin(inner);
    arena.release(inner);
    arena.release(outer);
    arena.release(root);
    assert!(arena.is_alive(inner));
    assert!(arena.is_alive(outer));
    assert!(arena.is_pinned(outer));
    assert_eq!(arena.root_of(inner), root);
}

#[test]
fn test_context_error_maps_to_script_errors() {
    let err: EsError = ContextError::Constant("a".into()).into();
    assert_eq!(err.name(), "TypeError");
    let err: EsError = ContextError::Redeclared("a".into()).into();
    assert_eq!(err.name(), "InvalidSyntaxError");
    let err: EsError = ContextError::Undefined("a".into()).into();
    assert_eq!(err.to_string(), "ReferenceError: 'a' is not defined");
}

#[test]
fn test_new_child_fails_cleanly_when_full_or_orphaned() {
    let mut arena = ContextArena::with_limit(2);
    let root = arena.root();
    let child = arena.new_child(root).unwrap();
    assert_eq!(arena.new_child(root), Err(ContextError::Exhausted(2)));
    arena.release(child);
    let reused = arena.new_child(root).unwrap();
    assert!(arena.is_alive(reused));
    assert_eq!(arena.new_child(child), Err(ContextError::Released));

    let err: EsError = ContextError::Exhausted(2).into();
    assert_eq!(err.name(), "TypeError");
}
