use super::*;
use pretty_assertions::assert_eq;

fn pos() -> Position {
    Position::new("test.es", 0, 0, 0)
}

#[test]
fn test_alloc_returns_sequential_ids() {
    let mut arena = ExprArena::new();
    let a = arena.alloc(ExprKind::Number(1.0), pos());
    let b = arena.alloc(ExprKind::Nil, pos());
    assert_eq!(a.index(), 0);
    assert_eq!(b.index(), 1);
    assert_eq!(arena.len(), 2);
    assert_eq!(arena.get(a).kind, ExprKind::Number(1.0));
}

#[test]
fn test_try_get_out_of_range() {
    let arena = ExprArena::new();
    assert!(arena.is_empty());
    assert!(arena.try_get(ExprId::new(3)).is_none());
}

#[test]
fn test_shared_arena_clone_shares_storage() {
    let mut arena = ExprArena::new();
    let id = arena.alloc(ExprKind::Str("x".into()), pos());
    let shared = SharedArena::new(arena);
    let other = shared.clone();
    assert!(shared.ptr_eq(&other));
    assert_eq!(other.get(id).kind, ExprKind::Str("x".into()));
}
