use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_nodes_take_current_position() {
    let mut b = AstBuilder::new("main.es");
    let first = b.num(1.0);
    b.at(4, 2);
    let second = b.var("x");
    let arena = b.finish();
    assert_eq!(arena.get(first).pos.line, 0);
    assert_eq!(arena.get(second).pos.line, 4);
    assert_eq!(arena.get(second).pos.col, 2);
    assert_eq!(&*arena.get(second).pos.file, "main.es");
}

#[test]
fn test_member_builds_string_index() {
    let mut b = AstBuilder::new("main.es");
    let base = b.var("obj");
    let member = b.member(base, "field");
    let arena = b.finish();
    let ExprKind::Index {
        base: got_base,
        index,
        assign,
        optional,
    } = &arena.get(member).kind
    else {
        panic!("expected index node");
    };
    assert_eq!(*got_base, base);
    assert_eq!(arena.get(*index).kind, ExprKind::Str("field".into()));
    assert!(assign.is_none());
    assert!(!optional);
}

#[test]
fn test_declare_records_intent() {
    let mut b = AstBuilder::new("main.es");
    let one = b.num(1.0);
    let decl = b.let_const("n", one);
    let arena = b.finish();
    let ExprKind::Assign { declaration, op, .. } = &arena.get(decl).kind else {
        panic!("expected assign node");
    };
    assert_eq!(*declaration, Some(Declaration::CONST));
    assert_eq!(*op, AssignOp::Assign);
}

#[test]
fn test_compound_assign_maps_to_binary() {
    assert_eq!(AssignOp::Add.binary(), Some(BinaryOp::Add));
    assert_eq!(AssignOp::Assign.binary(), None);
    assert_eq!(AssignOp::Div.as_symbol(), "/=");
    assert_eq!(UnaryOp::Complement.as_symbol(), "~");
}
