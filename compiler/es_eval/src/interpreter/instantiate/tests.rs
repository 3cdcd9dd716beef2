#![expect(clippy::unwrap_used, reason = "construction fixtures are well formed")]

use es_ir::{AstBuilder, ExprId};
use es_value::{Param, TypeKind};
use pretty_assertions::assert_eq;

use super::*;
use crate::buffer_handler;

fn session() -> Interpreter {
    let mut interpreter = Interpreter::builder().print_handler(buffer_handler()).build();
    interpreter.initialise().unwrap();
    interpreter
}

fn construct_with(interpreter: &mut Interpreter, ty: &Value, args: Vec<Value>) -> NativeResult {
    let root = interpreter.root();
    interpreter.call_value(ty, args, OrderedMap::new(), root)
}

fn method(interpreter: &Interpreter, name: &str, params: &[&str], build: impl FnOnce(&mut AstBuilder) -> ExprId) -> Value {
    let mut b = AstBuilder::new("class.es");
    let body = build(&mut b);
    let arena = b.finish();
    Value::function(FunctionValue::new(
        ValueInfo::named(name),
        params
            .iter()
            .map(|p| Param::new(*p, Value::primordial(Primordial::Any)))
            .collect(),
        FunctionBody::Ast { arena, body },
        interpreter.root(),
        Value::primordial(Primordial::Any),
    ))
}

/// `init(v) { this.<field> = v }`
fn field_init(interpreter: &Interpreter, field: &str) -> Value {
    method(interpreter, "init", &["v"], |b| {
        let this = b.var("this");
        let v = b.var("v");
        b.set_member(this, field, v)
    })
}

fn user_type(name: &str, user: UserType) -> Value {
    Value::type_value(TypeDescriptor::user(ValueInfo::named(name), user))
}

// Primordial coercion

#[test]
fn primordial_types_coerce() {
    let mut interpreter = session();
    let num = Value::primordial(Primordial::Num);
    let coerced = construct_with(&mut interpreter, &num, vec![Value::string("3")]).unwrap();
    assert_eq!(coerced.as_number(), Some(3.0));

    let text = Value::primordial(Primordial::Str);
    let coerced = construct_with(&mut interpreter, &text, vec![Value::Number(1.0)]).unwrap();
    assert_eq!(coerced.as_str(), Some("1"));

    let arr = Value::primordial(Primordial::Arr);
    let coerced = construct_with(&mut interpreter, &arr, vec![Value::Number(1.0), Value::Null]).unwrap();
    assert_eq!(coerced.repr(), "[1, nil]");

    let ty = Value::primordial(Primordial::Type);
    let coerced = construct_with(&mut interpreter, &ty, vec![Value::Bool(true)]).unwrap();
    assert_eq!(coerced.to_string(), "Bool");

    let err = Value::primordial(Primordial::Err);
    let Value::Error(made) = construct_with(&mut interpreter, &err, vec![Value::string("boom")]).unwrap() else {
        panic!("expected an error value");
    };
    assert_eq!(made.name(), "UserError");
    assert_eq!(made.details(), "boom");
}

#[test]
fn primordial_coercion_without_arguments_is_nil() {
    let mut interpreter = session();
    let num = Value::primordial(Primordial::Num);
    assert!(construct_with(&mut interpreter, &num, Vec::new()).unwrap().is_null());
}

#[test]
fn object_coercion_rejects_other_kinds() {
    let mut interpreter = session();
    let obj = Value::primordial(Primordial::Obj);
    let err = construct_with(&mut interpreter, &obj, vec![Value::Number(1.0)]).unwrap_err();
    assert_eq!(err.name(), "TypeError");
}

#[test]
fn combinators_cannot_be_called() {
    let mut interpreter = session();
    let union = Value::type_value(TypeDescriptor::combinator(TypeKind::Union(
        Value::primordial(Primordial::Num),
        Value::primordial(Primordial::Str),
    )));
    let err = construct_with(&mut interpreter, &union, Vec::new()).unwrap_err();
    assert_eq!(err.name(), "InvalidOperationError");
}

// User types

#[test]
fn abstract_types_cannot_be_constructed() {
    let mut interpreter = session();
    let mut user = UserType::new(interpreter.root());
    user.is_abstract = true;
    let shape = user_type("Shape", user);
    let err = construct_with(&mut interpreter, &shape, Vec::new()).unwrap_err();
    assert_eq!(err.details(), "Cannot construct abstract class 'Shape'");
}

#[test]
fn instances_carry_their_type_and_register() {
    let mut interpreter = session();
    let mut user = UserType::new(interpreter.root());
    user.init = Some(field_init(&interpreter, "x"));
    let point = user_type("Point", user);

    let instance = construct_with(&mut interpreter, &point, vec![Value::Number(4.0)]).unwrap();
    assert_eq!(instance.type_name(), "Point");
    assert_eq!(instance.as_object().unwrap().get("x").and_then(|v| v.as_number()), Some(4.0));
    assert!(crate::typing::includes(&point, &instance));

    let registered = point.as_type().unwrap().as_user().unwrap().instances();
    assert_eq!(registered.len(), 1);
    assert!(registered[0].identical(&instance));
}

#[test]
fn child_methods_replace_parent_methods() {
    let mut interpreter = session();
    let mut parent = UserType::new(interpreter.root());
    parent.methods = vec![
        method(&interpreter, "speak", &[], |b| b.str("parent")),
        method(&interpreter, "wave", &[], |b| b.str("wave")),
    ];
    let parent = user_type("Parent", parent);

    let mut child = UserType::new(interpreter.root());
    child.extends = Some(parent);
    child.methods = vec![method(&interpreter, "speak", &[], |b| b.str("child"))];
    let child = user_type("Child", child);

    let instance = construct_with(&mut interpreter, &child, Vec::new()).unwrap();
    let object = instance.as_object().unwrap();
    let speak = object.get("speak").unwrap();
    let wave = object.get("wave").unwrap();
    let root = interpreter.root();
    let said = interpreter.call_value(&speak, Vec::new(), OrderedMap::new(), root).unwrap();
    assert_eq!(said.as_str(), Some("child"));
    let waved = interpreter.call_value(&wave, Vec::new(), OrderedMap::new(), root).unwrap();
    assert_eq!(waved.as_str(), Some("wave"));
    assert!(speak.as_function().unwrap().this.as_ref().unwrap().identical(&instance));
}

#[test]
fn parent_initialiser_runs_implicitly() {
    let mut interpreter = session();
    let mut parent = UserType::new(interpreter.root());
    parent.init = Some(field_init(&interpreter, "x"));
    let parent = user_type("Parent", parent);

    let mut child = UserType::new(interpreter.root());
    child.extends = Some(parent);
    let child = user_type("Child", child);

    let instance = construct_with(&mut interpreter, &child, vec![Value::Number(9.0)]).unwrap();
    assert_eq!(instance.as_object().unwrap().get("x").and_then(|v| v.as_number()), Some(9.0));
}

#[test]
fn declared_properties_are_validated() {
    let mut interpreter = session();
    let mut user = UserType::new(interpreter.root());
    user.properties.insert("x", Value::primordial(Primordial::Num));
    user.init = Some(field_init(&interpreter, "x"));
    let point = user_type("Point", user);

    assert!(construct_with(&mut interpreter, &point, vec![Value::Number(1.0)]).is_ok());
    let err = construct_with(&mut interpreter, &point, vec![Value::string("one")]).unwrap_err();
    assert_eq!(err.name(), "TypeError");
    assert!(err.details().ends_with("for property 'x' of 'Point'"));
}

#[test]
fn ancestry_runs_root_first() {
    let interpreter = session();
    let base = user_type("Base", UserType::new(interpreter.root()));
    let mut middle = UserType::new(interpreter.root());
    middle.extends = Some(base);
    let middle = user_type("Middle", middle);
    let mut leaf = UserType::new(interpreter.root());
    leaf.extends = Some(middle);
    let leaf = user_type("Leaf", leaf);

    let names: Vec<String> = ancestry(&leaf).iter().map(ToString::to_string).collect();
    assert_eq!(names, ["Base", "Middle", "Leaf"]);
}
