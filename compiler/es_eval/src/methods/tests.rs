#![expect(clippy::unwrap_used, reason = "method fixtures are well formed")]

use es_value::{OrderedMap, Primordial};
use pretty_assertions::assert_eq;

use super::*;
use crate::{buffer_handler, Interpreter};

fn session() -> Interpreter {
    let mut interpreter = Interpreter::builder().print_handler(buffer_handler()).build();
    interpreter.initialise().unwrap();
    interpreter
}

fn invoke(interpreter: &mut Interpreter, receiver: &Value, name: &str, args: Vec<Value>) -> Value {
    let root = interpreter.root();
    let method = builtin_method(receiver, name, root).unwrap();
    interpreter.call_value(&method, args, OrderedMap::new(), root).unwrap()
}

fn numbers(items: &[f64]) -> Value {
    Value::array(items.iter().copied().map(Value::Number).collect())
}

#[test]
fn str_and_bool_convert_the_receiver() {
    let mut interpreter = session();
    let text = invoke(&mut interpreter, &Value::Number(1.5), "str", Vec::new());
    assert_eq!(text.as_str(), Some("1.5"));
    let truth = invoke(&mut interpreter, &Value::string(""), "bool", Vec::new());
    assert!(!truth.is_truthy());
}

#[test]
fn len_counts_characters_items_and_keys() {
    let mut interpreter = session();
    let len = |interpreter: &mut Interpreter, v: &Value| invoke(interpreter, v, "len", Vec::new()).as_number();
    assert_eq!(len(&mut interpreter, &Value::string("héllo")), Some(5.0));
    assert_eq!(len(&mut interpreter, &numbers(&[1.0, 2.0])), Some(2.0));
    let mut entries = OrderedMap::new();
    entries.insert("a", Value::Null);
    assert_eq!(len(&mut interpreter, &Value::object(entries)), Some(1.0));
}

#[test]
fn len_is_only_offered_to_collections() {
    let interpreter = session();
    assert!(builtin_method(&Value::Number(1.0), "len", interpreter.root()).is_none());
    assert!(builtin_method(&Value::Number(1.0), "missing", interpreter.root()).is_none());
}

#[test]
fn contains_searches_the_receiver() {
    let mut interpreter = session();
    let xs = numbers(&[1.0, 2.0, 3.0]);
    assert!(invoke(&mut interpreter, &xs, "contains", vec![Value::Number(2.0)]).is_truthy());
    assert!(!invoke(&mut interpreter, &xs, "contains", vec![Value::Number(9.0)]).is_truthy());
    let text = Value::string("entropy");
    assert!(invoke(&mut interpreter, &text, "contains", vec![Value::string("tro")]).is_truthy());
}

#[test]
fn keys_of_objects_and_arrays() {
    let mut interpreter = session();
    let mut entries = OrderedMap::new();
    entries.insert("b", Value::Number(1.0));
    entries.insert("a", Value::Number(2.0));
    let keys = invoke(&mut interpreter, &Value::object(entries), "keys", Vec::new());
    assert_eq!(keys.repr(), "['b', 'a']");
    let indices = invoke(&mut interpreter, &numbers(&[5.0, 6.0]), "keys", Vec::new());
    assert_eq!(indices.repr(), "[0, 1]");
}

#[test]
fn isa_checks_membership_and_is_checks_identity() {
    let mut interpreter = session();
    let num = Value::primordial(Primordial::Num);
    assert!(invoke(&mut interpreter, &Value::Number(3.0), "isa", vec![num.clone()]).is_truthy());
    assert!(!invoke(&mut interpreter, &Value::string("3"), "isa", vec![num]).is_truthy());

    let xs = numbers(&[1.0]);
    assert!(invoke(&mut interpreter, &xs, "is", vec![xs.clone()]).is_truthy());
    assert!(!invoke(&mut interpreter, &xs, "is", vec![numbers(&[1.0])]).is_truthy());
}

#[test]
fn clone_is_shallow() {
    let mut interpreter = session();
    let inner = numbers(&[1.0]);
    let outer = Value::array(vec![inner.clone()]);
    let copy = invoke(&mut interpreter, &outer, "clone", Vec::new());
    assert!(!copy.identical(&outer));
    let Value::Array(items) = &copy else {
        panic!("clone of an array is an array");
    };
    assert!(items.borrow()[0].identical(&inner));
}

#[test]
fn clone_keeps_instance_type() {
    let ty = Value::primordial(Primordial::Obj);
    let instance = Value::instance(OrderedMap::new(), ty.clone());
    let copy = shallow_clone(&instance);
    assert!(copy.type_of().identical(&ty));
}

#[test]
fn cloned_functions_keep_their_shape_and_behaviour() {
    let mut interpreter = session();
    let mut b = es_ir::AstBuilder::new("clone.es");
    let n = b.var("n");
    let two = b.num(2.0);
    let body = b.binary(es_ir::BinaryOp::Mul, n, two);
    let arena = b.finish();
    let original = Value::function(FunctionValue::new(
        es_value::ValueInfo::named("double"),
        vec![es_value::Param::new("n", Value::primordial(Primordial::Num))],
        es_value::FunctionBody::Ast { arena, body },
        interpreter.root(),
        Value::primordial(Primordial::Num),
    ));

    let copy = invoke(&mut interpreter, &original, "clone", Vec::new());
    assert!(!copy.identical(&original));
    let (a, b) = (original.as_function().unwrap(), copy.as_function().unwrap());
    assert_eq!(a.name(), b.name());
    assert_eq!(a.params.len(), b.params.len());
    assert_eq!(a.closure, b.closure);
    assert!(a.returns.identical(&b.returns));
    assert!(a.same_body(b));

    let root = interpreter.root();
    let args = || vec![Value::Number(21.0)];
    let from_original = interpreter.call_value(&original, args(), OrderedMap::new(), root).unwrap();
    let from_copy = interpreter.call_value(&copy, args(), OrderedMap::new(), root).unwrap();
    assert_eq!(from_original.as_number(), from_copy.as_number());
}

#[test]
fn has_property_covers_keys_indices_and_common_methods() {
    let mut interpreter = session();
    let mut entries = OrderedMap::new();
    entries.insert("x", Value::Null);
    let obj = Value::object(entries);
    assert!(invoke(&mut interpreter, &obj, "has_property", vec![Value::string("x")]).is_truthy());
    assert!(!invoke(&mut interpreter, &obj, "has_property", vec![Value::string("y")]).is_truthy());

    let xs = numbers(&[1.0, 2.0]);
    assert!(invoke(&mut interpreter, &xs, "has_property", vec![Value::Number(1.0)]).is_truthy());
    assert!(!invoke(&mut interpreter, &xs, "has_property", vec![Value::Number(2.0)]).is_truthy());
    assert!(invoke(&mut interpreter, &Value::Bool(true), "has_property", vec![Value::string("str")]).is_truthy());
}

#[test]
fn describe_then_info_reports_the_description() {
    let mut interpreter = session();
    let root = interpreter.root();
    let f = Value::function(FunctionValue::native("answer", root, Vec::new(), |_, _| Ok(Value::Number(42.0))));
    let same = invoke(&mut interpreter, &f, "describe", vec![Value::string("The answer.")]);
    assert!(same.identical(&f));

    let info = invoke(&mut interpreter, &f, "info", Vec::new());
    let record = info.as_object().unwrap();
    assert_eq!(record.get("name").unwrap().as_str(), Some("answer"));
    assert_eq!(record.get("description").unwrap().as_str(), Some("The answer."));
    assert_eq!(record.get("file").unwrap().as_str(), Some(es_ir::BUILTIN_FILE));
    assert!(record.get("builtin").unwrap().is_truthy());
}

#[test]
fn cast_and_type_use_the_receiver() {
    let mut interpreter = session();
    let cast = invoke(
        &mut interpreter,
        &Value::string("12"),
        "cast",
        vec![Value::primordial(Primordial::Num)],
    );
    assert_eq!(cast.as_number(), Some(12.0));
    let ty = invoke(&mut interpreter, &Value::Bool(false), "type", Vec::new());
    assert_eq!(ty.to_string(), "Bool");
}
