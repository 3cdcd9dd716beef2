#![expect(clippy::unwrap_used, reason = "call fixtures are well formed")]

use es_ir::{AstBuilder, BinaryOp};
use es_value::{Primordial, ValueInfo};
use pretty_assertions::assert_eq;

use super::*;
use crate::{buffer_handler, EvalConfig};

fn session() -> Interpreter {
    let mut interpreter = Interpreter::builder().print_handler(buffer_handler()).build();
    interpreter.initialise().unwrap();
    interpreter
}

fn ty(kind: Primordial) -> Value {
    Value::primordial(kind)
}

/// `name(params) { body }` where the body is built by `build`.
fn ast_function(
    interpreter: &Interpreter,
    name: &str,
    params: Vec<Param>,
    build: impl FnOnce(&mut AstBuilder) -> es_ir::ExprId,
) -> Value {
    let mut b = AstBuilder::new("call.es");
    let body = build(&mut b);
    let arena = b.finish();
    Value::function(FunctionValue::new(
        ValueInfo::named(name),
        params,
        FunctionBody::Ast { arena, body },
        interpreter.root(),
        ty(Primordial::Any),
    ))
}

fn kwargs(entries: &[(&str, Value)]) -> OrderedMap<Value> {
    entries.iter().map(|(k, v)| (*k, v.clone())).collect()
}

fn call(interpreter: &mut Interpreter, callee: &Value, args: Vec<Value>, named: OrderedMap<Value>) -> NativeResult {
    let root = interpreter.root();
    interpreter.call_value(callee, args, named, root)
}

#[test]
fn positional_and_named_parameters_bind() {
    let mut interpreter = session();
    let params = vec![
        Param::new("a", ty(Primordial::Num)),
        Param::new("b", ty(Primordial::Num)).kwarg(),
    ];
    let f = ast_function(&interpreter, "sub", params, |b| {
        let a = b.var("a");
        let bv = b.var("b");
        b.binary(BinaryOp::Sub, a, bv)
    });
    let result = call(&mut interpreter, &f, vec![Value::Number(10.0)], kwargs(&[("b", Value::Number(4.0))]));
    assert_eq!(result.unwrap().as_number(), Some(6.0));
}

#[test]
fn missing_arguments_take_defaults_or_nil() {
    let mut interpreter = session();
    let params = vec![
        Param::new("a", ty(Primordial::Num)).with_default(Value::Number(7.0)),
        Param::new("b", ty(Primordial::Num)),
    ];
    let f = ast_function(&interpreter, "pair", params, |b| {
        let a = b.var("a");
        let bv = b.var("b");
        b.array(vec![a, bv])
    });
    let result = call(&mut interpreter, &f, Vec::new(), OrderedMap::new()).unwrap();
    assert_eq!(result.repr(), "[7, nil]");
}

#[test]
fn surplus_arguments_are_rejected_or_collected() {
    let mut interpreter = session();
    let f = ast_function(&interpreter, "one", vec![Param::new("a", ty(Primordial::Any))], |b| b.var("a"));
    let err = call(&mut interpreter, &f, vec![Value::Null, Value::Null], OrderedMap::new()).unwrap_err();
    assert_eq!(err.name(), "TypeError");
    assert_eq!(err.details(), "one() takes 1 positional argument(s) but 2 were given");

    let Value::Function(inner) = &f else { unreachable!() };
    let mut variadic = (**inner).clone();
    variadic.allow_args = true;
    variadic.body = {
        let mut b = AstBuilder::new("call.es");
        let body = b.var("varargs");
        FunctionBody::Ast { arena: b.finish(), body }
    };
    let variadic = Value::function(variadic);
    let result = call(
        &mut interpreter,
        &variadic,
        vec![Value::Number(1.0), Value::Number(2.0), Value::Number(3.0)],
        OrderedMap::new(),
    );
    assert_eq!(result.unwrap().repr(), "[2, 3]");
}

#[test]
fn unknown_keyword_is_rejected() {
    let mut interpreter = session();
    let f = ast_function(&interpreter, "f", Vec::new(), AstBuilder::nil);
    let err = call(&mut interpreter, &f, Vec::new(), kwargs(&[("x", Value::Null)])).unwrap_err();
    assert_eq!(err.details(), "f() got an unexpected keyword argument 'x'");
}

#[test]
fn parameter_types_are_checked() {
    let mut interpreter = session();
    let f = ast_function(&interpreter, "f", vec![Param::new("n", ty(Primordial::Num))], |b| b.var("n"));
    let err = call(&mut interpreter, &f, vec![Value::string("x")], OrderedMap::new()).unwrap_err();
    assert_eq!(err.name(), "TypeError");
    assert!(err.details().ends_with("for parameter 'n'"));

    let root = interpreter.root();
    let opts = CallOptions { dont_type_check: true };
    let result = interpreter.call_at(&f, vec![Value::string("x")], OrderedMap::new(), root, opts, None);
    assert_eq!(result.unwrap().as_str(), Some("x"));
}

#[test]
fn return_type_is_enforced_unless_disabled() {
    let build = |interpreter: &Interpreter| {
        let f = ast_function(interpreter, "f", Vec::new(), |b| b.str("text"));
        let Value::Function(inner) = &f else { unreachable!() };
        let mut typed = (**inner).clone();
        typed.returns = ty(Primordial::Num);
        Value::function(typed)
    };

    let mut interpreter = session();
    let f = build(&interpreter);
    let err = call(&mut interpreter, &f, Vec::new(), OrderedMap::new()).unwrap_err();
    assert!(err.details().ends_with("(from function return)"));

    let mut lenient = Interpreter::builder()
        .print_handler(buffer_handler())
        .config(EvalConfig {
            type_check_returns: false,
            ..EvalConfig::default()
        })
        .build();
    lenient.initialise().unwrap();
    let f = build(&lenient);
    assert_eq!(call(&mut lenient, &f, Vec::new(), OrderedMap::new()).unwrap().as_str(), Some("text"));
}

#[test]
fn natives_receive_padded_arguments() {
    let mut interpreter = session();
    let params = vec![
        Param::new("a", ty(Primordial::Num)),
        Param::new("b", ty(Primordial::Num)).with_default(Value::Number(2.0)),
    ];
    let mut native = FunctionValue::native("pow", interpreter.root(), params, |_, call| {
        let base = call.arg(0).as_number().unwrap_or_default();
        let exp = call.arg(1).as_number().unwrap_or_default();
        Ok(Value::Number(base.powf(exp)))
    });
    native.allow_args = false;
    let native = Value::function(native);
    let result = call(&mut interpreter, &native, vec![Value::Number(3.0)], OrderedMap::new());
    assert_eq!(result.unwrap().as_number(), Some(9.0));

    let err = call(
        &mut interpreter,
        &native,
        vec![Value::Number(1.0), Value::Number(1.0), Value::Number(1.0)],
        OrderedMap::new(),
    )
    .unwrap_err();
    assert_eq!(err.name(), "TypeError");
}

#[test]
fn natives_check_keywords_and_evaluate_default_expressions() {
    let mut interpreter = session();
    let mut b = AstBuilder::new("defaults.es");
    let two = b.num(2.0);
    let three = b.num(3.0);
    let expr = b.binary(BinaryOp::Mul, two, three);
    let arena = b.finish();
    let mut by = Param::new("by", ty(Primordial::Num)).kwarg();
    by.default = Some(ParamDefault::Expr { arena, expr });
    let params = vec![Param::new("n", ty(Primordial::Num)), by];
    let native = FunctionValue::native("scale", interpreter.root(), params, |_, call| {
        let n = call.arg(0).as_number().unwrap_or_default();
        let by = call.kwarg("by").and_then(|v| v.as_number()).unwrap_or_default();
        Ok(Value::Number(n * by))
    });
    let native = Value::function(native);

    let defaulted = call(&mut interpreter, &native, vec![Value::Number(5.0)], OrderedMap::new());
    assert_eq!(defaulted.unwrap().as_number(), Some(30.0));
    let given = call(&mut interpreter, &native, vec![Value::Number(5.0)], kwargs(&[("by", Value::Number(2.0))]));
    assert_eq!(given.unwrap().as_number(), Some(10.0));
    let err = call(&mut interpreter, &native, vec![Value::Number(5.0)], kwargs(&[("by", Value::string("x"))]))
        .unwrap_err();
    assert_eq!(err.name(), "TypeError");
    assert!(err.details().ends_with("for parameter 'by'"));
}

#[test]
fn numbers_multiply_when_called() {
    let mut interpreter = session();
    let result = call(
        &mut interpreter,
        &Value::Number(2.0),
        vec![Value::Number(3.0), Value::Number(4.0)],
        OrderedMap::new(),
    );
    assert_eq!(result.unwrap().as_number(), Some(24.0));
    let err = call(&mut interpreter, &Value::Number(2.0), vec![Value::Null], OrderedMap::new()).unwrap_err();
    assert_eq!(err.name(), "TypeError");
}

#[test]
fn non_callables_are_invalid_operations() {
    let mut interpreter = session();
    let err = call(&mut interpreter, &Value::Bool(true), Vec::new(), OrderedMap::new()).unwrap_err();
    assert_eq!(err.name(), "InvalidOperationError");
    assert_eq!(err.details(), "Cannot perform '()' on value of type 'Bool'");
}

#[test]
fn escaping_break_is_a_syntax_error() {
    let err = function_result(Err(Unwind::Break)).unwrap_err();
    assert_eq!(err.name(), "InvalidSyntaxError");
    assert_eq!(function_result(Err(Unwind::Return(Value::Number(1.0)))).unwrap().as_number(), Some(1.0));
}

#[test]
fn call_depth_returns_to_zero() {
    let mut interpreter = session();
    let f = ast_function(&interpreter, "f", Vec::new(), AstBuilder::nil);
    call(&mut interpreter, &f, Vec::new(), OrderedMap::new()).unwrap();
    assert_eq!(interpreter.call_stack().depth(), 0);
}
