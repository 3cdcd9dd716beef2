//! Type membership and subtyping.
//!
//! Anything can stand where a type is expected:
//! - a `Type` value (primordial, class, or a union/intersection/negation combinator)
//! - a literal (`1`, `'a'`, `true`, `nil`), which acts as a singleton type
//! - an object or array literal, matched structurally
//! - a function, matched by call shape
//!
//! [`is_subtype_of`] is sound with respect to [`includes`]: whenever
//! `is_subtype_of(a, b)` holds, every value included in `a` is included in
//! `b`. It may answer `false` for some true relations between combinators.
//! Negation is handled explicitly: `~x <: b` holds when `x` and the branches
//! of `b` together cover every value, and `a <: ~y` holds when `a` and `y`
//! cannot overlap.

use es_value::{FunctionValue, Heap, Param, Primordial, TypeDescriptor, TypeKind, Value};

use crate::operators::values_equal;

/// Recursion bound for self-referential structural types.
const MAX_DEPTH: usize = 64;

/// Whether `value` is a member of the type `ty`.
pub fn includes(ty: &Value, value: &Value) -> bool {
    includes_at(ty, value, 0)
}

/// Whether every member of `a` is a member of `b`.
pub fn is_subtype_of(a: &Value, b: &Value) -> bool {
    sub(a, b, 0)
}

/// Whether `a` and `b` may share a member. Over-approximates.
pub fn overlaps(a: &Value, b: &Value) -> bool {
    overlap(a, b, 0)
}

/// Type identity: the same type id and generic arguments, or combinators
/// whose operands are equal.
pub fn same_type(a: &TypeDescriptor, b: &TypeDescriptor) -> bool {
    match (&a.kind, &b.kind) {
        (TypeKind::Union(l1, r1), TypeKind::Union(l2, r2))
        | (TypeKind::Intersection(l1, r1), TypeKind::Intersection(l2, r2)) => {
            values_equal(l1, l2) && values_equal(r1, r2)
        }
        (TypeKind::Not(x), TypeKind::Not(y)) => values_equal(x, y),
        _ => {
            a.id == b.id
                && a.generics.len() == b.generics.len()
                && a.generics
                    .iter()
                    .zip(b.generics.iter())
                    .all(|(x, y)| values_equal(x, y))
        }
    }
}

fn combinator(value: &Value) -> Option<&TypeKind> {
    match value {
        Value::Type(ty) if ty.is_combinator() => Some(&ty.kind),
        _ => None,
    }
}

fn is_any(value: &Value) -> bool {
    matches!(value, Value::Type(ty) if ty.is_any())
}

fn is_literal(value: &Value) -> bool {
    matches!(
        value,
        Value::Number(_) | Value::String(_) | Value::Bool(_) | Value::Null
    )
}

fn is_primordial(value: &Value, kind: Primordial) -> bool {
    matches!(value, Value::Type(ty) if ty.as_primordial() == Some(kind))
}

fn any_type() -> Value {
    Value::primordial(Primordial::Any)
}

// Membership

fn includes_at(ty: &Value, value: &Value, depth: usize) -> bool {
    if depth > MAX_DEPTH {
        return false;
    }
    let depth = depth + 1;
    match ty {
        Value::Type(descriptor) => match &descriptor.kind {
            TypeKind::Primordial(Primordial::Any) => true,
            TypeKind::Primordial(kind) => {
                value.kind() == *kind && elements_match(descriptor, value, depth)
            }
            TypeKind::User(_) => match value {
                Value::Object(obj) => obj
                    .type_value()
                    .is_some_and(|instance_ty| sub(&instance_ty, ty, depth)),
                _ => false,
            },
            TypeKind::Union(l, r) => includes_at(l, value, depth) || includes_at(r, value, depth),
            TypeKind::Intersection(l, r) => {
                includes_at(l, value, depth) && includes_at(r, value, depth)
            }
            TypeKind::Not(inner) => !includes_at(inner, value, depth),
        },
        Value::Null => value.is_null(),
        Value::Number(_) | Value::String(_) | Value::Bool(_) => values_equal(ty, value),
        Value::Object(shape) => match value {
            Value::Object(obj) => shape.entries().iter().all(|(key, key_ty)| {
                includes_at(key_ty, &obj.get(key).unwrap_or(Value::Null), depth)
            }),
            _ => false,
        },
        Value::Array(shape) => match value {
            Value::Array(items) => {
                let (shape, items) = (shape.borrow(), items.borrow());
                shape.len() == items.len()
                    && shape
                        .iter()
                        .zip(items.iter())
                        .all(|(item_ty, item)| includes_at(item_ty, item, depth))
            }
            _ => false,
        },
        Value::Function(shape) => match value {
            Value::Function(candidate) => function_sub(candidate, shape, depth),
            _ => false,
        },
        Value::Error(_) | Value::Native(_) => values_equal(ty, value),
    }
}

/// `Arr<|T|>` requires every element to be a `T`.
fn elements_match(descriptor: &TypeDescriptor, value: &Value, depth: usize) -> bool {
    match (descriptor.generics.first(), value) {
        (Some(item_ty), Value::Array(items)) => items
            .borrow()
            .iter()
            .all(|item| includes_at(item_ty, item, depth)),
        _ => true,
    }
}

// Subtyping

fn sub(a: &Value, b: &Value, depth: usize) -> bool {
    if depth > MAX_DEPTH {
        return false;
    }
    let depth = depth + 1;

    if is_any(b) || values_equal(a, b) {
        return true;
    }
    if let Some(TypeKind::Intersection(x, y)) = combinator(b) {
        return sub(a, x, depth) && sub(a, y, depth);
    }
    match combinator(a) {
        Some(TypeKind::Union(x, y)) => return sub(x, b, depth) && sub(y, b, depth),
        Some(TypeKind::Not(x)) => return negated_sub(x, b, depth),
        Some(TypeKind::Intersection(x, y)) => return sub(x, b, depth) || sub(y, b, depth),
        _ => {}
    }
    match combinator(b) {
        Some(TypeKind::Union(x, y)) => {
            sub(a, x, depth) || sub(a, y, depth) || covers_universe(&union_parts(b), depth)
        }
        Some(TypeKind::Not(y)) => !overlap(a, y, depth),
        _ => base_sub(a, b, depth),
    }
}

/// `~x <: b`, for `b` neither an intersection nor `Any`.
fn negated_sub(x: &Value, b: &Value, depth: usize) -> bool {
    if let Some(TypeKind::Not(y)) = combinator(b) {
        return sub(y, x, depth);
    }
    // The complement of `x` fits in `b` exactly when `x` and `b` cover everything.
    let mut parts = union_parts(x);
    parts.extend(union_parts(b));
    covers_universe(&parts, depth)
}

/// Branches of a (possibly nested) union.
fn union_parts(value: &Value) -> Vec<&Value> {
    match combinator(value) {
        Some(TypeKind::Union(l, r)) => {
            let mut parts = union_parts(l);
            parts.extend(union_parts(r));
            parts
        }
        _ => vec![value],
    }
}

/// Whether the union of `parts` includes every value.
fn covers_universe(parts: &[&Value], depth: usize) -> bool {
    if parts.iter().any(|part| is_any(part)) {
        return true;
    }
    parts.iter().enumerate().any(|(i, part)| match combinator(part) {
        Some(TypeKind::Not(y)) => {
            let others: Vec<&Value> = parts
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(_, p)| *p)
                .collect();
            sub_union(y, &others, depth)
        }
        _ => false,
    })
}

/// `a <: (parts[0] | parts[1] | ...)`, checked branch by branch.
fn sub_union(a: &Value, parts: &[&Value], depth: usize) -> bool {
    if depth > MAX_DEPTH {
        return false;
    }
    match combinator(a) {
        Some(TypeKind::Union(x, y)) => {
            sub_union(x, parts, depth + 1) && sub_union(y, parts, depth + 1)
        }
        _ => parts.iter().any(|part| sub(a, part, depth)),
    }
}

/// Subtyping once neither side is a combinator and `b` is not `Any`.
fn base_sub(a: &Value, b: &Value, depth: usize) -> bool {
    if is_literal(a) {
        return includes_at(b, a, depth);
    }
    match (a, b) {
        (Value::Type(x), Value::Null) => x.as_primordial() == Some(Primordial::Null),
        (_, Value::Number(_) | Value::String(_) | Value::Bool(_) | Value::Null) => false,
        (Value::Type(x), Value::Type(y)) => nominal_sub(x, y, depth),
        (Value::Object(_), Value::Type(_)) => is_primordial(b, Primordial::Obj),
        (Value::Object(sa), Value::Object(sb)) => sb.entries().iter().all(|(key, key_ty)| {
            let own = sa.get(key).unwrap_or_else(any_type);
            sub(&own, key_ty, depth)
        }),
        (Value::Array(items), Value::Type(y)) => {
            y.as_primordial() == Some(Primordial::Arr)
                && y.generics.first().map_or(true, |item_ty| {
                    items.borrow().iter().all(|item| sub(item, item_ty, depth))
                })
        }
        (Value::Array(sa), Value::Array(sb)) => {
            let (sa, sb) = (sa.borrow(), sb.borrow());
            sa.len() == sb.len()
                && sa
                    .iter()
                    .zip(sb.iter())
                    .all(|(x, y)| sub(x, y, depth))
        }
        (Value::Function(_), Value::Type(_)) => is_primordial(b, Primordial::Func),
        (Value::Function(fa), Value::Function(fb)) => function_sub(fa, fb, depth),
        _ => values_equal(a, b),
    }
}

/// Nominal subtyping between plain (non-combinator) types.
fn nominal_sub(a: &Heap<TypeDescriptor>, b: &Heap<TypeDescriptor>, depth: usize) -> bool {
    if a.is_any() {
        return b.is_any();
    }
    match (&a.kind, &b.kind) {
        (TypeKind::Primordial(p), TypeKind::Primordial(q)) => {
            p == q && generics_sub(a, b, depth)
        }
        // A class's implicit root is `Obj`.
        (TypeKind::User(_), TypeKind::Primordial(q)) => *q == Primordial::Obj,
        (TypeKind::User(_), TypeKind::User(_)) => {
            let mut current = a.clone();
            for _ in 0..MAX_DEPTH {
                if current.id == b.id {
                    return generics_sub(&current, b, depth);
                }
                match current.as_user().and_then(|user| user.extends.clone()) {
                    Some(Value::Type(parent)) => current = parent,
                    _ => return false,
                }
            }
            false
        }
        _ => false,
    }
}

/// Generic arguments of `a` against those of `b`; missing ones count as `Any`.
fn generics_sub(a: &TypeDescriptor, b: &TypeDescriptor, depth: usize) -> bool {
    b.generics.iter().enumerate().all(|(i, b_arg)| {
        let a_arg = a.generics.get(i).cloned().unwrap_or_else(any_type);
        sub(&a_arg, b_arg, depth)
    })
}

fn positional(function: &FunctionValue) -> Vec<&Param> {
    function.params.iter().filter(|p| !p.is_kwarg).collect()
}

/// Whether `candidate` can stand in for `reference`.
///
/// Parameter types are compared directly (candidate parameter <: reference
/// parameter), not contravariantly. Return types compare declared types;
/// the candidate is never called.
fn function_sub(candidate: &FunctionValue, reference: &FunctionValue, depth: usize) -> bool {
    if (candidate.allow_kwargs && !reference.allow_kwargs)
        || (candidate.allow_args && !reference.allow_args)
    {
        return false;
    }
    let (cand_pos, ref_pos) = (positional(candidate), positional(reference));
    if !reference.allow_args && cand_pos.len() != ref_pos.len() {
        return false;
    }
    let params_match = cand_pos
        .iter()
        .zip(ref_pos.iter())
        .all(|(c, r)| sub(&c.ty, &r.ty, depth));
    let kwargs_match = reference.params.iter().filter(|p| p.is_kwarg).all(|r| {
        candidate
            .params
            .iter()
            .find(|c| c.is_kwarg && c.name == r.name)
            .is_some_and(|c| sub(&c.ty, &r.ty, depth))
    });
    params_match && kwargs_match && sub(&candidate.returns, &reference.returns, depth)
}

// Overlap

fn overlap(a: &Value, b: &Value, depth: usize) -> bool {
    if depth > MAX_DEPTH {
        return true;
    }
    let depth = depth + 1;
    if is_any(a) || is_any(b) {
        return true;
    }
    if let Some(kind) = combinator(a) {
        return combinator_overlap(kind, b, depth);
    }
    if let Some(kind) = combinator(b) {
        return combinator_overlap(kind, a, depth);
    }
    if is_literal(a) {
        return includes_at(b, a, depth);
    }
    if is_literal(b) {
        return includes_at(a, b, depth);
    }
    match (a, b) {
        (Value::Type(x), Value::Type(y)) if x.as_user().is_some() && y.as_user().is_some() => {
            nominal_sub(x, y, depth) || nominal_sub(y, x, depth)
        }
        _ => bucket(a) == bucket(b),
    }
}

fn combinator_overlap(kind: &TypeKind, other: &Value, depth: usize) -> bool {
    match kind {
        TypeKind::Union(x, y) => overlap(x, other, depth) || overlap(y, other, depth),
        TypeKind::Intersection(x, y) => overlap(x, other, depth) && overlap(y, other, depth),
        TypeKind::Not(x) => !sub(other, x, depth),
        TypeKind::Primordial(_) | TypeKind::User(_) => true,
    }
}

/// Coarse category of the values a non-literal type can hold.
fn bucket(value: &Value) -> Primordial {
    match value {
        Value::Type(ty) => match &ty.kind {
            TypeKind::Primordial(p) => *p,
            _ => Primordial::Obj,
        },
        other => other.kind(),
    }
}
