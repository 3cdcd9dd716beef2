//! Calling a type value.
//!
//! Primordial types coerce their first argument (`Num('3')`, `Str(1)`).
//! User types build an instance:
//!
//! 1. reject abstract types
//! 2. create an empty object typed by the called type
//! 3. copy the methods of every ancestor onto it, root ancestor first, each
//!    bound to the instance so a child's methods replace its parent's
//! 4. run the initializer in a child of the class closure, with `super`
//!    bound to the parent's initializer chain
//! 5. validate the instance against every declared property of the chain
//! 6. register the instance with its type

use es_value::errors::{invalid_operation, type_error, type_mismatch, type_mismatch_at, user_error};
use es_value::{
    EsError, FunctionBody, FunctionValue, NativeResult, OrderedMap, Primordial, SetOptions,
    TypeDescriptor, TypeKind, UserType, Value, ValueInfo,
};

use super::{CallOptions, Interpreter};
use crate::cast::cast;
use crate::typing::includes;

/// Bound on `extends` chains walked during construction.
const MAX_ANCESTRY: usize = 256;

impl Interpreter {
    #[tracing::instrument(level = "debug", skip_all, fields(ty = %ty.name()))]
    pub(crate) fn construct(
        &mut self,
        type_value: &Value,
        ty: &TypeDescriptor,
        args: Vec<Value>,
        kwargs: OrderedMap<Value>,
    ) -> NativeResult {
        match &ty.kind {
            TypeKind::Primordial(kind) => coerce(*kind, args),
            TypeKind::User(user) => self.instantiate(type_value, ty, user, args, kwargs),
            TypeKind::Union(..) | TypeKind::Intersection(..) | TypeKind::Not(_) => {
                Err(invalid_operation("()", &ty.name()))
            }
        }
    }

    fn instantiate(
        &mut self,
        type_value: &Value,
        ty: &TypeDescriptor,
        user: &UserType,
        args: Vec<Value>,
        kwargs: OrderedMap<Value>,
    ) -> NativeResult {
        if user.is_abstract {
            return Err(type_error(format!(
                "Cannot construct abstract class '{}'",
                ty.name()
            )));
        }
        let instance = Value::instance(OrderedMap::new(), type_value.clone());
        let Value::Object(object) = &instance else {
            return Err(invalid_operation("()", &ty.name()));
        };

        let chain = ancestry(type_value);
        for ancestor in &chain {
            let Some(ancestor_user) = user_type(ancestor) else {
                continue;
            };
            for method in &ancestor_user.methods {
                if let Value::Function(f) = method {
                    object.set(f.name(), Value::function(f.bind(instance.clone())));
                }
            }
        }

        self.run_initialiser(type_value, &instance, args, kwargs)?;
        validate_instance(&chain, &instance, &ty.name())?;
        user.register_instance(object);
        tracing::debug!(ty = %ty.name(), keys = object.len(), "instantiated");
        Ok(instance)
    }

    /// Run the initializer chain of `type_value` against `this`.
    ///
    /// A type without its own `init` runs its parent's implicitly.
    pub(crate) fn run_initialiser(
        &mut self,
        type_value: &Value,
        this: &Value,
        args: Vec<Value>,
        kwargs: OrderedMap<Value>,
    ) -> Result<(), EsError> {
        let Some(user) = user_type(type_value) else {
            return Ok(());
        };
        let parent = user
            .extends
            .clone()
            .filter(|p| user_type(p).is_some());

        self.with_child_scope(user.closure, |scoped| {
            let ctx = scoped.ctx();
            if let Some(parent) = &parent {
                // May outlive the initializer scope when stored on the instance.
                let mut super_fn = FunctionValue::new(
                    ValueInfo::named("super"),
                    Vec::new(),
                    FunctionBody::Super {
                        parent: parent.clone(),
                    },
                    user.closure,
                    Value::primordial(Primordial::Any),
                );
                super_fn.allow_args = true;
                super_fn.allow_kwargs = true;
                scoped.contexts.set_own(
                    ctx,
                    "super",
                    Value::function(super_fn.bind(this.clone())),
                    SetOptions::constant(),
                )?;
            }
            match &user.init {
                Some(Value::Function(init)) => {
                    let mut bound = init.bind(this.clone());
                    bound.closure = ctx;
                    scoped.call_at(
                        &Value::function(bound),
                        args,
                        kwargs,
                        ctx,
                        CallOptions::default(),
                        None,
                    )?;
                }
                Some(other) => return Err(type_mismatch("Func", &other.type_name())),
                None => {
                    if let Some(parent) = &parent {
                        scoped.run_initialiser(parent, this, args, kwargs)?;
                    }
                }
            }
            Ok(())
        })
    }
}

fn user_type(value: &Value) -> Option<&UserType> {
    value.as_type().and_then(|ty| ty.as_user())
}

/// User types from the root ancestor down to `type_value`.
fn ancestry(type_value: &Value) -> Vec<Value> {
    let mut chain = Vec::new();
    let mut current = Some(type_value.clone());
    while let Some(ty) = current {
        let Some(next) = user_type(&ty).map(|user| user.extends.clone()) else {
            break;
        };
        chain.push(ty);
        if chain.len() >= MAX_ANCESTRY {
            break;
        }
        current = next;
    }
    chain.reverse();
    chain
}

/// Check the instance against the declared properties of the chain.
///
/// A child's declaration replaces its parent's. `init` is never checked.
fn validate_instance(chain: &[Value], instance: &Value, type_name: &str) -> Result<(), EsError> {
    let Value::Object(object) = instance else {
        return Ok(());
    };
    let mut declared: OrderedMap<Value> = OrderedMap::new();
    for ancestor in chain {
        if let Some(user) = user_type(ancestor) {
            for (key, ty) in user.properties.iter() {
                declared.insert(key, ty.clone());
            }
        }
    }
    for (key, ty) in declared.iter() {
        if key == "init" {
            continue;
        }
        let value = object.get(key).unwrap_or(Value::Null);
        if !includes(ty, &value) {
            return Err(type_mismatch_at(
                &ty.to_string(),
                &value.type_name(),
                &value.to_string(),
                &format!("for property '{key}' of '{type_name}'"),
            ));
        }
    }
    Ok(())
}

/// `T(x)` for a primordial `T`.
fn coerce(kind: Primordial, args: Vec<Value>) -> NativeResult {
    let Some(first) = args.first() else {
        return Ok(Value::Null);
    };
    match kind {
        Primordial::Any => Ok(first.clone()),
        Primordial::Null => Ok(Value::Null),
        Primordial::Type => Ok(first.type_of()),
        Primordial::Arr => Ok(Value::array(args)),
        Primordial::Err => Ok(Value::error(user_error("UserError", first.to_string()))),
        Primordial::Func | Primordial::Obj => {
            if first.kind() == kind {
                Ok(first.clone())
            } else {
                Err(type_mismatch(kind.name(), &first.type_name()))
            }
        }
        Primordial::Num | Primordial::Str | Primordial::Bool => {
            cast(first, &Value::primordial(kind))
        }
    }
}

#[cfg(test)]
mod tests;
