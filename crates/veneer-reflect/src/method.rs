//! Method resolution and typed invocation
//!
//! Unlike fields, methods are matched on their exact parameter types: an
//! overload is only selected when its signature equals the requested one.
//! By-name lookups accept any return type assignable to the expected one;
//! ordinal lookups require the return type to match exactly.

use std::marker::PhantomData;

use once_cell::sync::OnceCell;
use veneer_sdk::{FromValue, HostRuntime, MethodDecl, ObjectRef, TypeHandle, Value};

use crate::error::{ReflectError, ReflectResult, SymbolKind};
use crate::field::report;
use crate::locator::{SymbolLocator, TypeList};

/// Find `name` with exactly `params`, then check its return type is
/// assignable to `return_type` (any when `None`)
pub fn resolve_by_name(
    host: &dyn HostRuntime,
    owner: TypeHandle,
    name: &str,
    return_type: Option<TypeHandle>,
    params: &[TypeHandle],
) -> Option<MethodDecl> {
    let method = host.declared_method(owner, name, params)?;
    match (return_type, method.return_type) {
        (None, _) => Some(method),
        (Some(expected), Some(actual)) if host.is_assignable(expected, actual) => Some(method),
        _ => None,
    }
}

/// Scan declared methods in order, counting those whose return type equals
/// `return_type` (any when `None`) and whose parameter types equal `params`;
/// return the one whose 1-based count equals `ordinal`
pub fn resolve_by_ordinal(
    host: &dyn HostRuntime,
    owner: TypeHandle,
    ordinal: usize,
    return_type: Option<TypeHandle>,
    params: &[TypeHandle],
) -> Option<MethodDecl> {
    if ordinal == 0 {
        return None;
    }
    host.declared_methods(owner)
        .into_iter()
        .filter(|method| return_type.map_or(true, |rt| method.return_type == Some(rt)))
        .filter(|method| method.params == params)
        .nth(ordinal - 1)
}

#[derive(Debug, Clone)]
enum MethodRule {
    Name(String),
    Ordinal(usize),
}

/// Typed invoker for one method.
///
/// Once resolution has failed, every `invoke` returns the caller's default.
pub struct MethodInvoker<T> {
    owner: SymbolLocator,
    rule: MethodRule,
    return_type: Option<TypeHandle>,
    params: TypeList,
    resolved: OnceCell<Option<MethodDecl>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> std::fmt::Debug for MethodInvoker<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodInvoker")
            .field("owner", &self.owner)
            .field("rule", &self.rule)
            .field("resolved", &self.resolved.get())
            .finish()
    }
}

impl<T> MethodInvoker<T> {
    /// Select the method called `name` with exactly `params`
    pub fn by_name(
        owner: &SymbolLocator,
        name: &str,
        return_type: Option<TypeHandle>,
        params: impl Into<TypeList>,
    ) -> Self {
        Self::with_rule(owner, MethodRule::Name(name.to_string()), return_type, params.into())
    }

    /// Select the `ordinal`-th (1-based) method with exactly this signature
    pub fn by_ordinal(
        owner: &SymbolLocator,
        ordinal: usize,
        return_type: Option<TypeHandle>,
        params: impl Into<TypeList>,
    ) -> Self {
        Self::with_rule(owner, MethodRule::Ordinal(ordinal), return_type, params.into())
    }

    fn with_rule(owner: &SymbolLocator, rule: MethodRule, return_type: Option<TypeHandle>, params: TypeList) -> Self {
        Self {
            owner: owner.clone(),
            rule,
            return_type,
            params,
            resolved: OnceCell::new(),
            _marker: PhantomData,
        }
    }

    /// Resolve the method. Only the first call queries the host.
    pub fn resolve(&self) -> Option<&MethodDecl> {
        self.resolved.get_or_init(|| self.lookup()).as_ref()
    }

    /// Whether the method resolved
    pub fn is_valid(&self) -> bool {
        self.resolve().is_some()
    }

    fn describe(&self) -> String {
        match &self.rule {
            MethodRule::Name(name) => name.clone(),
            MethodRule::Ordinal(ordinal) => format!("#{}", ordinal),
        }
    }

    fn lookup(&self) -> Option<MethodDecl> {
        let owner = self.owner.resolve()?;
        let params = self.params.resolve()?;
        let host = self.owner.reflector().host();
        let method = match &self.rule {
            MethodRule::Name(name) => resolve_by_name(host, owner, name, self.return_type, &params),
            MethodRule::Ordinal(ordinal) => resolve_by_ordinal(host, owner, *ordinal, self.return_type, &params),
        };
        if method.is_none() {
            tracing::debug!(
                owner = %self.owner.reflector().type_label(owner),
                method = %self.describe(),
                arity = params.len(),
                "method not found"
            );
        }
        method
    }
}

impl<T: FromValue> MethodInvoker<T> {
    /// Invoke. `Ok(None)` means the method returned null or nothing.
    pub fn try_invoke(&self, instance: Option<ObjectRef>, args: &[Value]) -> ReflectResult<Option<T>> {
        let method = self
            .resolve()
            .ok_or_else(|| ReflectError::not_found(SymbolKind::Method, self.describe()))?;
        let value = self
            .owner
            .reflector()
            .host()
            .invoke_method(method, instance, args)?;
        if value.is_null() {
            return Ok(None);
        }
        let found = value.type_name();
        T::from_value(value).map(Some).ok_or_else(|| ReflectError::TypeMismatch {
            name: method.name.clone(),
            expected: std::any::type_name::<T>().to_string(),
            found: found.to_string(),
        })
    }

    /// Invoke, `None` on any failure or a null result
    pub fn invoke_opt(&self, instance: Option<ObjectRef>, args: &[Value]) -> Option<T> {
        match self.try_invoke(instance, args) {
            Ok(value) => value,
            Err(err) => {
                report(&err, "method invocation failed");
                None
            }
        }
    }

    /// Invoke, falling back to `default`
    pub fn invoke(&self, instance: Option<ObjectRef>, args: &[Value], default: T) -> T {
        self.invoke_opt(instance, args).unwrap_or(default)
    }
}
