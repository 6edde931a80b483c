//! Constructor resolution and instantiation
//!
//! Constructors are selected by exact parameter types only.

use std::marker::PhantomData;

use once_cell::sync::OnceCell;
use veneer_sdk::{ConstructorDecl, FromValue, Value};

use crate::error::{ReflectError, ReflectResult, SymbolKind};
use crate::field::report;
use crate::locator::{SymbolLocator, TypeList};

/// Typed invoker for one constructor
pub struct ConstructorInvoker<T> {
    owner: SymbolLocator,
    params: TypeList,
    resolved: OnceCell<Option<ConstructorDecl>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> std::fmt::Debug for ConstructorInvoker<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConstructorInvoker")
            .field("owner", &self.owner)
            .field("params", &self.params)
            .field("resolved", &self.resolved.get())
            .finish()
    }
}

impl<T> ConstructorInvoker<T> {
    /// Select the constructor of `owner` taking exactly `params`
    pub fn new(owner: &SymbolLocator, params: impl Into<TypeList>) -> Self {
        Self {
            owner: owner.clone(),
            params: params.into(),
            resolved: OnceCell::new(),
            _marker: PhantomData,
        }
    }

    /// Resolve the constructor. Only the first call queries the host.
    pub fn resolve(&self) -> Option<&ConstructorDecl> {
        self.resolved
            .get_or_init(|| {
                let owner = self.owner.resolve()?;
                let params = self.params.resolve()?;
                let ctor = self.owner.reflector().host().declared_constructor(owner, &params);
                if ctor.is_none() {
                    tracing::debug!(
                        owner = %self.owner.reflector().type_label(owner),
                        arity = params.len(),
                        "constructor not found"
                    );
                }
                ctor
            })
            .as_ref()
    }

    /// Whether the constructor resolved
    pub fn is_valid(&self) -> bool {
        self.resolve().is_some()
    }
}

impl<T: FromValue> ConstructorInvoker<T> {
    /// Construct a new instance
    pub fn try_new_instance(&self, args: &[Value]) -> ReflectResult<T> {
        let ctor = self.resolve().ok_or_else(|| {
            let owner = self
                .owner
                .descriptor()
                .map(str::to_string)
                .or_else(|| self.owner.resolve().map(|ty| self.owner.reflector().type_label(ty)))
                .unwrap_or_else(|| "<absent>".to_string());
            ReflectError::not_found(SymbolKind::Constructor, owner)
        })?;
        let value = self.owner.reflector().host().invoke_constructor(ctor, args)?;
        let found = value.type_name();
        T::from_value(value).ok_or_else(|| ReflectError::TypeMismatch {
            name: "constructor".to_string(),
            expected: std::any::type_name::<T>().to_string(),
            found: found.to_string(),
        })
    }

    /// Construct a new instance, `None` on any failure
    pub fn new_instance(&self, args: &[Value]) -> Option<T> {
        self.try_new_instance(args)
            .map_err(|err| report(&err, "constructor invocation failed"))
            .ok()
    }
}
