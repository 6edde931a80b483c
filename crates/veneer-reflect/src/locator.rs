//! Symbol locators: lazily resolved, cached type lookups
//!
//! A locator describes where a type lives (a namespace plus a relative
//! name, a global name, or an already-known handle). It resolves at most
//! once; the outcome, including "not found", is cached for its lifetime.
//! Clones share the cache.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use veneer_sdk::{Modifiers, TypeHandle};

use crate::constructor::ConstructorInvoker;
use crate::error::{ReflectError, ReflectResult, SymbolKind};
use crate::field::FieldAccessor;
use crate::method::MethodInvoker;
use crate::reflector::Reflector;
use crate::scheme::qualify;

#[derive(Debug, Clone)]
enum Source {
    Bound(Option<TypeHandle>),
    Named {
        namespace: Option<String>,
        name: String,
    },
}

#[derive(Clone)]
struct LocatorInner {
    reflector: Arc<Reflector>,
    source: Source,
    log_failures: bool,
    cached: OnceCell<Option<TypeHandle>>,
}

/// Describes where a type lives and resolves it on demand
#[derive(Clone)]
pub struct SymbolLocator {
    inner: Arc<LocatorInner>,
}

impl fmt::Debug for SymbolLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymbolLocator")
            .field("source", &self.inner.source)
            .field("log_failures", &self.inner.log_failures)
            .field("cached", &self.inner.cached.get())
            .finish()
    }
}

impl SymbolLocator {
    pub(crate) fn named(reflector: Arc<Reflector>, namespace: Option<String>, name: String) -> Self {
        Self::from_source(reflector, Source::Named { namespace, name })
    }

    pub(crate) fn bound(reflector: Arc<Reflector>, handle: Option<TypeHandle>) -> Self {
        Self::from_source(reflector, Source::Bound(handle))
    }

    fn from_source(reflector: Arc<Reflector>, source: Source) -> Self {
        Self {
            inner: Arc::new(LocatorInner {
                reflector,
                source,
                log_failures: true,
                cached: OnceCell::new(),
            }),
        }
    }

    /// Do not log when resolution fails.
    ///
    /// For call sites that probe for symbols which may legitimately be
    /// missing on some host versions.
    pub fn quiet(self) -> Self {
        let mut inner = Arc::try_unwrap(self.inner).unwrap_or_else(|shared| (*shared).clone());
        inner.log_failures = false;
        Self {
            inner: Arc::new(inner),
        }
    }

    /// The reflector this locator resolves against
    pub fn reflector(&self) -> &Arc<Reflector> {
        &self.inner.reflector
    }

    /// The caller-supplied name, if this locator is not bound to a handle
    pub fn descriptor(&self) -> Option<&str> {
        match &self.inner.source {
            Source::Named { name, .. } => Some(name.as_str()),
            Source::Bound(_) => None,
        }
    }

    /// Fully-qualified name this locator looks up, under its namespace's scheme.
    ///
    /// Global locators return their name as given.
    pub fn qualified_name(&self) -> ReflectResult<String> {
        let Source::Named { namespace, name } = &self.inner.source else {
            return Err(ReflectError::not_found(SymbolKind::Type, "<bound handle>"));
        };
        let Some(ns) = namespace else {
            return Ok(name.clone());
        };
        let reflector = &self.inner.reflector;
        let config = reflector.config();
        let scheme = reflector.namespace_scheme(ns)?;
        let namespace = config
            .namespace(ns)
            .ok_or_else(|| ReflectError::UnknownNamespace(ns.clone()))?;
        qualify(
            scheme,
            Some(namespace),
            reflector.host_version(),
            name,
            &config.layout.separator,
        )
        .ok_or_else(|| ReflectError::UnknownVersion(reflector.host().root_type_path()))
    }

    /// Resolve the type. Only the first call queries the host.
    pub fn resolve(&self) -> Option<TypeHandle> {
        *self.inner.cached.get_or_init(|| self.lookup())
    }

    /// Resolve, reporting why a miss happened
    pub fn try_resolve(&self) -> ReflectResult<TypeHandle> {
        self.resolve().ok_or_else(|| {
            let name = self
                .qualified_name()
                .unwrap_or_else(|_| self.descriptor().unwrap_or("<absent>").to_string());
            ReflectError::not_found(SymbolKind::Type, name)
        })
    }

    /// Whether the type resolved
    pub fn is_present(&self) -> bool {
        self.resolve().is_some()
    }

    /// Resolve every locator; `None` if any of them is missing
    pub fn resolve_all(locators: &[SymbolLocator]) -> Option<Vec<TypeHandle>> {
        locators.iter().map(SymbolLocator::resolve).collect()
    }

    fn lookup(&self) -> Option<TypeHandle> {
        match &self.inner.source {
            Source::Bound(handle) => *handle,
            Source::Named { .. } => {
                let result = self.qualified_name().and_then(|qualified| {
                    self.inner
                        .reflector
                        .host()
                        .find_type(&qualified)
                        .ok_or_else(|| ReflectError::not_found(SymbolKind::Type, qualified))
                });
                match result {
                    Ok(handle) => Some(handle),
                    Err(err) => {
                        if self.inner.log_failures {
                            tracing::warn!(%err, "failed to resolve type");
                        } else {
                            tracing::debug!(%err, "optional type not present");
                        }
                        None
                    }
                }
            }
        }
    }

    // ========================================================================
    // Member shortcuts
    // ========================================================================

    /// Field of this type, by candidate names
    pub fn field<T>(&self, expected: Option<TypeHandle>, names: &[&str]) -> FieldAccessor<T> {
        FieldAccessor::by_names(self, expected, names)
    }

    /// Field of this type, by position among fields with exactly `modifiers`
    pub fn field_by_ordinal<T>(
        &self,
        expected: Option<TypeHandle>,
        modifiers: Modifiers,
        ordinal: usize,
    ) -> FieldAccessor<T> {
        FieldAccessor::by_ordinal(self, expected, modifiers, ordinal)
    }

    /// Method of this type, by name and exact parameter types
    pub fn method<T>(&self, name: &str, return_type: Option<TypeHandle>, params: impl Into<TypeList>) -> MethodInvoker<T> {
        MethodInvoker::by_name(self, name, return_type, params)
    }

    /// Method of this type, by position among methods with the exact signature
    pub fn method_by_ordinal<T>(
        &self,
        ordinal: usize,
        return_type: Option<TypeHandle>,
        params: impl Into<TypeList>,
    ) -> MethodInvoker<T> {
        MethodInvoker::by_ordinal(self, ordinal, return_type, params)
    }

    /// Constructor of this type, by exact parameter types
    pub fn constructor<T>(&self, params: impl Into<TypeList>) -> ConstructorInvoker<T> {
        ConstructorInvoker::new(self, params)
    }
}

/// Parameter-type list, given as handles or as locators resolved on demand
#[derive(Debug, Clone)]
pub enum TypeList {
    /// Known handles
    Handles(Vec<TypeHandle>),
    /// Types still to be located
    Located(Vec<SymbolLocator>),
}

impl TypeList {
    /// No parameters
    pub fn empty() -> Self {
        TypeList::Handles(Vec::new())
    }

    /// Resolve to handles; `None` if any locator misses
    pub fn resolve(&self) -> Option<Vec<TypeHandle>> {
        match self {
            TypeList::Handles(handles) => Some(handles.clone()),
            TypeList::Located(locators) => SymbolLocator::resolve_all(locators),
        }
    }
}

impl From<Vec<TypeHandle>> for TypeList {
    fn from(handles: Vec<TypeHandle>) -> Self {
        TypeList::Handles(handles)
    }
}

impl From<&[TypeHandle]> for TypeList {
    fn from(handles: &[TypeHandle]) -> Self {
        TypeList::Handles(handles.to_vec())
    }
}

impl<const N: usize> From<[TypeHandle; N]> for TypeList {
    fn from(handles: [TypeHandle; N]) -> Self {
        TypeList::Handles(handles.to_vec())
    }
}

impl From<Vec<SymbolLocator>> for TypeList {
    fn from(locators: Vec<SymbolLocator>) -> Self {
        TypeList::Located(locators)
    }
}

impl From<&[SymbolLocator]> for TypeList {
    fn from(locators: &[SymbolLocator]) -> Self {
        TypeList::Located(locators.to_vec())
    }
}
