//! Field resolution and typed field access
//!
//! A field is selected either by an ordered list of candidate names (the
//! first existing, type-compatible name wins) or by its 1-based position
//! among declared fields with an exact modifier mask and a compatible type.
//!
//! Readonly fields reject `set` until `remove_immutability` has prepared an
//! offset writer for them; see [`crate::bypass`].
//!
//! Ordinal positions follow the host's declaration order. That order is a
//! property of the host build, not of the naming scheme, so an ordinal that
//! works on one build is not guaranteed to select the same field on another.

use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};

use once_cell::sync::OnceCell;
use veneer_sdk::{FieldDecl, FromValue, HostRuntime, IntoValue, Modifiers, ObjectRef, TypeHandle};

use crate::bypass::OffsetWriter;
use crate::error::{ReflectError, ReflectResult, SymbolKind};
use crate::locator::SymbolLocator;

/// Try each candidate name in order; the first field whose declared type is
/// assignable to `expected` (any type when `None`) wins.
pub fn resolve_by_names(
    host: &dyn HostRuntime,
    owner: TypeHandle,
    expected: Option<TypeHandle>,
    names: &[&str],
) -> Option<FieldDecl> {
    names.iter().find_map(|name| {
        let field = host.declared_field(owner, name)?;
        match expected {
            Some(expected) if !host.is_assignable(expected, field.ty) => {
                tracing::trace!(field = %name, "candidate field has incompatible type");
                None
            }
            _ => Some(field),
        }
    })
}

/// Scan declared fields in order, counting those whose modifiers equal
/// `modifiers` exactly and whose type is assignable to `expected`; return
/// the one whose 1-based count equals `ordinal`.
pub fn resolve_by_ordinal(
    host: &dyn HostRuntime,
    owner: TypeHandle,
    expected: Option<TypeHandle>,
    modifiers: Modifiers,
    ordinal: usize,
) -> Option<FieldDecl> {
    if ordinal == 0 {
        return None;
    }
    host.declared_fields(owner)
        .into_iter()
        .filter(|field| field.modifiers == modifiers)
        .filter(|field| expected.map_or(true, |expected| host.is_assignable(expected, field.ty)))
        .nth(ordinal - 1)
}

/// How a resolved field is written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldStorage {
    /// Assignable through the normal path
    Regular,
    /// Readonly instance field
    Immutable,
    /// Readonly static field
    StaticImmutable,
}

impl FieldStorage {
    fn of(field: &FieldDecl) -> Self {
        match (field.is_readonly(), field.is_static()) {
            (false, _) => FieldStorage::Regular,
            (true, false) => FieldStorage::Immutable,
            (true, true) => FieldStorage::StaticImmutable,
        }
    }
}

#[derive(Debug, Clone)]
enum FieldRule {
    Names(Vec<String>),
    Ordinal { modifiers: Modifiers, ordinal: usize },
}

/// Typed accessor for one field.
///
/// Resolves lazily on first use and caches the outcome. Once resolution
/// has failed, every `get` returns the caller's default and every `set` is
/// a no-op.
pub struct FieldAccessor<T> {
    owner: SymbolLocator,
    expected: Option<TypeHandle>,
    rule: FieldRule,
    resolved: OnceCell<Option<FieldDecl>>,
    /// `None` until `remove_immutability`; then the prepared writer, or
    /// `None` inside if preparation failed
    bypass: OnceCell<Option<OffsetWriter>>,
    warned: AtomicBool,
    _marker: PhantomData<fn() -> T>,
}

impl<T> std::fmt::Debug for FieldAccessor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldAccessor")
            .field("owner", &self.owner)
            .field("rule", &self.rule)
            .field("resolved", &self.resolved.get())
            .field("bypass", &self.bypass.get())
            .finish()
    }
}

impl<T> FieldAccessor<T> {
    /// Select the first candidate name that exists with a compatible type
    pub fn by_names(owner: &SymbolLocator, expected: Option<TypeHandle>, names: &[&str]) -> Self {
        Self::with_rule(
            owner,
            expected,
            FieldRule::Names(names.iter().map(|n| n.to_string()).collect()),
        )
    }

    /// Select the `ordinal`-th (1-based) field with exactly `modifiers`
    pub fn by_ordinal(owner: &SymbolLocator, expected: Option<TypeHandle>, modifiers: Modifiers, ordinal: usize) -> Self {
        Self::with_rule(owner, expected, FieldRule::Ordinal { modifiers, ordinal })
    }

    fn with_rule(owner: &SymbolLocator, expected: Option<TypeHandle>, rule: FieldRule) -> Self {
        Self {
            owner: owner.clone(),
            expected,
            rule,
            resolved: OnceCell::new(),
            bypass: OnceCell::new(),
            warned: AtomicBool::new(false),
            _marker: PhantomData,
        }
    }

    /// Resolve the field. Only the first call queries the host.
    pub fn resolve(&self) -> Option<&FieldDecl> {
        self.resolved.get_or_init(|| self.lookup()).as_ref()
    }

    /// Whether the field resolved
    pub fn is_valid(&self) -> bool {
        self.resolve().is_some()
    }

    /// How the resolved field is written
    pub fn storage(&self) -> Option<FieldStorage> {
        self.resolve().map(FieldStorage::of)
    }

    /// Whether an offset writer is ready for this readonly field
    pub fn is_immutability_removed(&self) -> bool {
        matches!(self.bypass.get(), Some(Some(_)))
    }

    /// Let `set` write this field even though it is readonly.
    ///
    /// The offset computation runs once; later calls are no-ops. Regular
    /// fields need no preparation. If the host offers no privileged memory,
    /// `set` stays a silent no-op for readonly fields.
    pub fn remove_immutability(&self) -> &Self {
        let Some(field) = self.resolve() else {
            return self;
        };
        if FieldStorage::of(field) == FieldStorage::Regular {
            return self;
        }
        self.bypass.get_or_init(|| {
            match OffsetWriter::prepare(self.owner.reflector(), field) {
                Ok(writer) => Some(writer),
                Err(err) => {
                    tracing::warn!(field = %field.name, %err, "cannot remove immutability");
                    None
                }
            }
        });
        self
    }

    /// Consuming form of [`remove_immutability`](Self::remove_immutability), for chaining at construction
    pub fn with_immutability_removed(self) -> Self {
        self.remove_immutability();
        self
    }

    fn require(&self) -> ReflectResult<&FieldDecl> {
        self.resolve()
            .ok_or_else(|| ReflectError::not_found(SymbolKind::Field, self.describe()))
    }

    fn describe(&self) -> String {
        match &self.rule {
            FieldRule::Names(names) => names.join("|"),
            FieldRule::Ordinal { modifiers, ordinal } => format!("#{} [{}]", ordinal, modifiers),
        }
    }

    fn lookup(&self) -> Option<FieldDecl> {
        let owner = self.owner.resolve()?;
        let host = self.owner.reflector().host();
        let field = match &self.rule {
            FieldRule::Names(names) => {
                let names: Vec<&str> = names.iter().map(String::as_str).collect();
                resolve_by_names(host, owner, self.expected, &names)
            }
            FieldRule::Ordinal { modifiers, ordinal } => {
                resolve_by_ordinal(host, owner, self.expected, *modifiers, *ordinal)
            }
        };
        if field.is_none() {
            tracing::debug!(
                owner = %self.owner.reflector().type_label(owner),
                field = %self.describe(),
                "field not found"
            );
        }
        field
    }
}

impl<T: FromValue> FieldAccessor<T> {
    /// Read the field. `Ok(None)` means the field holds null.
    pub fn try_get(&self, instance: Option<ObjectRef>) -> ReflectResult<Option<T>> {
        let field = self.require()?;
        let value = self.owner.reflector().host().read_field(field, instance)?;
        if value.is_null() {
            return Ok(None);
        }
        let found = value.type_name();
        T::from_value(value).map(Some).ok_or_else(|| ReflectError::TypeMismatch {
            name: field.name.clone(),
            expected: std::any::type_name::<T>().to_string(),
            found: found.to_string(),
        })
    }

    /// Read the field, `None` if unresolved, null, incompatible or failing
    pub fn get_opt(&self, instance: Option<ObjectRef>) -> Option<T> {
        match self.try_get(instance) {
            Ok(value) => value,
            Err(err) => {
                report(&err, "field read failed");
                None
            }
        }
    }

    /// Read the field, falling back to `default`
    pub fn get(&self, instance: Option<ObjectRef>, default: T) -> T {
        self.get_opt(instance).unwrap_or(default)
    }
}

impl<T: IntoValue> FieldAccessor<T> {
    /// Write the field
    pub fn try_set(&self, instance: Option<ObjectRef>, value: T) -> ReflectResult<()> {
        let field = self.require()?;
        let host = self.owner.reflector().host();
        match FieldStorage::of(field) {
            FieldStorage::Regular => Ok(host.write_field(field, instance, value.into_value())?),
            FieldStorage::Immutable | FieldStorage::StaticImmutable => match self.bypass.get() {
                Some(Some(writer)) => writer.write(host, instance, value.into_value()),
                Some(None) => Err(ReflectError::UnsupportedPlatform(format!(
                    "readonly field '{}' cannot be written on this host",
                    field.name
                ))),
                None => Err(ReflectError::ImmutabilityViolation {
                    field: field.name.clone(),
                }),
            },
        }
    }

    /// Write the field; failures are absorbed
    pub fn set(&self, instance: Option<ObjectRef>, value: T) {
        match self.try_set(instance, value) {
            Ok(()) => {}
            Err(ReflectError::ImmutabilityViolation { field }) => {
                if !self.warned.swap(true, Ordering::Relaxed) {
                    tracing::warn!(%field, "set on readonly field before remove_immutability; ignored");
                }
            }
            Err(err) => report(&err, "field write failed"),
        }
    }
}

/// Absences are expected when probing; only faults are worth a warning.
pub(crate) fn report(err: &ReflectError, what: &str) {
    if err.is_absence() || matches!(err, ReflectError::UnsupportedPlatform(_)) {
        tracing::debug!(%err, "{}", what);
    } else {
        tracing::warn!(%err, "{}", what);
    }
}
