//! HostRuntime trait - abstract type-universe operations
//!
//! Defines the interface a host runtime implements. The reflection engine
//! programs against this trait only; it never sees host internals.
//!
//! # Declaration order
//!
//! `declared_fields`, `declared_methods` and `declared_constructors` must
//! report members in the order the host declares them. Ordinal resolution
//! counts positions in that order, so a host whose order is not stable
//! across builds makes ordinal lookups unstable too.

use std::sync::Arc;

use crate::error::HostResult;
use crate::memory::RawMemory;
use crate::types::{ConstructorDecl, FieldDecl, MethodDecl, ObjectRef, TypeHandle};
use crate::value::Value;

/// Abstract host runtime.
///
/// All queries are read-only against the type universe; the only mutating
/// operations are field writes and member invocations, which act on
/// objects, never on types.
pub trait HostRuntime: Send + Sync {
    // ========================================================================
    // Type Lookup
    // ========================================================================

    /// Find a type by its fully-qualified name
    fn find_type(&self, qualified_name: &str) -> Option<TypeHandle>;

    /// Fully-qualified name of a type
    fn type_name(&self, ty: TypeHandle) -> Option<String>;

    /// Fully-qualified name of the host's own root type.
    ///
    /// Its package path carries the host version token on hosts that
    /// version their internals.
    fn root_type_path(&self) -> String;

    /// Whether a value of type `source` can be stored where `target` is expected
    fn is_assignable(&self, target: TypeHandle, source: TypeHandle) -> bool;

    /// Whether `value` can be stored in a field declared with type `ty`
    fn can_hold(&self, ty: TypeHandle, value: &Value) -> bool;

    // ========================================================================
    // Member Declarations
    // ========================================================================

    /// Fields declared directly on `ty`, in declaration order
    fn declared_fields(&self, ty: TypeHandle) -> Vec<FieldDecl>;

    /// Field declared directly on `ty` with the given name
    fn declared_field(&self, ty: TypeHandle, name: &str) -> Option<FieldDecl> {
        self.declared_fields(ty)
            .into_iter()
            .find(|field| field.name == name)
    }

    /// Methods declared directly on `ty`, in declaration order
    fn declared_methods(&self, ty: TypeHandle) -> Vec<MethodDecl>;

    /// Method declared on `ty` with the given name and exact parameter types
    fn declared_method(
        &self,
        ty: TypeHandle,
        name: &str,
        params: &[TypeHandle],
    ) -> Option<MethodDecl> {
        self.declared_methods(ty)
            .into_iter()
            .find(|method| method.name == name && method.params == params)
    }

    /// Constructors declared on `ty`, in declaration order
    fn declared_constructors(&self, ty: TypeHandle) -> Vec<ConstructorDecl>;

    /// Constructor declared on `ty` with exact parameter types
    fn declared_constructor(&self, ty: TypeHandle, params: &[TypeHandle]) -> Option<ConstructorDecl> {
        self.declared_constructors(ty)
            .into_iter()
            .find(|ctor| ctor.params == params)
    }

    // ========================================================================
    // Field Access
    // ========================================================================

    /// Read a field. `instance` is ignored for static fields.
    fn read_field(&self, field: &FieldDecl, instance: Option<ObjectRef>) -> HostResult<Value>;

    /// Assign a field through the normal path.
    ///
    /// Must fail with `HostError::ImmutableField` for readonly fields and
    /// with `HostError::IncompatibleValue` when `can_hold` rejects `value`.
    fn write_field(
        &self,
        field: &FieldDecl,
        instance: Option<ObjectRef>,
        value: Value,
    ) -> HostResult<()>;

    // ========================================================================
    // Invocation
    // ========================================================================

    /// Call a method. `receiver` is ignored for static methods.
    fn invoke_method(
        &self,
        method: &MethodDecl,
        receiver: Option<ObjectRef>,
        args: &[Value],
    ) -> HostResult<Value>;

    /// Construct a new instance, returning the object value
    fn invoke_constructor(&self, ctor: &ConstructorDecl, args: &[Value]) -> HostResult<Value>;

    // ========================================================================
    // Privileged Access
    // ========================================================================

    /// Acquire the low-level memory capability, if the host exposes one
    fn raw_memory(&self) -> HostResult<Arc<dyn RawMemory>>;
}
