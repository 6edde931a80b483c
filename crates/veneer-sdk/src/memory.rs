//! Privileged memory capability
//!
//! `RawMemory` is the one interface that lets a caller write storage the
//! type system declares assign-once. Offsets are opaque: they are only
//! meaningful to the capability that produced them, for the base they were
//! produced for.

use std::fmt;

use crate::error::HostResult;
use crate::types::{FieldDecl, ObjectRef, TypeHandle};
use crate::value::Value;

/// Raw offset of a field's storage within its base
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldOffset(pub u64);

impl fmt::Display for FieldOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "+{:#x}", self.0)
    }
}

/// The storage block an offset is relative to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageBase {
    /// An object's instance storage
    Instance(ObjectRef),
    /// A type's shared static storage
    Static(TypeHandle),
}

/// Offset-level access to field storage, below the type system.
///
/// Implementations are expected to be cheap to share (`Arc`) and to stay
/// valid for the lifetime of the host.
pub trait RawMemory: Send + Sync {
    /// Offset of an instance field within any instance of its owner
    fn instance_field_offset(&self, field: &FieldDecl) -> HostResult<FieldOffset>;

    /// Base of the static storage holding a static field
    fn static_field_base(&self, field: &FieldDecl) -> HostResult<StorageBase>;

    /// Offset of a static field within its static base
    fn static_field_offset(&self, field: &FieldDecl) -> HostResult<FieldOffset>;

    /// Store `value` at `offset` within `base`, bypassing modifiers.
    ///
    /// # Safety
    ///
    /// `offset` must have been produced by this capability for a field whose
    /// storage lives in `base`, and `value` must be of a kind the field can
    /// hold (see `HostRuntime::can_hold`). Neither is checked by every host;
    /// violating either corrupts the target object.
    unsafe fn put_value(&self, base: StorageBase, offset: FieldOffset, value: Value) -> HostResult<()>;
}
