//! Offset-level writes to readonly storage
//!
//! This is the only module that crosses below the host's type system. An
//! `OffsetWriter` is prepared once per field accessor: it captures the
//! privileged memory handle and the field's raw offset (and, for static
//! fields, the static storage base). Every later write goes straight to
//! that location, ignoring `READONLY`.
//!
//! Instance writes are guarded by a normal read of the same field on the
//! target object first, so the host confirms the object really holds the
//! field before its storage is touched at a raw offset. Every write also
//! asks the host whether the field's declared type can hold the value.

use std::fmt;
use std::sync::Arc;

use veneer_sdk::{FieldDecl, FieldOffset, HostError, HostRuntime, ObjectRef, RawMemory, StorageBase, Value};

use crate::error::{ReflectError, ReflectResult};
use crate::reflector::Reflector;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OffsetTarget {
    /// Relative to whichever instance is written
    Instance(FieldOffset),
    /// Fixed location in the owner's static storage
    Static(StorageBase, FieldOffset),
}

/// Privileged writer for one readonly field
pub(crate) struct OffsetWriter {
    memory: Arc<dyn RawMemory>,
    field: FieldDecl,
    target: OffsetTarget,
}

impl fmt::Debug for OffsetWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OffsetWriter")
            .field("field", &self.field.name)
            .field("target", &self.target)
            .finish()
    }
}

impl OffsetWriter {
    /// Compute the field's storage location
    pub(crate) fn prepare(reflector: &Reflector, field: &FieldDecl) -> ReflectResult<Self> {
        let memory = reflector.raw_memory().ok_or_else(|| {
            ReflectError::UnsupportedPlatform(format!(
                "no privileged memory for readonly field '{}'",
                field.name
            ))
        })?;

        let target = if field.is_static() {
            OffsetTarget::Static(memory.static_field_base(field)?, memory.static_field_offset(field)?)
        } else {
            OffsetTarget::Instance(memory.instance_field_offset(field)?)
        };
        tracing::debug!(field = %field.name, ?target, "prepared readonly field for offset writes");

        Ok(Self {
            memory,
            field: field.clone(),
            target,
        })
    }

    /// Store `value` into the field's storage
    pub(crate) fn write(&self, host: &dyn HostRuntime, instance: Option<ObjectRef>, value: Value) -> ReflectResult<()> {
        if !host.can_hold(self.field.ty, &value) {
            return Err(ReflectError::TypeMismatch {
                name: self.field.name.clone(),
                expected: host.type_name(self.field.ty).unwrap_or_else(|| self.field.ty.to_string()),
                found: value.type_name().to_string(),
            });
        }

        let (base, offset) = match self.target {
            OffsetTarget::Static(base, offset) => (base, offset),
            OffsetTarget::Instance(offset) => {
                let obj = instance.ok_or_else(|| HostError::MissingReceiver(self.field.name.clone()))?;
                host.read_field(&self.field, Some(obj))?;
                (StorageBase::Instance(obj), offset)
            }
        };

        // SAFETY: `offset` came from `self.memory` for `self.field`. Static
        // bases came from the same capability; instance bases were checked
        // above to hold the field, and the host accepted the value's kind.
        unsafe { self.memory.put_value(base, offset, value) }.map_err(ReflectError::from)
    }
}
