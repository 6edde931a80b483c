//! Slot-offset memory capability
//!
//! Offsets mimic a real object layout: a fixed header followed by
//! fixed-width slots. `put_value` maps an offset back to its slot and writes
//! it without consulting modifiers.

use veneer_sdk::{FieldDecl, FieldOffset, HostError, HostResult, RawMemory, StorageBase, Value};

use crate::host::MemoryHost;
use crate::stats::LookupStats;

/// Bytes reserved before the first slot of any storage block
pub const HEADER_BYTES: u64 = 16;

/// Width of one slot
pub const SLOT_WIDTH: u64 = 8;

/// `RawMemory` over a `MemoryHost`'s heap and static storage
#[derive(Debug, Clone)]
pub struct SlotMemory {
    host: MemoryHost,
}

impl SlotMemory {
    pub(crate) fn new(host: MemoryHost) -> Self {
        Self { host }
    }

    fn offset_of(slot: usize) -> FieldOffset {
        FieldOffset(HEADER_BYTES + slot as u64 * SLOT_WIDTH)
    }

    fn slot_of(offset: FieldOffset) -> HostResult<usize> {
        let raw = offset.0;
        if raw < HEADER_BYTES || (raw - HEADER_BYTES) % SLOT_WIDTH != 0 {
            return Err(HostError::InvalidOffset(raw));
        }
        Ok(((raw - HEADER_BYTES) / SLOT_WIDTH) as usize)
    }
}

impl RawMemory for SlotMemory {
    fn instance_field_offset(&self, field: &FieldDecl) -> HostResult<FieldOffset> {
        if field.is_static() {
            return Err(HostError::NoSuchMember(format!(
                "{} is static; use static_field_offset",
                field.name
            )));
        }
        let slot = self.host.field_def(field)?.slot;
        LookupStats::bump(&self.host.inner.stats.offset_computations);
        Ok(Self::offset_of(slot))
    }

    fn static_field_base(&self, field: &FieldDecl) -> HostResult<StorageBase> {
        if !field.is_static() {
            return Err(HostError::NoSuchMember(format!("{} is not static", field.name)));
        }
        self.host.field_def(field)?;
        Ok(StorageBase::Static(field.owner))
    }

    fn static_field_offset(&self, field: &FieldDecl) -> HostResult<FieldOffset> {
        if !field.is_static() {
            return Err(HostError::NoSuchMember(format!("{} is not static", field.name)));
        }
        let slot = self.host.field_def(field)?.slot;
        LookupStats::bump(&self.host.inner.stats.offset_computations);
        Ok(Self::offset_of(slot))
    }

    unsafe fn put_value(&self, base: StorageBase, offset: FieldOffset, value: Value) -> HostResult<()> {
        let slot = Self::slot_of(offset)?;
        let result = match base {
            StorageBase::Instance(obj) => self.host.write_slot(obj, slot, value),
            StorageBase::Static(ty) => self.host.write_static_slot(ty, slot, value),
        };
        result.map_err(|err| match err {
            HostError::NoSuchMember(_) => HostError::InvalidOffset(offset.0),
            other => other,
        })
    }
}
