//! Lookup instrumentation
//!
//! Counts the symbol-table work a `MemoryHost` performs so that callers can
//! verify caching behavior of the layers above it.

use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub(crate) struct LookupStats {
    pub(crate) type_lookups: AtomicUsize,
    pub(crate) field_lookups: AtomicUsize,
    pub(crate) method_lookups: AtomicUsize,
    pub(crate) constructor_lookups: AtomicUsize,
    pub(crate) offset_computations: AtomicUsize,
    pub(crate) memory_acquisitions: AtomicUsize,
}

impl LookupStats {
    pub(crate) fn bump(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            type_lookups: self.type_lookups.load(Ordering::Relaxed),
            field_lookups: self.field_lookups.load(Ordering::Relaxed),
            method_lookups: self.method_lookups.load(Ordering::Relaxed),
            constructor_lookups: self.constructor_lookups.load(Ordering::Relaxed),
            offset_computations: self.offset_computations.load(Ordering::Relaxed),
            memory_acquisitions: self.memory_acquisitions.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of a host's lookup counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// `find_type` calls
    pub type_lookups: usize,
    /// `declared_fields` / `declared_field` calls
    pub field_lookups: usize,
    /// `declared_methods` / `declared_method` calls
    pub method_lookups: usize,
    /// `declared_constructors` / `declared_constructor` calls
    pub constructor_lookups: usize,
    /// Instance and static field offset computations
    pub offset_computations: usize,
    /// Successful `raw_memory` acquisitions
    pub memory_acquisitions: usize,
}
