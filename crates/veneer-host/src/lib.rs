//! Veneer Host - an in-memory type universe
//!
//! `MemoryHost` is a small, self-contained object model that implements the
//! `veneer_sdk::HostRuntime` seam: a class registry with fields, methods and
//! constructors, an object heap, per-class static storage, and a privileged
//! slot-offset memory capability. Embedders use it to expose their own
//! object model to `veneer-reflect`; the reflection test suites use it as
//! their live type universe.
//!
//! ```ignore
//! use veneer_host::{builtins, MemoryHost};
//! use veneer_sdk::{Modifiers, Value};
//!
//! let mut builder = MemoryHost::builder().root_type_path("org.host.v1_8_R3.Server");
//! let counter = builder.class("org.host.v1_8_R3.Counter", None, |c| {
//!     c.field("count", builtins::INT, Modifiers::PRIVATE, Value::Int(0));
//! });
//! let host = builder.build();
//! ```

mod builder;
mod class;
mod host;
mod memory;
mod stats;

pub mod builtins;

pub use builder::{ClassBuilder, MemoryHostBuilder};
pub use class::{Call, NativeBody};
pub use host::MemoryHost;
pub use memory::{SlotMemory, HEADER_BYTES, SLOT_WIDTH};
pub use stats::StatsSnapshot;
