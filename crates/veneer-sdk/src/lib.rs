//! Veneer SDK - the seam between the reflection engine and a host runtime
//!
//! This crate holds the minimal vocabulary needed to describe a live type
//! universe without depending on any particular runtime: opaque handles,
//! dynamic values, member declarations, and the `HostRuntime` trait a host
//! implements so that `veneer-reflect` can query and drive it.
//!
//! # Example
//!
//! ```ignore
//! use veneer_sdk::{HostRuntime, Value};
//!
//! fn describe(host: &dyn HostRuntime, name: &str) {
//!     if let Some(ty) = host.find_type(name) {
//!         for field in host.declared_fields(ty) {
//!             println!("{} {}", field.modifiers, field.name);
//!         }
//!     }
//! }
//! ```
//!
//! The privileged `RawMemory` capability is deliberately separate from
//! `HostRuntime`: hosts that cannot offer offset-level writes simply return
//! `HostError::Unsupported` from `HostRuntime::raw_memory`.

#![warn(missing_docs)]

pub mod context;
pub mod convert;
pub mod error;
pub mod memory;
pub mod modifiers;
pub mod types;
pub mod value;

pub use context::HostRuntime;
pub use convert::{FromValue, IntoValue};
pub use error::{HostError, HostResult};
pub use memory::{FieldOffset, RawMemory, StorageBase};
pub use modifiers::{Modifiers, ParseModifiersError};
pub use types::{
    ConstructorDecl, ConstructorId, FieldDecl, FieldId, MethodDecl, MethodId, ObjectRef,
    TypeHandle,
};
pub use value::Value;
