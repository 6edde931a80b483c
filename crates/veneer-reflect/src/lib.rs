//! Veneer Reflect - version-tolerant access to a live host's internals
//!
//! The host's internal types move between packages from one release to the
//! next, and members get renamed or reordered. This crate resolves them
//! against whatever build is running:
//!
//! - [`Reflector`] detects the host's naming scheme and version once and
//!   owns every per-process cache.
//! - [`SymbolLocator`] turns a namespace plus a relative name into a live
//!   type handle, at most once.
//! - [`FieldAccessor`], [`MethodInvoker`] and [`ConstructorInvoker`] bind a
//!   member by name or by position and give typed access to it.
//!
//! Every accessor has an absorbing form (`get`, `set`, `invoke`,
//! `new_instance`) that returns a default on failure, and a `try_` form
//! returning [`ReflectResult`].
//!
//! ```ignore
//! use veneer_reflect::{NamespaceConfig, ReflectConfig, Reflector};
//!
//! let config = ReflectConfig::default()
//!     .with_namespace("nms", NamespaceConfig::new("net.minecraft").with_legacy_infix("server"));
//! let reflector = Reflector::new(host, config);
//!
//! let player = reflector.locate("nms", "EntityPlayer");
//! let ping = player.field::<i32>(Some(builtins::INT), &["ping", "latency"]);
//! let latency = ping.get(Some(handle), 0);
//! ```

#![warn(missing_docs)]

mod bypass;

pub mod config;
pub mod constructor;
pub mod error;
pub mod field;
pub mod locator;
pub mod method;
pub mod probe;
pub mod reflector;
pub mod scheme;

pub use config::{ConfigError, LayoutConfig, NamespaceConfig, ProbeConfig, ReflectConfig, Versioning};
pub use constructor::ConstructorInvoker;
pub use error::{ReflectError, ReflectResult, SymbolKind};
pub use field::{FieldAccessor, FieldStorage};
pub use locator::{SymbolLocator, TypeList};
pub use method::MethodInvoker;
pub use probe::{root_is_versioned, FixedProbe, SchemeProbe, StandardProbe};
pub use reflector::Reflector;
pub use scheme::{qualify, NamingScheme};
