//! Class definitions and the native call context

use std::sync::Arc;

use parking_lot::RwLock;
use veneer_sdk::{
    ConstructorDecl, FieldDecl, HostError, HostResult, MethodDecl, ObjectRef, TypeHandle, Value,
};

use crate::host::MemoryHost;

/// Body of a method or constructor
pub type NativeBody = Arc<dyn Fn(&Call<'_>) -> HostResult<Value> + Send + Sync>;

/// A declared field plus its storage slot
pub(crate) struct FieldDef {
    pub(crate) decl: FieldDecl,
    /// Index into the object's slots, or into the class statics for static fields
    pub(crate) slot: usize,
    pub(crate) default: Value,
}

pub(crate) struct MethodDef {
    pub(crate) decl: MethodDecl,
    pub(crate) body: NativeBody,
}

pub(crate) struct ConstructorDef {
    pub(crate) decl: ConstructorDecl,
    pub(crate) body: NativeBody,
}

/// A registered class
pub(crate) struct ClassDef {
    pub(crate) name: String,
    pub(crate) parent: Option<TypeHandle>,
    pub(crate) fields: Vec<FieldDef>,
    pub(crate) methods: Vec<MethodDef>,
    pub(crate) constructors: Vec<ConstructorDef>,
    /// Number of instance slots including inherited ones
    pub(crate) instance_slots: usize,
    pub(crate) statics: RwLock<Vec<Value>>,
}

impl ClassDef {
    pub(crate) fn empty(name: &str) -> Self {
        Self {
            name: name.to_string(),
            parent: None,
            fields: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
            instance_slots: 0,
            statics: RwLock::new(Vec::new()),
        }
    }

    pub(crate) fn field(&self, decl: &FieldDecl) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.decl.id == decl.id)
    }
}

/// Context handed to native method and constructor bodies.
///
/// Bodies run "inside" their class: `store` writes the receiver's fields
/// directly, readonly or not, the way a constructor initializes its own
/// assign-once state.
pub struct Call<'a> {
    pub(crate) host: &'a MemoryHost,
    pub(crate) owner: TypeHandle,
    pub(crate) receiver: Option<ObjectRef>,
    pub(crate) args: &'a [Value],
}

impl<'a> Call<'a> {
    /// The host the call runs in
    pub fn host(&self) -> &'a MemoryHost {
        self.host
    }

    /// The receiver (the new object, for constructors)
    pub fn receiver(&self) -> Option<ObjectRef> {
        self.receiver
    }

    /// All arguments
    pub fn args(&self) -> &'a [Value] {
        self.args
    }

    /// Argument at `index`, `Null` if out of range
    pub fn arg(&self, index: usize) -> Value {
        self.args.get(index).cloned().unwrap_or_default()
    }

    /// Read a field of the receiver by name
    pub fn field(&self, name: &str) -> HostResult<Value> {
        let receiver = self.require_receiver(name)?;
        self.host.read_instance_by_name(receiver, name)
    }

    /// Write a field of the receiver by name, ignoring `READONLY`
    pub fn store(&self, name: &str, value: Value) -> HostResult<()> {
        let receiver = self.require_receiver(name)?;
        self.host.write_instance_by_name(receiver, name, value)
    }

    /// Read a static field of the declaring class
    pub fn static_field(&self, name: &str) -> HostResult<Value> {
        self.host.read_static_by_name(self.owner, name)
    }

    /// Write a static field of the declaring class, ignoring `READONLY`
    pub fn store_static(&self, name: &str, value: Value) -> HostResult<()> {
        self.host.write_static_by_name(self.owner, name, value)
    }

    fn require_receiver(&self, name: &str) -> HostResult<ObjectRef> {
        self.receiver
            .ok_or_else(|| HostError::MissingReceiver(name.to_string()))
    }
}
