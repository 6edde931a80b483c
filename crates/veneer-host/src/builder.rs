//! Builders for `MemoryHost`

use std::sync::Arc;

use parking_lot::RwLock;
use veneer_sdk::{
    ConstructorDecl, ConstructorId, FieldDecl, FieldId, HostResult, MethodDecl, MethodId,
    Modifiers, TypeHandle, Value,
};

use crate::builtins;
use crate::class::{Call, ClassDef, ConstructorDef, FieldDef, MethodDef};
use crate::host::MemoryHost;

/// Builder for a `MemoryHost`.
///
/// Classes are registered in order; a parent must be registered before its
/// children so that inherited slots are known.
pub struct MemoryHostBuilder {
    root_type_path: String,
    privileged: bool,
    classes: Vec<ClassDef>,
    next_member_id: u32,
}

impl Default for MemoryHostBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHostBuilder {
    /// Create a builder with the builtin types registered
    pub fn new() -> Self {
        let classes = builtins::ALL
            .iter()
            .map(|(_, name)| ClassDef::empty(name))
            .collect();
        Self {
            root_type_path: String::new(),
            privileged: true,
            classes,
            next_member_id: 0,
        }
    }

    /// Set the fully-qualified name reported as the host's root type
    pub fn root_type_path(mut self, path: &str) -> Self {
        self.root_type_path = path.to_string();
        self
    }

    /// Enable or disable the privileged memory capability (enabled by default)
    pub fn privileged(mut self, enabled: bool) -> Self {
        self.privileged = enabled;
        self
    }

    /// Register a class and return its handle
    pub fn class(
        &mut self,
        name: &str,
        parent: Option<TypeHandle>,
        build: impl FnOnce(&mut ClassBuilder<'_>),
    ) -> TypeHandle {
        let handle = TypeHandle(self.classes.len() as u32);
        let parent = parent.filter(|p| (p.0 as usize) < self.classes.len());
        let instance_base = parent
            .map(|p| self.classes[p.0 as usize].instance_slots)
            .unwrap_or(0);

        let mut class = ClassDef::empty(name);
        class.parent = parent;

        let mut builder = ClassBuilder {
            handle,
            class: &mut class,
            next_member_id: &mut self.next_member_id,
            next_instance_slot: instance_base,
            static_defaults: Vec::new(),
        };
        build(&mut builder);

        let next_instance_slot = builder.next_instance_slot;
        let static_defaults = std::mem::take(&mut builder.static_defaults);
        class.instance_slots = next_instance_slot;
        class.statics = RwLock::new(static_defaults);

        tracing::trace!(class = name, ?handle, "registered class");
        self.classes.push(class);
        handle
    }

    /// Finish building
    pub fn build(self) -> MemoryHost {
        MemoryHost::from_parts(self.root_type_path, self.classes, self.privileged)
    }
}

/// Declares the members of one class, in declaration order
pub struct ClassBuilder<'a> {
    handle: TypeHandle,
    class: &'a mut ClassDef,
    next_member_id: &'a mut u32,
    next_instance_slot: usize,
    static_defaults: Vec<Value>,
}

impl<'a> ClassBuilder<'a> {
    /// Handle of the class being built (for self-referential member types)
    pub fn handle(&self) -> TypeHandle {
        self.handle
    }

    /// Declare a field with its initial value
    pub fn field(
        &mut self,
        name: &str,
        ty: TypeHandle,
        modifiers: Modifiers,
        default: Value,
    ) -> &mut Self {
        let slot = if modifiers.is_static() {
            self.static_defaults.push(default.clone());
            self.static_defaults.len() - 1
        } else {
            self.next_instance_slot += 1;
            self.next_instance_slot - 1
        };
        let decl = FieldDecl {
            id: FieldId(self.next_id()),
            owner: self.handle,
            name: name.to_string(),
            ty,
            modifiers,
        };
        self.class.fields.push(FieldDef {
            decl,
            slot,
            default,
        });
        self
    }

    /// Declare a method. `return_type` is `None` for methods returning nothing.
    pub fn method<F>(
        &mut self,
        name: &str,
        return_type: Option<TypeHandle>,
        params: &[TypeHandle],
        modifiers: Modifiers,
        body: F,
    ) -> &mut Self
    where
        F: Fn(&Call<'_>) -> HostResult<Value> + Send + Sync + 'static,
    {
        let decl = MethodDecl {
            id: MethodId(self.next_id()),
            owner: self.handle,
            name: name.to_string(),
            return_type,
            params: params.to_vec(),
            modifiers,
        };
        self.class.methods.push(MethodDef {
            decl,
            body: Arc::new(body),
        });
        self
    }

    /// Declare a constructor. The body runs with the freshly allocated
    /// object as receiver; its return value is ignored.
    pub fn constructor<F>(&mut self, params: &[TypeHandle], body: F) -> &mut Self
    where
        F: Fn(&Call<'_>) -> HostResult<Value> + Send + Sync + 'static,
    {
        let decl = ConstructorDecl {
            id: ConstructorId(self.next_id()),
            owner: self.handle,
            params: params.to_vec(),
        };
        self.class.constructors.push(ConstructorDef {
            decl,
            body: Arc::new(body),
        });
        self
    }

    fn next_id(&mut self) -> u32 {
        let id = *self.next_member_id;
        *self.next_member_id += 1;
        id
    }
}
