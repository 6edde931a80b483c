//! The in-memory host runtime

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use veneer_sdk::{
    ConstructorDecl, FieldDecl, HostError, HostResult, HostRuntime, MethodDecl, ObjectRef,
    RawMemory, TypeHandle, Value,
};

use crate::builder::MemoryHostBuilder;
use crate::builtins;
use crate::class::{Call, ClassDef, FieldDef};
use crate::memory::SlotMemory;
use crate::stats::{LookupStats, StatsSnapshot};

/// Object instance (heap-allocated)
#[derive(Debug, Clone)]
pub(crate) struct HeapObject {
    pub(crate) class: TypeHandle,
    pub(crate) slots: Vec<Value>,
}

pub(crate) struct HostInner {
    pub(crate) root_type_path: String,
    pub(crate) classes: Vec<ClassDef>,
    pub(crate) name_to_id: FxHashMap<String, TypeHandle>,
    pub(crate) heap: RwLock<FxHashMap<u64, HeapObject>>,
    pub(crate) next_object_id: AtomicU64,
    pub(crate) privileged: bool,
    pub(crate) stats: LookupStats,
}

/// In-memory type universe.
///
/// Cloning is cheap and clones share the same registry, heap and counters.
#[derive(Clone)]
pub struct MemoryHost {
    pub(crate) inner: Arc<HostInner>,
}

impl fmt::Debug for MemoryHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryHost")
            .field("root_type_path", &self.inner.root_type_path)
            .field("classes", &self.inner.classes.len())
            .field("objects", &self.inner.heap.read().len())
            .field("privileged", &self.inner.privileged)
            .finish()
    }
}

impl MemoryHost {
    /// Start building a host
    pub fn builder() -> MemoryHostBuilder {
        MemoryHostBuilder::new()
    }

    pub(crate) fn from_parts(root_type_path: String, classes: Vec<ClassDef>, privileged: bool) -> Self {
        let name_to_id = classes
            .iter()
            .enumerate()
            .map(|(i, class)| (class.name.clone(), TypeHandle(i as u32)))
            .collect();
        Self {
            inner: Arc::new(HostInner {
                root_type_path,
                classes,
                name_to_id,
                heap: RwLock::new(FxHashMap::default()),
                next_object_id: AtomicU64::new(1),
                privileged,
                stats: LookupStats::default(),
            }),
        }
    }

    /// Current lookup counters
    pub fn stats(&self) -> StatsSnapshot {
        self.inner.stats.snapshot()
    }

    /// Allocate an instance with every slot at its declared default,
    /// without running a constructor
    pub fn instantiate(&self, ty: TypeHandle) -> HostResult<ObjectRef> {
        let class = self.class(ty)?;
        let mut slots = vec![Value::Null; class.instance_slots];
        let mut current = Some(ty);
        while let Some(handle) = current {
            let def = self.class(handle)?;
            for field in def.fields.iter().filter(|f| !f.decl.is_static()) {
                slots[field.slot] = field.default.clone();
            }
            current = def.parent;
        }

        let id = self.inner.next_object_id.fetch_add(1, Ordering::Relaxed);
        self.inner
            .heap
            .write()
            .insert(id, HeapObject { class: ty, slots });
        tracing::trace!(object = id, class = %class.name, "allocated object");
        Ok(ObjectRef(id))
    }

    /// Class of a live object
    pub fn class_of(&self, obj: ObjectRef) -> Option<TypeHandle> {
        self.inner.heap.read().get(&obj.0).map(|o| o.class)
    }

    /// Read an instance field by name without going through modifiers
    pub fn peek(&self, obj: ObjectRef, name: &str) -> Option<Value> {
        self.read_instance_by_name(obj, name).ok()
    }

    /// Read a static field by name without going through modifiers
    pub fn peek_static(&self, ty: TypeHandle, name: &str) -> Option<Value> {
        self.read_static_by_name(ty, name).ok()
    }

    /// Whether `source` is `target` or inherits from it
    pub fn is_subclass(&self, source: TypeHandle, target: TypeHandle) -> bool {
        let mut current = Some(source);
        while let Some(handle) = current {
            if handle == target {
                return true;
            }
            current = self.class(handle).ok().and_then(|c| c.parent);
        }
        false
    }

    // ========================================================================
    // Internal slot access
    // ========================================================================

    pub(crate) fn class(&self, ty: TypeHandle) -> HostResult<&ClassDef> {
        self.inner
            .classes
            .get(ty.0 as usize)
            .ok_or_else(|| HostError::NoSuchMember(ty.to_string()))
    }

    /// Field definition for `decl`, checked against its owner
    pub(crate) fn field_def(&self, decl: &FieldDecl) -> HostResult<&FieldDef> {
        self.class(decl.owner)?
            .field(decl)
            .ok_or_else(|| HostError::NoSuchMember(decl.name.clone()))
    }

    /// Look a field up by name along the inheritance chain
    fn field_by_name(&self, ty: TypeHandle, name: &str, want_static: bool) -> HostResult<&FieldDef> {
        let mut current = Some(ty);
        while let Some(handle) = current {
            let def = self.class(handle)?;
            if let Some(field) = def
                .fields
                .iter()
                .find(|f| f.decl.name == name && f.decl.is_static() == want_static)
            {
                return Ok(field);
            }
            current = def.parent;
        }
        Err(HostError::NoSuchMember(name.to_string()))
    }

    pub(crate) fn read_slot(&self, obj: ObjectRef, slot: usize) -> HostResult<Value> {
        let heap = self.inner.heap.read();
        let object = heap.get(&obj.0).ok_or(HostError::NoSuchObject(obj.0))?;
        object
            .slots
            .get(slot)
            .cloned()
            .ok_or_else(|| HostError::NoSuchMember(format!("slot {}", slot)))
    }

    pub(crate) fn write_slot(&self, obj: ObjectRef, slot: usize, value: Value) -> HostResult<()> {
        let mut heap = self.inner.heap.write();
        let object = heap.get_mut(&obj.0).ok_or(HostError::NoSuchObject(obj.0))?;
        let target = object
            .slots
            .get_mut(slot)
            .ok_or_else(|| HostError::NoSuchMember(format!("slot {}", slot)))?;
        *target = value;
        Ok(())
    }

    pub(crate) fn read_static_slot(&self, ty: TypeHandle, slot: usize) -> HostResult<Value> {
        self.class(ty)?
            .statics
            .read()
            .get(slot)
            .cloned()
            .ok_or_else(|| HostError::NoSuchMember(format!("static slot {}", slot)))
    }

    pub(crate) fn write_static_slot(&self, ty: TypeHandle, slot: usize, value: Value) -> HostResult<()> {
        let class = self.class(ty)?;
        let mut statics = class.statics.write();
        let target = statics
            .get_mut(slot)
            .ok_or_else(|| HostError::NoSuchMember(format!("static slot {}", slot)))?;
        *target = value;
        Ok(())
    }

    /// Resolve the instance slot of `decl` for `obj`, checking the object
    /// really is an instance of the declaring type
    fn instance_slot(&self, decl: &FieldDecl, instance: Option<ObjectRef>) -> HostResult<(ObjectRef, usize)> {
        let obj = instance.ok_or_else(|| HostError::MissingReceiver(decl.name.clone()))?;
        let class = self.class_of(obj).ok_or(HostError::NoSuchObject(obj.0))?;
        if !self.is_subclass(class, decl.owner) {
            return Err(HostError::NoSuchMember(format!(
                "{} on {}",
                decl.name, obj
            )));
        }
        Ok((obj, self.field_def(decl)?.slot))
    }

    pub(crate) fn read_instance_by_name(&self, obj: ObjectRef, name: &str) -> HostResult<Value> {
        let class = self.class_of(obj).ok_or(HostError::NoSuchObject(obj.0))?;
        let slot = self.field_by_name(class, name, false)?.slot;
        self.read_slot(obj, slot)
    }

    pub(crate) fn write_instance_by_name(&self, obj: ObjectRef, name: &str, value: Value) -> HostResult<()> {
        let class = self.class_of(obj).ok_or(HostError::NoSuchObject(obj.0))?;
        let slot = self.field_by_name(class, name, false)?.slot;
        self.write_slot(obj, slot, value)
    }

    pub(crate) fn read_static_by_name(&self, ty: TypeHandle, name: &str) -> HostResult<Value> {
        let field = self.field_by_name(ty, name, true)?;
        self.read_static_slot(field.decl.owner, field.slot)
    }

    pub(crate) fn write_static_by_name(&self, ty: TypeHandle, name: &str, value: Value) -> HostResult<()> {
        let field = self.field_by_name(ty, name, true)?;
        self.write_static_slot(field.decl.owner, field.slot, value)
    }

    fn check_arity(expected: usize, args: &[Value]) -> HostResult<()> {
        if expected != args.len() {
            return Err(HostError::ArityMismatch {
                expected,
                got: args.len(),
            });
        }
        Ok(())
    }
}

impl HostRuntime for MemoryHost {
    fn find_type(&self, qualified_name: &str) -> Option<TypeHandle> {
        LookupStats::bump(&self.inner.stats.type_lookups);
        self.inner.name_to_id.get(qualified_name).copied()
    }

    fn type_name(&self, ty: TypeHandle) -> Option<String> {
        self.class(ty).ok().map(|c| c.name.clone())
    }

    fn root_type_path(&self) -> String {
        self.inner.root_type_path.clone()
    }

    fn is_assignable(&self, target: TypeHandle, source: TypeHandle) -> bool {
        if target == source {
            return true;
        }
        if target == builtins::OBJECT {
            return !builtins::is_primitive(source);
        }
        self.is_subclass(source, target)
    }

    fn can_hold(&self, ty: TypeHandle, value: &Value) -> bool {
        match value {
            Value::Null => !builtins::is_primitive(ty),
            Value::Bool(_) => ty == builtins::BOOL,
            Value::Int(_) => ty == builtins::INT,
            Value::Long(_) => ty == builtins::LONG,
            Value::Double(_) => ty == builtins::DOUBLE,
            Value::Str(_) => self.is_assignable(ty, builtins::STRING),
            Value::Object(obj) => self
                .class_of(*obj)
                .map_or(false, |class| self.is_assignable(ty, class)),
            Value::Type(_) => ty == builtins::OBJECT,
        }
    }

    fn declared_fields(&self, ty: TypeHandle) -> Vec<FieldDecl> {
        LookupStats::bump(&self.inner.stats.field_lookups);
        self.class(ty)
            .map(|c| c.fields.iter().map(|f| f.decl.clone()).collect())
            .unwrap_or_default()
    }

    fn declared_field(&self, ty: TypeHandle, name: &str) -> Option<FieldDecl> {
        LookupStats::bump(&self.inner.stats.field_lookups);
        self.class(ty)
            .ok()?
            .fields
            .iter()
            .find(|f| f.decl.name == name)
            .map(|f| f.decl.clone())
    }

    fn declared_methods(&self, ty: TypeHandle) -> Vec<MethodDecl> {
        LookupStats::bump(&self.inner.stats.method_lookups);
        self.class(ty)
            .map(|c| c.methods.iter().map(|m| m.decl.clone()).collect())
            .unwrap_or_default()
    }

    fn declared_method(&self, ty: TypeHandle, name: &str, params: &[TypeHandle]) -> Option<MethodDecl> {
        LookupStats::bump(&self.inner.stats.method_lookups);
        self.class(ty)
            .ok()?
            .methods
            .iter()
            .find(|m| m.decl.name == name && m.decl.params == params)
            .map(|m| m.decl.clone())
    }

    fn declared_constructors(&self, ty: TypeHandle) -> Vec<ConstructorDecl> {
        LookupStats::bump(&self.inner.stats.constructor_lookups);
        self.class(ty)
            .map(|c| c.constructors.iter().map(|k| k.decl.clone()).collect())
            .unwrap_or_default()
    }

    fn declared_constructor(&self, ty: TypeHandle, params: &[TypeHandle]) -> Option<ConstructorDecl> {
        LookupStats::bump(&self.inner.stats.constructor_lookups);
        self.class(ty)
            .ok()?
            .constructors
            .iter()
            .find(|k| k.decl.params == params)
            .map(|k| k.decl.clone())
    }

    fn read_field(&self, field: &FieldDecl, instance: Option<ObjectRef>) -> HostResult<Value> {
        if field.is_static() {
            let slot = self.field_def(field)?.slot;
            return self.read_static_slot(field.owner, slot);
        }
        let (obj, slot) = self.instance_slot(field, instance)?;
        self.read_slot(obj, slot)
    }

    fn write_field(&self, field: &FieldDecl, instance: Option<ObjectRef>, value: Value) -> HostResult<()> {
        if field.is_readonly() {
            return Err(HostError::ImmutableField(field.name.clone()));
        }
        if !self.can_hold(field.ty, &value) {
            return Err(HostError::IncompatibleValue {
                field: field.name.clone(),
                found: value.type_name(),
            });
        }
        if field.is_static() {
            let slot = self.field_def(field)?.slot;
            return self.write_static_slot(field.owner, slot, value);
        }
        let (obj, slot) = self.instance_slot(field, instance)?;
        self.write_slot(obj, slot, value)
    }

    fn invoke_method(&self, method: &MethodDecl, receiver: Option<ObjectRef>, args: &[Value]) -> HostResult<Value> {
        Self::check_arity(method.params.len(), args)?;
        let def = self
            .class(method.owner)?
            .methods
            .iter()
            .find(|m| m.decl.id == method.id)
            .ok_or_else(|| HostError::NoSuchMember(method.name.clone()))?;

        let receiver = if method.modifiers.is_static() {
            None
        } else {
            let obj = receiver.ok_or_else(|| HostError::MissingReceiver(method.name.clone()))?;
            let class = self.class_of(obj).ok_or(HostError::NoSuchObject(obj.0))?;
            if !self.is_subclass(class, method.owner) {
                return Err(HostError::NoSuchMember(format!("{} on {}", method.name, obj)));
            }
            Some(obj)
        };

        let call = Call {
            host: self,
            owner: method.owner,
            receiver,
            args,
        };
        (def.body)(&call)
    }

    fn invoke_constructor(&self, ctor: &ConstructorDecl, args: &[Value]) -> HostResult<Value> {
        Self::check_arity(ctor.params.len(), args)?;
        let def = self
            .class(ctor.owner)?
            .constructors
            .iter()
            .find(|k| k.decl.id == ctor.id)
            .ok_or_else(|| HostError::NoSuchMember(format!("constructor of {}", ctor.owner)))?;

        let obj = self.instantiate(ctor.owner)?;
        let call = Call {
            host: self,
            owner: ctor.owner,
            receiver: Some(obj),
            args,
        };
        if let Err(err) = (def.body)(&call) {
            self.inner.heap.write().remove(&obj.0);
            return Err(err);
        }
        Ok(Value::Object(obj))
    }

    fn raw_memory(&self) -> HostResult<Arc<dyn RawMemory>> {
        if !self.inner.privileged {
            return Err(HostError::Unsupported(
                "privileged memory access is disabled for this host".to_string(),
            ));
        }
        LookupStats::bump(&self.inner.stats.memory_acquisitions);
        Ok(Arc::new(SlotMemory::new(self.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veneer_sdk::Modifiers;

    fn sample() -> (MemoryHost, TypeHandle, TypeHandle) {
        let mut builder = MemoryHost::builder().root_type_path("org.host.v1.Server");
        let base = builder.class("org.host.Base", None, |c| {
            c.field("id", builtins::INT, Modifiers::PRIVATE | Modifiers::READONLY, Value::Int(1));
        });
        let derived = builder.class("org.host.Derived", Some(base), |c| {
            c.field("name", builtins::STRING, Modifiers::PUBLIC, Value::from("n"));
            c.field("COUNT", builtins::INT, Modifiers::STATIC, Value::Int(0));
        });
        (builder.build(), base, derived)
    }

    #[test]
    fn test_builtins_and_lookup() {
        let (host, base, _) = sample();
        assert_eq!(host.find_type("int"), Some(builtins::INT));
        assert_eq!(host.find_type("org.host.Base"), Some(base));
        assert_eq!(host.find_type("org.host.Missing"), None);
        assert_eq!(host.type_name(base).as_deref(), Some("org.host.Base"));
        assert_eq!(host.stats().type_lookups, 3);
    }

    #[test]
    fn test_inherited_slots() {
        let (host, _, derived) = sample();
        let obj = host.instantiate(derived).unwrap();
        assert_eq!(host.peek(obj, "id"), Some(Value::Int(1)));
        assert_eq!(host.peek(obj, "name"), Some(Value::from("n")));
        assert_eq!(host.peek_static(derived, "COUNT"), Some(Value::Int(0)));
    }

    #[test]
    fn test_assignability() {
        let (host, base, derived) = sample();
        assert!(host.is_assignable(base, derived));
        assert!(!host.is_assignable(derived, base));
        assert!(host.is_assignable(builtins::OBJECT, derived));
        assert!(host.is_assignable(builtins::OBJECT, builtins::STRING));
        assert!(!host.is_assignable(builtins::OBJECT, builtins::INT));
    }

    #[test]
    fn test_write_rejects_readonly() {
        let (host, base, derived) = sample();
        let obj = host.instantiate(derived).unwrap();
        let id = host.declared_field(base, "id").unwrap();
        assert_eq!(
            host.write_field(&id, Some(obj), Value::Int(5)),
            Err(HostError::ImmutableField("id".to_string()))
        );
        assert_eq!(host.read_field(&id, Some(obj)), Ok(Value::Int(1)));
    }

    #[test]
    fn test_write_rejects_incompatible_value() {
        let (host, base, derived) = sample();
        let obj = host.instantiate(derived).unwrap();
        let name = host.declared_field(derived, "name").unwrap();
        assert_eq!(
            host.write_field(&name, Some(obj), Value::Int(3)),
            Err(HostError::IncompatibleValue {
                field: "name".to_string(),
                found: "int",
            })
        );
        assert_eq!(host.read_field(&name, Some(obj)), Ok(Value::from("n")));

        let count = host.declared_field(derived, "COUNT").unwrap();
        assert!(host.write_field(&count, None, Value::Long(1)).is_err());
        assert_eq!(host.write_field(&count, None, Value::Int(4)), Ok(()));
        assert_eq!(host.write_field(&name, Some(obj), Value::Null), Ok(()));
        assert_eq!(host.peek(obj, "name"), Some(Value::Null));
        assert!(host.can_hold(builtins::OBJECT, &Value::from("s")));
        assert!(!host.can_hold(builtins::INT, &Value::Null));
        assert!(host.can_hold(base, &Value::Object(obj)));
    }

    #[test]
    fn test_read_requires_receiver() {
        let (host, _, derived) = sample();
        let name = host.declared_field(derived, "name").unwrap();
        assert!(matches!(
            host.read_field(&name, None),
            Err(HostError::MissingReceiver(_))
        ));
    }

    #[test]
    fn test_raw_memory_disabled() {
        let host = MemoryHost::builder().privileged(false).build();
        assert!(matches!(host.raw_memory(), Err(HostError::Unsupported(_))));
        assert_eq!(host.stats().memory_acquisitions, 0);
    }
}
