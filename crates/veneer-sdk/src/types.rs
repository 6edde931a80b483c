//! Opaque handles and member declarations
//!
//! Handles are plain identifiers assigned by the host. They are borrowed
//! references into the host's type universe: the engine compares and caches
//! them but never frees or mutates what they point at.

use std::fmt;

use crate::modifiers::Modifiers;

/// Opaque reference to a loaded type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeHandle(pub u32);

/// Opaque reference to a live object instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectRef(pub u64);

/// Host-assigned identity of a declared field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldId(pub u32);

/// Host-assigned identity of a declared method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MethodId(pub u32);

/// Host-assigned identity of a declared constructor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConstructorId(pub u32);

impl fmt::Display for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type#{}", self.0)
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "object#{}", self.0)
    }
}

/// A field as declared on its owning type
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    /// Host identity of the field
    pub id: FieldId,
    /// Declaring type
    pub owner: TypeHandle,
    /// Declared name (may be obfuscated)
    pub name: String,
    /// Declared type
    pub ty: TypeHandle,
    /// Declared modifiers
    pub modifiers: Modifiers,
}

impl FieldDecl {
    /// Whether the field lives in the type's shared static storage
    pub fn is_static(&self) -> bool {
        self.modifiers.is_static()
    }

    /// Whether the field is assign-once by declaration
    pub fn is_readonly(&self) -> bool {
        self.modifiers.is_readonly()
    }
}

/// A method as declared on its owning type
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    /// Host identity of the method
    pub id: MethodId,
    /// Declaring type
    pub owner: TypeHandle,
    /// Declared name
    pub name: String,
    /// Return type, `None` for methods that return nothing
    pub return_type: Option<TypeHandle>,
    /// Parameter types in order
    pub params: Vec<TypeHandle>,
    /// Declared modifiers
    pub modifiers: Modifiers,
}

/// A constructor as declared on its owning type
#[derive(Debug, Clone, PartialEq)]
pub struct ConstructorDecl {
    /// Host identity of the constructor
    pub id: ConstructorId,
    /// Type being constructed
    pub owner: TypeHandle,
    /// Parameter types in order
    pub params: Vec<TypeHandle>,
}
