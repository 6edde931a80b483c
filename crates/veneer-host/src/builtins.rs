//! Builtin types registered by every `MemoryHost`
//!
//! Builtins occupy the first type handles in a fixed order.

use veneer_sdk::TypeHandle;

/// Root of all reference types
pub const OBJECT: TypeHandle = TypeHandle(0);
/// Boolean primitive
pub const BOOL: TypeHandle = TypeHandle(1);
/// 32-bit integer primitive
pub const INT: TypeHandle = TypeHandle(2);
/// 64-bit integer primitive
pub const LONG: TypeHandle = TypeHandle(3);
/// 64-bit float primitive
pub const DOUBLE: TypeHandle = TypeHandle(4);
/// String reference type
pub const STRING: TypeHandle = TypeHandle(5);

pub(crate) const ALL: [(TypeHandle, &str); 6] = [
    (OBJECT, "object"),
    (BOOL, "bool"),
    (INT, "int"),
    (LONG, "long"),
    (DOUBLE, "double"),
    (STRING, "string"),
];

/// Primitives are not assignable to `OBJECT`
pub fn is_primitive(ty: TypeHandle) -> bool {
    matches!(ty, BOOL | INT | LONG | DOUBLE)
}
