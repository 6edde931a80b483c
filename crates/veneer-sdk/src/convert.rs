//! Traits for converting between host values and Rust types.
//!
//! Accessors are generic over the Rust type they hand back. `FromValue`
//! returns `None` for values of the wrong kind, which the absorbing accessor
//! API turns into the caller-supplied default.

use std::sync::Arc;

use crate::types::{ObjectRef, TypeHandle};
use crate::value::Value;

/// Extract a Rust value from a host value
pub trait FromValue: Sized {
    /// Convert, or `None` if the value has an incompatible kind
    fn from_value(value: Value) -> Option<Self>;
}

/// Turn a Rust value into a host value
pub trait IntoValue {
    /// Convert into a host value
    fn into_value(self) -> Value;
}

impl FromValue for Value {
    fn from_value(value: Value) -> Option<Self> {
        Some(value)
    }
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

macro_rules! impl_value_conversions {
    ($($ty:ty => $getter:ident),* $(,)?) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: Value) -> Option<Self> {
                    value.$getter()
                }
            }

            impl IntoValue for $ty {
                fn into_value(self) -> Value {
                    Value::from(self)
                }
            }
        )*
    };
}

impl_value_conversions! {
    bool => as_bool,
    i32 => as_i32,
    i64 => as_i64,
    f64 => as_f64,
    ObjectRef => as_object,
    TypeHandle => as_type,
}

impl FromValue for String {
    fn from_value(value: Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::from(self)
    }
}

impl FromValue for Arc<str> {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl IntoValue for Arc<str> {
    fn into_value(self) -> Value {
        Value::Str(self)
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::from(self)
    }
}

/// `None` maps to `Value::Null`
impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        self.map_or(Value::Null, IntoValue::into_value)
    }
}
