//! Dynamic field values

use msggen_core::{FieldKind, OwnedCore, ScalarType};

/// A field value held by a runtime message.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Bool(bool),
    /// Raw text bytes; the wire format does not require UTF-8.
    Text(Vec<u8>),
    /// Exclusively owned heap value. Cloning deep-copies it.
    Owned(Box<Value>),
    /// Host type streamed by its own operators, kept as raw bytes.
    Opaque(Vec<u8>),
}

impl Value {
    /// Zero value of a scalar type.
    pub fn zero(ty: ScalarType) -> Self {
        match ty {
            ScalarType::U8 => Value::U8(0),
            ScalarType::U16 => Value::U16(0),
            ScalarType::U32 => Value::U32(0),
            ScalarType::U64 => Value::U64(0),
            ScalarType::I8 => Value::I8(0),
            ScalarType::I16 => Value::I16(0),
            ScalarType::I32 => Value::I32(0),
            ScalarType::I64 => Value::I64(0),
            ScalarType::F32 => Value::F32(0.0),
            ScalarType::F64 => Value::F64(0.0),
            ScalarType::Bool => Value::Bool(false),
        }
    }

    /// Default value for a declared field.
    pub fn default_for(kind: &FieldKind) -> Self {
        match kind {
            FieldKind::Scalar(ty) => Value::zero(*ty),
            FieldKind::Text => Value::Text(Vec::new()),
            FieldKind::OwnedValue(OwnedCore::Scalar(ty)) => Value::Owned(Box::new(Value::zero(*ty))),
            FieldKind::OwnedValue(OwnedCore::Text) => Value::Owned(Box::new(Value::Text(Vec::new()))),
            FieldKind::OwnedValue(OwnedCore::Opaque(_)) => Value::Opaque(Vec::new()),
        }
    }

    /// Scalar type of this value, if it is a scalar.
    pub fn scalar_type(&self) -> Option<ScalarType> {
        Some(match self {
            Value::U8(_) => ScalarType::U8,
            Value::U16(_) => ScalarType::U16,
            Value::U32(_) => ScalarType::U32,
            Value::U64(_) => ScalarType::U64,
            Value::I8(_) => ScalarType::I8,
            Value::I16(_) => ScalarType::I16,
            Value::I32(_) => ScalarType::I32,
            Value::I64(_) => ScalarType::I64,
            Value::F32(_) => ScalarType::F32,
            Value::F64(_) => ScalarType::F64,
            Value::Bool(_) => ScalarType::Bool,
            Value::Text(_) | Value::Owned(_) | Value::Opaque(_) => return None,
        })
    }

    /// Whether this value can be stored in a field of `kind`.
    pub fn fits(&self, kind: &FieldKind) -> bool {
        match (kind, self) {
            (FieldKind::Scalar(ty), value) => value.scalar_type() == Some(*ty),
            (FieldKind::Text, Value::Text(_)) => true,
            (FieldKind::OwnedValue(OwnedCore::Scalar(ty)), Value::Owned(inner)) => {
                inner.scalar_type() == Some(*ty)
            }
            (FieldKind::OwnedValue(OwnedCore::Text), Value::Owned(inner)) => {
                matches!(**inner, Value::Text(_))
            }
            (FieldKind::OwnedValue(OwnedCore::Opaque(_)), Value::Opaque(_)) => true,
            _ => false,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Text(bytes) | Value::Opaque(bytes) => Some(bytes),
            Value::Owned(inner) => inner.as_bytes(),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Value::U32(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.as_bytes().to_vec())
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Value::U8(v)
    }
}

impl From<u16> for Value {
    fn from(v: u16) -> Self {
        Value::U16(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::U32(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::I32(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::F32(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}
