//! Host representation: owned values, stream encoding.
//!
//! Fields are written back to back in declaration order with no length
//! prefixes. A text or opaque field is read to the end of the message, which
//! is why the schema only allows one, in last position.

use crate::codec::WireMessage;
use crate::error::{CodecError, CodecResult};
use crate::header::MessageHeader;
use crate::stream::{BinaryIStream, BinaryOStream};
use crate::value::Value;
use msggen_core::{FieldKind, MessageDescriptor, OwnedCore};

/// One host-side message instance.
#[derive(Debug, Clone)]
pub struct HostMessage<'d> {
    descriptor: &'d MessageDescriptor,
    header: MessageHeader,
    values: Vec<Value>,
}

impl<'d> HostMessage<'d> {
    /// Construct with every declared field, in declaration order.
    pub fn new(
        descriptor: &'d MessageDescriptor,
        header: MessageHeader,
        values: Vec<Value>,
    ) -> CodecResult<Self> {
        if values.len() != descriptor.fields.len() {
            return Err(CodecError::ArgumentCount {
                message: descriptor.name.clone(),
                expected: descriptor.fields.len(),
                found: values.len(),
            });
        }
        for (field, value) in descriptor.fields.iter().zip(&values) {
            check_kind(&field.name, &field.kind, value)?;
        }
        Ok(Self {
            descriptor,
            header,
            values,
        })
    }

    /// Construct with default field values.
    pub fn with_defaults(descriptor: &'d MessageDescriptor, header: MessageHeader) -> Self {
        let values = descriptor
            .fields
            .iter()
            .map(|f| Value::default_for(&f.kind))
            .collect();
        Self {
            descriptor,
            header,
            values,
        }
    }

    pub fn header_mut(&mut self) -> &mut MessageHeader {
        &mut self.header
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    fn index(&self, name: &str) -> CodecResult<usize> {
        self.descriptor
            .field(name)
            .map(|(index, _)| index)
            .ok_or_else(|| CodecError::UnknownField {
                message: self.descriptor.name.clone(),
                field: name.to_string(),
            })
    }

    pub fn get(&self, name: &str) -> CodecResult<&Value> {
        let index = self.index(name)?;
        Ok(&self.values[index])
    }

    pub fn set(&mut self, name: &str, value: Value) -> CodecResult<()> {
        let index = self.index(name)?;
        check_kind(name, &self.descriptor.fields[index].kind, &value)?;
        self.values[index] = value;
        Ok(())
    }

    /// Deep copy of an owned field, as used by the copy constructor.
    pub fn clone_value(&self, name: &str) -> CodecResult<Value> {
        self.get(name).cloned()
    }

    /// Read a message of `type_id` from `bytes`.
    pub fn decode(
        descriptor: &'d MessageDescriptor,
        type_id: u32,
        bytes: &[u8],
    ) -> CodecResult<Self> {
        if descriptor.internal {
            return Err(CodecError::NotSerializable(descriptor.name.clone()));
        }
        let mut is = BinaryIStream::new(bytes);
        let header = MessageHeader::decode(&mut is)?;
        if header.type_id != type_id {
            return Err(CodecError::TypeMismatch {
                expected: type_id,
                found: header.type_id,
            });
        }

        let mut values = Vec::with_capacity(descriptor.fields.len());
        for field in &descriptor.fields {
            let value = match &field.kind {
                FieldKind::Scalar(ty) => is.read_scalar(*ty)?,
                FieldKind::Text => Value::Text(is.read_to_end().to_vec()),
                FieldKind::OwnedValue(OwnedCore::Scalar(ty)) => {
                    Value::Owned(Box::new(is.read_scalar(*ty)?))
                }
                FieldKind::OwnedValue(OwnedCore::Text) => {
                    Value::Owned(Box::new(Value::Text(is.read_to_end().to_vec())))
                }
                FieldKind::OwnedValue(OwnedCore::Opaque(_)) => {
                    Value::Opaque(is.read_to_end().to_vec())
                }
            };
            values.push(value);
        }

        Ok(Self {
            descriptor,
            header,
            values,
        })
    }
}

impl WireMessage for HostMessage<'_> {
    fn descriptor(&self) -> &MessageDescriptor {
        self.descriptor
    }

    fn header(&self) -> &MessageHeader {
        &self.header
    }

    fn encode(&self) -> CodecResult<Vec<u8>> {
        if self.descriptor.internal {
            return Err(CodecError::NotSerializable(self.descriptor.name.clone()));
        }
        let mut os = BinaryOStream::new();
        self.header.encode(&mut os);
        for value in &self.values {
            match value {
                Value::Owned(inner) if inner.scalar_type().is_some() => os.write_scalar(inner),
                Value::Text(_) | Value::Owned(_) | Value::Opaque(_) => {
                    os.write_bytes(value.as_bytes().unwrap_or_default())
                }
                scalar => os.write_scalar(scalar),
            }
        }
        Ok(os.into_inner())
    }
}

impl PartialEq for HostMessage<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.descriptor.name == other.descriptor.name
            && self.header == other.header
            && self.values == other.values
    }
}

fn check_kind(name: &str, kind: &FieldKind, value: &Value) -> CodecResult<()> {
    if value.fits(kind) {
        return Ok(());
    }
    let expected = match kind {
        FieldKind::Scalar(ty) => ty.c_name(),
        FieldKind::Text => "text",
        FieldKind::OwnedValue(_) => "owned",
    };
    Err(CodecError::ValueKind {
        field: name.to_string(),
        expected,
    })
}
