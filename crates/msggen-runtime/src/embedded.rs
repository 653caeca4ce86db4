//! Embedded representation: flat record plus one trailing text buffer.
//!
//! `create` sizes the trailing buffer once from the capacities passed for each
//! text field. Text payloads live consecutively inside it and nothing ever
//! reallocates it. On the wire the fixed fields come first at natural width,
//! then each text field as a `u32` length followed by at most `capacity` bytes.

use crate::codec::WireMessage;
use crate::error::{CodecError, CodecResult};
use crate::header::{HEADER_SIZE, MessageHeader};
use crate::stream::{BinaryIStream, BinaryOStream};
use crate::value::Value;
use msggen_core::{FieldKind, MessageDescriptor, PhysicalField, PhysicalRole};
use std::collections::HashMap;

const LENGTH_PREFIX: usize = 4;

#[derive(Debug, Clone, PartialEq)]
enum Slot {
    Value(Value),
    /// Offset of the payload inside the trailing buffer.
    Payload(usize),
    Counter(u32),
}

/// One embedded-side message instance.
#[derive(Debug, Clone)]
pub struct EmbeddedRecord<'d> {
    descriptor: &'d MessageDescriptor,
    header: MessageHeader,
    /// One slot per physical field, in record order.
    slots: Vec<Slot>,
    buffer: Box<[u8]>,
}

impl<'d> EmbeddedRecord<'d> {
    /// Allocate a record.
    ///
    /// `args` follow the physical field order and hold every scalar value
    /// plus one `u32` buffer capacity per text field. Payload pointers and
    /// length counters are initialised by the record itself.
    pub fn create(
        descriptor: &'d MessageDescriptor,
        type_id: u32,
        destination: u32,
        msg_nr: u8,
        args: Vec<Value>,
    ) -> CodecResult<Self> {
        let expected = descriptor.physical.iter().filter(|p| p.is_create_arg()).count();
        if expected != args.len() {
            return Err(CodecError::ArgumentCount {
                message: descriptor.name.clone(),
                expected,
                found: args.len(),
            });
        }

        let mut args = args.into_iter();
        let mut slots = Vec::with_capacity(descriptor.physical.len());
        for field in &descriptor.physical {
            let slot = match field.role {
                PhysicalRole::Payload => Slot::Payload(0),
                PhysicalRole::PayloadLength => Slot::Counter(0),
                PhysicalRole::Value | PhysicalRole::BufferCapacity => {
                    let Some(arg) = args.next() else {
                        return Err(CodecError::ArgumentCount {
                            message: descriptor.name.clone(),
                            expected,
                            found: slots.len(),
                        });
                    };
                    check_scalar(field, &arg)?;
                    match arg {
                        Value::U32(capacity) if field.role == PhysicalRole::BufferCapacity => {
                            Slot::Counter(capacity)
                        }
                        value => Slot::Value(value),
                    }
                }
            };
            slots.push(slot);
        }

        let mut record = Self {
            descriptor,
            header: MessageHeader::new(type_id, destination, msg_nr),
            slots,
            buffer: Box::default(),
        };

        // Lay the text regions out back to back.
        let mut offset = 0;
        for (source, _) in descriptor.text_fields() {
            let capacity = record.text_span(source).2;
            if let Some(index) = record.role_index(source, PhysicalRole::Payload) {
                record.slots[index] = Slot::Payload(offset);
            }
            offset += capacity;
        }
        record.buffer = vec![0u8; offset].into_boxed_slice();
        Ok(record)
    }

    pub fn header_mut(&mut self) -> &mut MessageHeader {
        &mut self.header
    }

    /// Size of the trailing buffer shared by all text fields.
    pub fn buffer_len(&self) -> usize {
        self.buffer.len()
    }

    fn physical_index(&self, name: &str) -> CodecResult<usize> {
        self.descriptor
            .physical
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| self.unknown(name))
    }

    fn unknown(&self, name: &str) -> CodecError {
        CodecError::UnknownField {
            message: self.descriptor.name.clone(),
            field: name.to_string(),
        }
    }

    fn role_index(&self, source: usize, role: PhysicalRole) -> Option<usize> {
        self.descriptor
            .physical
            .iter()
            .position(|p| p.source == source && p.role == role)
    }

    fn counter(&self, index: Option<usize>) -> usize {
        match index.map(|i| &self.slots[i]) {
            Some(Slot::Counter(n)) => *n as usize,
            _ => 0,
        }
    }

    /// `(offset, length, capacity)` of the text field declared at `source`.
    fn text_span(&self, source: usize) -> (usize, usize, usize) {
        let offset = match self
            .role_index(source, PhysicalRole::Payload)
            .map(|i| &self.slots[i])
        {
            Some(Slot::Payload(offset)) => *offset,
            _ => 0,
        };
        let length = self.counter(self.role_index(source, PhysicalRole::PayloadLength));
        let capacity = self.counter(self.role_index(source, PhysicalRole::BufferCapacity));
        (offset, length, capacity)
    }

    fn text_at(&self, source: usize) -> &[u8] {
        let (offset, length, capacity) = self.text_span(source);
        &self.buffer[offset..offset + length.min(capacity)]
    }

    /// Current contents of a text field.
    pub fn text(&self, name: &str) -> CodecResult<&[u8]> {
        match self.descriptor.field(name) {
            Some((source, field)) if field.kind == FieldKind::Text => Ok(self.text_at(source)),
            _ => Err(self.unknown(name)),
        }
    }

    /// Copy `bytes` into a text field's buffer region and update its length.
    pub fn set_text(&mut self, name: &str, bytes: &[u8]) -> CodecResult<()> {
        let source = match self.descriptor.field(name) {
            Some((source, field)) if field.kind == FieldKind::Text => source,
            _ => return Err(self.unknown(name)),
        };
        let (offset, _, capacity) = self.text_span(source);
        if bytes.len() > capacity {
            return Err(CodecError::PayloadOverflow {
                field: name.to_string(),
                length: bytes.len(),
                capacity,
            });
        }
        self.buffer[offset..offset + bytes.len()].copy_from_slice(bytes);
        if let Some(index) = self.role_index(source, PhysicalRole::PayloadLength) {
            self.slots[index] = Slot::Counter(bytes.len() as u32);
        }
        Ok(())
    }

    /// Getter for any physical field, by its physical name.
    pub fn get(&self, name: &str) -> CodecResult<Value> {
        let index = self.physical_index(name)?;
        let field = &self.descriptor.physical[index];
        Ok(match &self.slots[index] {
            Slot::Value(value) => value.clone(),
            Slot::Counter(n) => Value::U32(*n),
            Slot::Payload(_) => Value::Text(self.text_at(field.source).to_vec()),
        })
    }

    /// Setter for any physical field, by its physical name.
    pub fn set(&mut self, name: &str, value: Value) -> CodecResult<()> {
        let index = self.physical_index(name)?;
        let descriptor = self.descriptor;
        let field = &descriptor.physical[index];
        match field.role {
            PhysicalRole::Value => {
                check_scalar(field, &value)?;
                self.slots[index] = Slot::Value(value);
                Ok(())
            }
            PhysicalRole::Payload => {
                let declared = &descriptor.fields[field.source].name;
                match value {
                    Value::Text(bytes) => self.set_text(declared, &bytes),
                    _ => Err(CodecError::ValueKind {
                        field: field.name.clone(),
                        expected: "text",
                    }),
                }
            }
            PhysicalRole::PayloadLength => {
                let length = value.as_u32().ok_or_else(|| CodecError::ValueKind {
                    field: field.name.clone(),
                    expected: "uint32_t",
                })?;
                let (_, _, capacity) = self.text_span(field.source);
                if length as usize > capacity {
                    return Err(CodecError::PayloadOverflow {
                        field: field.name.clone(),
                        length: length as usize,
                        capacity,
                    });
                }
                self.slots[index] = Slot::Counter(length);
                Ok(())
            }
            PhysicalRole::BufferCapacity => Err(CodecError::ReadOnly(field.name.clone())),
        }
    }

    /// Upper bound of the serialized size: header, fixed fields, and every
    /// text field at full capacity.
    pub fn message_size(&self) -> usize {
        let fixed: usize = self
            .descriptor
            .fixed_fields()
            .filter_map(|(_, f)| match f.kind {
                FieldKind::Scalar(ty) => Some(ty.width()),
                _ => None,
            })
            .sum();
        let texts: usize = self
            .descriptor
            .text_fields()
            .map(|(source, _)| LENGTH_PREFIX + self.text_span(source).2)
            .sum();
        HEADER_SIZE + fixed + texts
    }

    /// Serialize into a caller-provided buffer, returning the bytes written.
    pub fn serialize_into(&self, out: &mut [u8]) -> CodecResult<usize> {
        let bytes = self.encode()?;
        if bytes.len() > out.len() {
            return Err(CodecError::Truncated {
                needed: bytes.len(),
                remaining: out.len(),
            });
        }
        out[..bytes.len()].copy_from_slice(&bytes);
        Ok(bytes.len())
    }

    /// Mirror of `encode`. Each text field gets a buffer region exactly as
    /// large as the text received.
    pub fn deserialize(
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

        let mut values: HashMap<usize, Value> = HashMap::new();
        for (source, field) in descriptor.fixed_fields() {
            if let FieldKind::Scalar(ty) = field.kind {
                values.insert(source, is.read_scalar(ty)?);
            }
        }
        let mut texts: HashMap<usize, &[u8]> = HashMap::new();
        for (source, _) in descriptor.text_fields() {
            let length = is.read_u32()? as usize;
            texts.insert(source, is.read_bytes(length)?);
        }

        let mut buffer = Vec::with_capacity(texts.values().map(|t| t.len()).sum());
        let mut slots = Vec::with_capacity(descriptor.physical.len());
        for field in &descriptor.physical {
            let text = texts.get(&field.source).copied().unwrap_or_default();
            let slot = match field.role {
                PhysicalRole::Value => match values.remove(&field.source) {
                    Some(value) => Slot::Value(value),
                    None => return Err(CodecError::UnknownField {
                        message: descriptor.name.clone(),
                        field: field.name.clone(),
                    }),
                },
                PhysicalRole::Payload => {
                    let offset = buffer.len();
                    buffer.extend_from_slice(text);
                    Slot::Payload(offset)
                }
                PhysicalRole::PayloadLength | PhysicalRole::BufferCapacity => {
                    Slot::Counter(text.len() as u32)
                }
            };
            slots.push(slot);
        }

        Ok(Self {
            descriptor,
            header,
            slots,
            buffer: buffer.into_boxed_slice(),
        })
    }
}

impl WireMessage for EmbeddedRecord<'_> {
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
        let mut os = BinaryOStream::with_capacity(self.message_size());
        self.header.encode(&mut os);
        for (source, _) in self.descriptor.fixed_fields() {
            if let Some(Slot::Value(value)) = self
                .role_index(source, PhysicalRole::Value)
                .map(|i| &self.slots[i])
            {
                os.write_scalar(value);
            }
        }
        for (source, _) in self.descriptor.text_fields() {
            let text = self.text_at(source);
            os.write_u32(text.len() as u32);
            os.write_bytes(text);
        }
        Ok(os.into_inner())
    }
}

/// Records compare by content: header, scalars and text bytes, not capacity.
impl PartialEq for EmbeddedRecord<'_> {
    fn eq(&self, other: &Self) -> bool {
        if self.descriptor.name != other.descriptor.name || self.header != other.header {
            return false;
        }
        let scalars_equal = self
            .descriptor
            .fixed_fields()
            .all(|(source, _)| {
                let index = self.role_index(source, PhysicalRole::Value);
                index.map(|i| &self.slots[i]) == index.map(|i| &other.slots[i])
            });
        scalars_equal
            && self
                .descriptor
                .text_fields()
                .all(|(source, _)| self.text_at(source) == other.text_at(source))
    }
}

fn check_scalar(field: &PhysicalField, value: &Value) -> CodecResult<()> {
    match field.scalar {
        Some(ty) if value.scalar_type() == Some(ty) => Ok(()),
        Some(ty) => Err(CodecError::ValueKind {
            field: field.name.clone(),
            expected: ty.c_name(),
        }),
        None => Err(CodecError::ValueKind {
            field: field.name.clone(),
            expected: "text",
        }),
    }
}
