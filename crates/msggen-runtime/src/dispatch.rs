//! Type-id dispatch for untyped wire traffic.

use crate::codec::WireMessage;
use crate::embedded::EmbeddedRecord;
use crate::error::{CodecError, CodecResult};
use crate::header::MessageHeader;
use crate::host::HostMessage;
use msggen_core::{MessageDescriptor, Registry, Representation, SchemaResult};
use std::collections::HashMap;
use tracing::debug;

/// Maps type ids to descriptors for one representation.
#[derive(Debug)]
struct Table<'r> {
    entries: HashMap<u32, &'r MessageDescriptor>,
}

impl<'r> Table<'r> {
    fn build(registry: &'r Registry, representation: Representation) -> SchemaResult<Self> {
        let entries = registry
            .dispatch_table(representation)?
            .into_iter()
            .filter_map(|entry| {
                registry
                    .message(&entry.name)
                    .map(|descriptor| (entry.type_id, descriptor))
            })
            .collect();
        Ok(Self { entries })
    }

    fn lookup(&self, bytes: &[u8]) -> CodecResult<(u32, &'r MessageDescriptor)> {
        let type_id = MessageHeader::peek_type(bytes)?;
        match self.entries.get(&type_id) {
            Some(descriptor) => Ok((type_id, *descriptor)),
            None => {
                debug!(type_id, "no decoder for type id");
                Err(CodecError::UnknownType(type_id))
            }
        }
    }
}

/// Embedded-side parser: type id → `<Name>Deserialize`.
#[derive(Debug)]
pub struct Dispatcher<'r> {
    table: Table<'r>,
}

impl<'r> Dispatcher<'r> {
    pub fn new(registry: &'r Registry) -> SchemaResult<Self> {
        Ok(Self {
            table: Table::build(registry, Representation::Embedded)?,
        })
    }

    /// Decode a message of any registered wire type.
    pub fn parse(&self, bytes: &[u8]) -> CodecResult<EmbeddedRecord<'r>> {
        let (type_id, descriptor) = self.table.lookup(bytes)?;
        EmbeddedRecord::deserialize(descriptor, type_id, bytes)
    }

    /// Serialize any record, rejecting internal types.
    pub fn serialize_any(&self, record: &EmbeddedRecord<'_>) -> CodecResult<Vec<u8>> {
        if record.descriptor().internal {
            return Err(CodecError::NotSerializable(record.name().to_string()));
        }
        record.encode()
    }

    pub fn len(&self) -> usize {
        self.table.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.entries.is_empty()
    }
}

/// Host-side parser: type id → class stream extraction.
#[derive(Debug)]
pub struct HostParser<'r> {
    table: Table<'r>,
}

impl<'r> HostParser<'r> {
    pub fn new(registry: &'r Registry) -> SchemaResult<Self> {
        Ok(Self {
            table: Table::build(registry, Representation::Host)?,
        })
    }

    pub fn parse(&self, bytes: &[u8]) -> CodecResult<HostMessage<'r>> {
        let (type_id, descriptor) = self.table.lookup(bytes)?;
        HostMessage::decode(descriptor, type_id, bytes)
    }
}
