//! Common message header

use crate::error::CodecResult;
use crate::stream::{BinaryIStream, BinaryOStream};

/// Encoded size of [`MessageHeader`].
pub const HEADER_SIZE: usize = 13;

/// Header preceding every serialized message: type, destination, source, message number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessageHeader {
    pub type_id: u32,
    pub destination: u32,
    pub source: u32,
    pub msg_nr: u8,
}

impl MessageHeader {
    pub fn new(type_id: u32, destination: u32, msg_nr: u8) -> Self {
        Self {
            type_id,
            destination,
            source: 0,
            msg_nr,
        }
    }

    pub fn encode(&self, os: &mut BinaryOStream) {
        os.write_u32(self.type_id);
        os.write_u32(self.destination);
        os.write_u32(self.source);
        os.write_u8(self.msg_nr);
    }

    pub fn decode(is: &mut BinaryIStream<'_>) -> CodecResult<Self> {
        Ok(Self {
            type_id: is.read_u32()?,
            destination: is.read_u32()?,
            source: is.read_u32()?,
            msg_nr: is.read_u8()?,
        })
    }

    /// Read only the type id of an encoded message.
    pub fn peek_type(bytes: &[u8]) -> CodecResult<u32> {
        BinaryIStream::new(bytes).read_u32()
    }
}
