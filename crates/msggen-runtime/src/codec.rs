//! Shared behaviour of runtime messages

use crate::error::CodecResult;
use crate::header::MessageHeader;
use msggen_core::MessageDescriptor;

/// A message instance that can be put on the wire.
pub trait WireMessage {
    /// The declaration this instance was built from.
    fn descriptor(&self) -> &MessageDescriptor;

    fn header(&self) -> &MessageHeader;

    /// Serialize header and fields. Internal messages fail with `NotSerializable`.
    fn encode(&self) -> CodecResult<Vec<u8>>;

    fn name(&self) -> &str {
        &self.descriptor().name
    }
}
