//! msggen-runtime - Reference codecs for generated messages
//!
//! The C++ and C emitted by msggen encode messages in two ways. This crate
//! implements both in Rust, driven by the same [`MessageDescriptor`]s, so the
//! wire layout can be exercised without a C toolchain:
//! - [`HostMessage`] mirrors the generated C++ classes and stream operators
//! - [`EmbeddedRecord`] mirrors the generated C records with one trailing buffer
//! - [`Dispatcher`] and [`HostParser`] mirror the generated parsers
//!
//! [`MessageDescriptor`]: msggen_core::MessageDescriptor

mod codec;
mod dispatch;
mod embedded;
mod error;
mod header;
mod host;
mod stream;
mod value;

pub use codec::WireMessage;
pub use dispatch::{Dispatcher, HostParser};
pub use embedded::EmbeddedRecord;
pub use error::{CodecError, CodecResult};
pub use header::{HEADER_SIZE, MessageHeader};
pub use host::HostMessage;
pub use stream::{BinaryIStream, BinaryOStream};
pub use value::Value;
