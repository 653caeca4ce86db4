//! Schema data model shared by the reader, the emitters and the runtime codecs.
//!
//! # Structure
//!
//! - [`Interface`]: a named group of messages carrying target flags
//! - [`MessageDescriptor`]: one declared message, immutable once built
//! - [`Field`]: a declared field, resolved to a [`FieldKind`] tag
//! - [`PhysicalField`]: the embedded view of a field after text expansion
//! - [`AddressMap`]: domains and entries produced by the address allocator

use crate::config::TargetConfig;
use crate::error::SourceLocation;
use std::fmt;

/// The only type name that is expanded as a text field.
pub const TEXT_TYPE: &str = "std::string";

/// One of the two emitted runtime representations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Representation {
    /// Ground-station side: owned values, stream encoding.
    Host,
    /// Firmware side: flat records, length-prefixed encoding.
    Embedded,
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Representation::Host => write!(f, "host"),
            Representation::Embedded => write!(f, "embedded"),
        }
    }
}

/// Target flags of an interface, derived from its name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Targets {
    pub host: bool,
    pub embedded: bool,
}

impl Targets {
    /// Derive the flags from the configured infixes. Both may match.
    pub fn from_interface_name(name: &str, config: &TargetConfig) -> Self {
        Self {
            host: name.contains(&config.host_infix),
            embedded: name.contains(&config.embedded_infix),
        }
    }

    pub fn includes(self, representation: Representation) -> bool {
        match representation {
            Representation::Host => self.host,
            Representation::Embedded => self.embedded,
        }
    }
}

/// A named grouping of message declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct Interface {
    pub name: String,
    pub targets: Targets,
    pub location: SourceLocation,
    /// Names of the messages declared while this interface was open.
    pub messages: Vec<String>,
}

impl Interface {
    pub fn new(name: impl Into<String>, targets: Targets, location: SourceLocation) -> Self {
        Self {
            name: name.into(),
            targets,
            location,
            messages: Vec::new(),
        }
    }
}

/// Primitive numeric types understood by both representations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    Bool,
}

impl ScalarType {
    pub const ALL: [ScalarType; 11] = [
        ScalarType::U8,
        ScalarType::U16,
        ScalarType::U32,
        ScalarType::U64,
        ScalarType::I8,
        ScalarType::I16,
        ScalarType::I32,
        ScalarType::I64,
        ScalarType::F32,
        ScalarType::F64,
        ScalarType::Bool,
    ];

    /// Resolve a C type name such as `uint16_t`.
    pub fn from_c_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.c_name() == name)
    }

    pub fn c_name(self) -> &'static str {
        match self {
            ScalarType::U8 => "uint8_t",
            ScalarType::U16 => "uint16_t",
            ScalarType::U32 => "uint32_t",
            ScalarType::U64 => "uint64_t",
            ScalarType::I8 => "int8_t",
            ScalarType::I16 => "int16_t",
            ScalarType::I32 => "int32_t",
            ScalarType::I64 => "int64_t",
            ScalarType::F32 => "float",
            ScalarType::F64 => "double",
            ScalarType::Bool => "bool",
        }
    }

    /// Natural binary width on the wire, in bytes.
    pub fn width(self) -> usize {
        match self {
            ScalarType::U8 | ScalarType::I8 | ScalarType::Bool => 1,
            ScalarType::U16 | ScalarType::I16 => 2,
            ScalarType::U32 | ScalarType::I32 | ScalarType::F32 => 4,
            ScalarType::U64 | ScalarType::I64 | ScalarType::F64 => 8,
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.c_name())
    }
}

/// Core type behind an exclusively-owned heap value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnedCore {
    Scalar(ScalarType),
    Text,
    /// A host type the compiler does not look into; streamed by its own operators.
    Opaque(String),
}

/// Semantic type tag of a declared field, resolved once by the builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Scalar(ScalarType),
    Text,
    OwnedValue(OwnedCore),
}

impl FieldKind {
    /// True when the host stream frames this field by reading to the end of the message.
    pub fn is_stream_delimited(&self) -> bool {
        match self {
            FieldKind::Scalar(_) => false,
            FieldKind::Text => true,
            FieldKind::OwnedValue(core) => !matches!(core, OwnedCore::Scalar(_)),
        }
    }
}

/// A field as declared in the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Declared name, used for constructor parameters.
    pub name: String,
    /// Declared type text, e.g. `uint8_t`, an alias, or `std::unique_ptr<Foo>`.
    pub type_name: String,
    pub kind: FieldKind,
    /// Member identifier inside generated code (`mPayload`).
    pub internal: String,
    /// Accessor stem (`Payload` for `getPayload`/`setPayload`).
    pub accessor: String,
}

/// Role of a physical slot in the embedded record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhysicalRole {
    /// A scalar field stored inline.
    Value,
    /// Pointer into the trailing buffer.
    Payload,
    /// Number of valid bytes in the payload.
    PayloadLength,
    /// Size of the payload's trailing buffer region.
    BufferCapacity,
}

/// One slot of the embedded record after text expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhysicalField {
    pub role: PhysicalRole,
    /// Index of the declared field this slot came from.
    pub source: usize,
    /// Parameter / declared-style name (`payloadlength`).
    pub name: String,
    pub internal: String,
    pub accessor: String,
    /// C type of the slot.
    pub c_type: String,
    /// Scalar type of value and counter slots; `None` for payload pointers.
    pub scalar: Option<ScalarType>,
}

impl PhysicalField {
    /// Whether `Create` takes this slot as an argument.
    pub fn is_create_arg(&self) -> bool {
        matches!(self.role, PhysicalRole::Value | PhysicalRole::BufferCapacity)
    }
}

/// A fully built, immutable message declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageDescriptor {
    pub name: String,
    pub interface: String,
    pub targets: Targets,
    pub fields: Vec<Field>,
    /// Embedded record layout: every text field expanded to payload, length, capacity.
    pub physical: Vec<PhysicalField>,
    pub includes: Vec<String>,
    pub internal: bool,
    pub location: SourceLocation,
}

impl MessageDescriptor {
    /// Whether a wire codec exists for this message in `representation`.
    pub fn is_wire(&self, representation: Representation) -> bool {
        self.targets.includes(representation) && !self.internal
    }

    pub fn field(&self, name: &str) -> Option<(usize, &Field)> {
        self.fields.iter().enumerate().find(|(_, f)| f.name == name)
    }

    /// Declared fields serialized in the fixed section of the embedded encoding.
    pub fn fixed_fields(&self) -> impl Iterator<Item = (usize, &Field)> {
        self.fields
            .iter()
            .enumerate()
            .filter(|(_, f)| matches!(f.kind, FieldKind::Scalar(_)))
    }

    /// Declared text fields, in declaration order.
    pub fn text_fields(&self) -> impl Iterator<Item = (usize, &Field)> {
        self.fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.kind == FieldKind::Text)
    }

    pub fn has_owned_values(&self) -> bool {
        self.fields
            .iter()
            .any(|f| matches!(f.kind, FieldKind::OwnedValue(_)))
    }

    /// Physical slots generated for the declared field at `source`.
    pub fn physical_for(&self, source: usize) -> impl Iterator<Item = &PhysicalField> {
        self.physical.iter().filter(move |p| p.source == source)
    }
}

/// A region marker in the address schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    pub name: String,
    pub region: u8,
    pub location: SourceLocation,
}

impl Domain {
    pub fn value(&self) -> u16 {
        u16::from(self.region) << 8
    }
}

/// One allocated address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressEntry {
    pub name: String,
    pub region: u8,
    pub index: u8,
    pub location: SourceLocation,
}

impl AddressEntry {
    pub fn address(&self) -> u16 {
        (u16::from(self.region) << 8) | u16::from(self.index)
    }
}

/// Output of the address allocator, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressMap {
    pub domains: Vec<Domain>,
    pub entries: Vec<AddressEntry>,
}

impl AddressMap {
    pub fn entry(&self, name: &str) -> Option<&AddressEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn domain(&self, name: &str) -> Option<&Domain> {
        self.domains.iter().find(|d| d.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty() && self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "model/model_tests.rs"]
mod model_tests;
