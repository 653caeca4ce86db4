//! msggen-core - Schema model, registry and error types
//!
//! This crate provides the foundational types shared by every msggen stage:
//! - [`MessageDescriptor`] and [`Field`] describing one declared message
//! - [`AddressMap`] with the two-level address allocation
//! - [`Registry`] aggregating the whole schema in declaration order
//! - [`CompilerConfig`] loaded from `msggen.toml`
//! - [`SchemaError`] for everything that can abort a run

mod config;
mod error;
mod model;
pub mod naming;
mod registry;

pub use config::{CompilerConfig, OutputConfig, SyntaxConfig, TargetConfig};
pub use error::{ConfigError, NameKind, SchemaError, SchemaResult, SourceLocation};
pub use model::{
    AddressEntry, AddressMap, Domain, Field, FieldKind, Interface, MessageDescriptor, OwnedCore,
    PhysicalField, PhysicalRole, Representation, ScalarType, Targets, TEXT_TYPE,
};
pub use registry::{DispatchEntry, LAST_TYPE, NO_TYPE, Registry};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        AddressMap, CompilerConfig, Field, FieldKind, MessageDescriptor, Registry,
        Representation, ScalarType, SchemaError, SchemaResult, SourceLocation, Targets,
    };
}
