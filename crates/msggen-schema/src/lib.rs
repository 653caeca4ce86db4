//! msggen-schema - Reading message and address schemas
//!
//! - [`SchemaReader`] turns schema text into [`Directive`]s
//! - [`DescriptorBuilder`] turns one declaration into a message descriptor
//! - [`AddressAllocator`] assigns region/index addresses
//! - [`CompilerContext`] runs the whole pipeline into a registry

mod address;
mod compiler;
mod declaration;
mod reader;

pub use address::AddressAllocator;
pub use compiler::{CompilerContext, SchemaSource};
pub use declaration::{DeclarationArgs, DescriptorBuilder};
pub use reader::{Directive, Line, SchemaReader};
