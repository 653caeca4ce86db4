//! Message declaration grammar and descriptor builder.
//!
//! A declaration line reads like a small command line:
//!
//! ```text
//! Msg_Param --member uint8_t control --member std::string payload --include Foo.h
//! Msg_Tick --internal
//! ```

use clap::{ArgAction, Parser};
use msggen_core::naming::{accessor_stem, internal_name, is_identifier, title_case};
use msggen_core::{
    CompilerConfig, Field, FieldKind, Interface, MessageDescriptor, NameKind, OwnedCore,
    PhysicalField, PhysicalRole, ScalarType, SchemaError, SchemaResult, SourceLocation, TEXT_TYPE,
};
use tracing::debug;

const OWNED_PREFIX: &str = "std::unique_ptr<";

/// Raw arguments of one declaration line.
#[derive(Parser, Debug, PartialEq)]
#[command(
    name = "declaration",
    no_binary_name = true,
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct DeclarationArgs {
    /// Message name
    pub name: String,

    /// Field as `TYPE NAME`; repeatable
    #[arg(long = "member", num_args = 2, value_names = ["TYPE", "NAME"], action = ArgAction::Append)]
    pub members: Vec<String>,

    /// Header needed by the generated code; repeatable
    #[arg(long = "include", action = ArgAction::Append)]
    pub includes: Vec<String>,

    /// In-memory only message, no wire codec
    #[arg(long)]
    pub internal: bool,
}

impl DeclarationArgs {
    /// Parse a declaration line.
    pub fn parse_line(location: &SourceLocation, text: &str) -> SchemaResult<Self> {
        Self::try_parse_from(text.split_whitespace()).map_err(|err| {
            let rendered = err.to_string();
            let message = rendered
                .lines()
                .next()
                .unwrap_or_default()
                .trim_start_matches("error: ")
                .to_string();
            SchemaError::syntax(location.clone(), message)
        })
    }

    /// Declared `(type, name)` pairs in order.
    pub fn member_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.members
            .chunks_exact(2)
            .map(|pair| (pair[0].as_str(), pair[1].as_str()))
    }
}

/// Turns declaration lines into immutable [`MessageDescriptor`]s.
pub struct DescriptorBuilder<'a> {
    config: &'a CompilerConfig,
}

impl<'a> DescriptorBuilder<'a> {
    pub fn new(config: &'a CompilerConfig) -> Self {
        Self { config }
    }

    /// Build the descriptor for one declaration inside `interface`.
    pub fn build(
        &self,
        interface: &Interface,
        location: &SourceLocation,
        text: &str,
    ) -> SchemaResult<MessageDescriptor> {
        let args = DeclarationArgs::parse_line(location, text)?;

        if !is_identifier(&args.name) {
            return Err(SchemaError::syntax(
                location.clone(),
                format!("message name '{}' is not a valid identifier", args.name),
            ));
        }

        let mut fields = Vec::new();
        for (type_name, name) in args.member_pairs() {
            fields.push(self.field(location, type_name, name)?);
        }

        let physical = expand_physical(&fields);
        let descriptor = MessageDescriptor {
            name: args.name,
            interface: interface.name.clone(),
            targets: interface.targets,
            fields,
            physical,
            includes: args.includes,
            internal: args.internal,
            location: location.clone(),
        };
        validate(&descriptor)?;

        debug!(
            message = %descriptor.name,
            interface = %descriptor.interface,
            fields = descriptor.fields.len(),
            internal = descriptor.internal,
            "built descriptor"
        );
        Ok(descriptor)
    }

    fn field(&self, location: &SourceLocation, type_name: &str, name: &str) -> SchemaResult<Field> {
        if !is_identifier(name) {
            return Err(SchemaError::syntax(
                location.clone(),
                format!("field name '{name}' is not a valid identifier"),
            ));
        }
        let kind = self.resolve_kind(type_name).ok_or_else(|| {
            SchemaError::syntax(
                location.clone(),
                format!("unknown type '{type_name}' for field '{name}'"),
            )
        })?;

        Ok(Field {
            name: name.to_string(),
            type_name: type_name.to_string(),
            kind,
            internal: internal_name(name),
            accessor: accessor_stem(name),
        })
    }

    /// Resolve a declared type to its field kind. Text is matched exactly.
    fn resolve_kind(&self, type_name: &str) -> Option<FieldKind> {
        if type_name == TEXT_TYPE {
            return Some(FieldKind::Text);
        }
        if let Some(inner) = type_name
            .strip_prefix(OWNED_PREFIX)
            .and_then(|rest| rest.strip_suffix('>'))
        {
            let core = if inner == TEXT_TYPE {
                OwnedCore::Text
            } else if let Some(scalar) = self.config.resolve_scalar(inner) {
                OwnedCore::Scalar(scalar)
            } else if is_type_path(inner) {
                OwnedCore::Opaque(inner.to_string())
            } else {
                return None;
            };
            return Some(FieldKind::OwnedValue(core));
        }
        self.config.resolve_scalar(type_name).map(FieldKind::Scalar)
    }
}

/// `Foo`, `ns::Foo`: identifiers joined by `::`.
fn is_type_path(s: &str) -> bool {
    s.split("::").all(is_identifier)
}

/// Embedded record layout: scalars stay, each text field becomes the
/// payload, length and capacity triplet, in that order.
fn expand_physical(fields: &[Field]) -> Vec<PhysicalField> {
    let mut physical = Vec::new();
    for (source, field) in fields.iter().enumerate() {
        match &field.kind {
            FieldKind::Scalar(scalar) => physical.push(PhysicalField {
                role: PhysicalRole::Value,
                source,
                name: field.name.clone(),
                internal: field.internal.clone(),
                accessor: field.accessor.clone(),
                c_type: scalar.c_name().to_string(),
                scalar: Some(*scalar),
            }),
            FieldKind::Text => {
                let stem = title_case(&field.name);
                physical.push(PhysicalField {
                    role: PhysicalRole::Payload,
                    source,
                    name: field.name.clone(),
                    internal: field.internal.clone(),
                    accessor: field.accessor.clone(),
                    c_type: "uint8_t*".to_string(),
                    scalar: None,
                });
                for (role, suffix) in [
                    (PhysicalRole::PayloadLength, "length"),
                    (PhysicalRole::BufferCapacity, "bufferlength"),
                ] {
                    let name = format!("{stem}{suffix}");
                    physical.push(PhysicalField {
                        role,
                        source,
                        internal: internal_name(&name),
                        accessor: accessor_stem(&name),
                        name,
                        c_type: ScalarType::U32.c_name().to_string(),
                        scalar: Some(ScalarType::U32),
                    });
                }
            }
            FieldKind::OwnedValue(_) => {}
        }
    }
    physical
}

fn validate(descriptor: &MessageDescriptor) -> SchemaResult<()> {
    let location = &descriptor.location;

    let mut seen: Vec<&str> = Vec::new();
    let internals = descriptor
        .fields
        .iter()
        .map(|f| f.internal.as_str())
        .chain(
            descriptor
                .physical
                .iter()
                .filter(|p| {
                    descriptor.targets.embedded
                        && matches!(
                            p.role,
                            PhysicalRole::PayloadLength | PhysicalRole::BufferCapacity
                        )
                })
                .map(|p| p.internal.as_str()),
        );
    for internal in internals {
        if seen.contains(&internal) {
            return Err(SchemaError::DuplicateName {
                location: location.clone(),
                kind: NameKind::Field,
                name: internal.to_string(),
                first: location.clone(),
            });
        }
        seen.push(internal);
    }

    if descriptor.targets.embedded {
        if let Some(field) = descriptor
            .fields
            .iter()
            .find(|f| matches!(f.kind, FieldKind::OwnedValue(_)))
        {
            return Err(SchemaError::syntax(
                location.clone(),
                format!(
                    "field '{}' of type '{}' cannot be carried by embedded interface '{}'",
                    field.name, field.type_name, descriptor.interface
                ),
            ));
        }
    }

    if descriptor.targets.host {
        let last = descriptor.fields.len().saturating_sub(1);
        if let Some((_, field)) = descriptor
            .fields
            .iter()
            .enumerate()
            .find(|(index, f)| f.kind.is_stream_delimited() && *index != last)
        {
            return Err(SchemaError::syntax(
                location.clone(),
                format!(
                    "field '{}' is read to the end of the host stream and must be declared last",
                    field.name
                ),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "declaration/declaration_tests.rs"]
mod declaration_tests;
