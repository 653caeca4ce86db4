//! C++ class emitter for the host representation.
//!
//! One class per host-tagged message, deriving from the hand-written message
//! base. Fields stream in declaration order without length prefixes or
//! separators; owned values stream through their pointee.

use crate::artifact::Artifact;
use crate::render::{CommentStyle, preamble, user_includes};
use msggen_core::naming::{enum_tag, header_guard};
use msggen_core::{
    Field, FieldKind, MessageDescriptor, OutputConfig, OwnedCore, Representation, TEXT_TYPE,
};
use std::path::PathBuf;

pub(crate) const BASE_CLASS: &str = "QGS_ModuleMsgBase";
pub(crate) const BASE_HEADER: &str = "QGS_ModuleMsg.h";

/// Renders host classes.
#[derive(Debug, Clone, Copy)]
pub struct HostEmitter<'c> {
    config: &'c OutputConfig,
}

impl<'c> HostEmitter<'c> {
    pub fn new(config: &'c OutputConfig) -> Self {
        Self { config }
    }

    /// `<Interface>/<Name>.h` and `<Interface>/src/<Name>.cpp`.
    pub fn emit(&self, message: &MessageDescriptor) -> Vec<Artifact> {
        let dir = PathBuf::from(&message.interface);
        vec![
            Artifact::new(
                Representation::Host,
                dir.join(format!("{}.h", message.name)),
                self.header(message),
            ),
            Artifact::new(
                Representation::Host,
                dir.join("src").join(format!("{}.cpp", message.name)),
                self.source(message),
            ),
        ]
    }

    pub fn header(&self, message: &MessageDescriptor) -> String {
        let name = &message.name;
        let guard = header_guard(&format!("{}_{}", self.config.namespace, name));
        let mut out = preamble(self.config, &format!("{name}.h"), CommentStyle::Block);

        out.push_str(&format!("#ifndef {guard}\n#define {guard}\n\n"));
        out.push_str("#include <memory>\n#include <string>\n");
        out.push_str(&format!("#include \"{BASE_HEADER}\"\n"));
        out.push_str(&format!("#include \"{}.h\"\n", self.config.type_enum));
        out.push_str(&user_includes(&message.includes));
        out.push('\n');

        out.push_str(&format!("namespace {} {{\n\n", self.config.namespace));
        out.push_str(&format!("class {name}: public {BASE_CLASS}\n{{\npublic:\n"));
        out.push_str(&format!("\ttypedef std::unique_ptr<{name}> ptr;\n\n"));
        out.push_str(&format!("\t{name}({});\n", ctor_params(message)));
        out.push_str(&format!("\t{name}(const {BASE_CLASS}& base);\n"));
        out.push_str(&format!("\t{name}(const {name}& msg);\n"));
        out.push_str(&format!("\tvirtual ~{name}();\n"));

        for field in &message.fields {
            out.push('\n');
            let stem = &field.accessor;
            let ty = &field.type_name;
            match owned_core(field) {
                Some(core) => {
                    out.push_str(&format!("\t{ty} get{stem}();\n"));
                    out.push_str(&format!("\tstd::unique_ptr<{core}> getClone{stem}() const;\n"));
                    out.push_str(&format!("\tvoid set{stem}({ty} {});\n", field.name));
                }
                None => {
                    out.push_str(&format!("\t{ty} get{stem}() const;\n"));
                    out.push_str(&format!("\tvoid set{stem}(const {ty} {});\n", field.name));
                }
            }
        }

        // Internal messages never cross a wire.
        if !message.internal {
            out.push_str("\n\tvirtual BinaryOStream& stream(BinaryOStream& os) const;\n");
            out.push_str("\tvirtual BinaryIStream& stream(BinaryIStream& is);\n");
        }

        if !message.fields.is_empty() {
            out.push_str("\nprotected:\n");
            for field in &message.fields {
                out.push_str(&format!("\t{} {};\n", field.type_name, field.internal));
            }
        }
        out.push_str("};\n\n");
        out.push_str(&format!("}} /* namespace {} */\n\n", self.config.namespace));
        out.push_str(&format!("#endif /* {guard} */\n"));
        out
    }

    pub fn source(&self, message: &MessageDescriptor) -> String {
        let name = &message.name;
        let type_enum = format!("{}_t::{}", self.config.type_enum, enum_tag(name));
        let mut out = preamble(self.config, &format!("{name}.cpp"), CommentStyle::Block);

        out.push_str(&format!("#include \"../{name}.h\"\n\n"));
        out.push_str(&format!("namespace {} {{\n\n", self.config.namespace));

        // Field constructor
        out.push_str(&format!("{name}::{name}({})\n", ctor_params(message)));
        out.push_str(&format!("\t: {BASE_CLASS}({type_enum})\n"));
        for field in &message.fields {
            let value = if owned_core(field).is_some() {
                format!("std::move({})", field.name)
            } else {
                field.name.clone()
            };
            out.push_str(&format!("\t, {}({value})\n", field.internal));
        }
        out.push_str("{\n}\n\n");

        // Construction from a parsed base, fields value-initialised
        out.push_str(&format!("{name}::{name}(const {BASE_CLASS}& base)\n"));
        out.push_str(&format!("\t: {BASE_CLASS}(base)\n"));
        for field in &message.fields {
            out.push_str(&format!("\t, {}()\n", field.internal));
        }
        out.push_str("{\n}\n\n");

        // Copy constructor: owned values are deep-cloned
        out.push_str(&format!("{name}::{name}(const {name}& msg)\n"));
        out.push_str(&format!("\t: {BASE_CLASS}(msg)\n"));
        for field in &message.fields {
            let value = if owned_core(field).is_some() {
                format!("msg.getClone{}()", field.accessor)
            } else {
                format!("msg.{}", field.internal)
            };
            out.push_str(&format!("\t, {}({value})\n", field.internal));
        }
        out.push_str("{\n}\n\n");

        out.push_str(&format!("{name}::~{name}()\n{{\n}}\n"));

        for field in &message.fields {
            out.push('\n');
            out.push_str(&accessors(name, field));
        }

        if !message.internal {
            out.push_str(&stream_operators(name, message));
        }
        out.push('\n');
        out.push_str(&format!("}} /* namespace {} */\n", self.config.namespace));
        out
    }
}

fn stream_operators(class: &str, message: &MessageDescriptor) -> String {
    let mut out = format!("\nBinaryOStream& {class}::stream(BinaryOStream& os) const\n{{\n");
    out.push_str(&format!("\t{BASE_CLASS}::stream(os);\n"));
    for field in &message.fields {
        let member = &field.internal;
        match owned_core(field) {
            // A missing value streams as a default one so the framing holds.
            Some(core) => out.push_str(&format!(
                "\tif({member})\n\t{{\n\t\tos << *{member};\n\t}}\n\telse\n\t{{\n\t\tos << {core}();\n\t}}\n"
            )),
            None => out.push_str(&format!("\tos << {member};\n")),
        }
    }
    out.push_str("\treturn os;\n}\n");

    out.push_str(&format!("\nBinaryIStream& {class}::stream(BinaryIStream& is)\n{{\n"));
    out.push_str(&format!("\t{BASE_CLASS}::stream(is);\n"));
    for field in &message.fields {
        let member = &field.internal;
        match (owned_core(field), &field.kind) {
            (Some(core), _) => {
                out.push_str(&format!(
                    "\tif(!{member})\n\t{{\n\t\t{member} = std::make_unique<{core}>();\n\t}}\n"
                ));
                out.push_str(&format!("\tis >> *{member};\n"));
            }
            (None, FieldKind::Text) => {
                out.push_str(&format!("\t{member}.erase();\n"));
                out.push_str(&format!("\tis >> {member};\n"));
            }
            (None, _) => out.push_str(&format!("\tis >> {member};\n")),
        }
    }
    out.push_str("\treturn is;\n}\n");
    out
}

fn ctor_params(message: &MessageDescriptor) -> String {
    message
        .fields
        .iter()
        .map(|f| format!("{} {}", f.type_name, f.name))
        .collect::<Vec<_>>()
        .join(", ")
}

fn accessors(class: &str, field: &Field) -> String {
    let stem = &field.accessor;
    let ty = &field.type_name;
    let member = &field.internal;
    let param = &field.name;
    let mut out = String::new();

    match owned_core(field) {
        Some(core) => {
            out.push_str(&format!("{ty} {class}::get{stem}()\n{{\n"));
            out.push_str(&format!("\treturn std::move({member});\n}}\n\n"));
            out.push_str(&format!(
                "std::unique_ptr<{core}> {class}::getClone{stem}() const\n{{\n"
            ));
            out.push_str(&format!("\tif(!{member})\n\t{{\n\t\treturn nullptr;\n\t}}\n"));
            out.push_str(&format!("\treturn std::make_unique<{core}>(*{member});\n}}\n\n"));
            out.push_str(&format!("void {class}::set{stem}({ty} {param})\n{{\n"));
            out.push_str(&format!("\t{member} = std::move({param});\n}}\n"));
        }
        None => {
            out.push_str(&format!("{ty} {class}::get{stem}() const\n{{\n"));
            out.push_str(&format!("\treturn {member};\n}}\n\n"));
            out.push_str(&format!("void {class}::set{stem}(const {ty} {param})\n{{\n"));
            out.push_str(&format!("\t{member} = {param};\n}}\n"));
        }
    }
    out
}

/// Pointee type of an owned field, from its resolved core.
fn owned_core(field: &Field) -> Option<&str> {
    match &field.kind {
        FieldKind::OwnedValue(OwnedCore::Scalar(scalar)) => Some(scalar.c_name()),
        FieldKind::OwnedValue(OwnedCore::Text) => Some(TEXT_TYPE),
        FieldKind::OwnedValue(OwnedCore::Opaque(path)) => Some(path.as_str()),
        _ => None,
    }
}

#[cfg(test)]
#[path = "host/host_tests.rs"]
mod host_tests;
