//! Schema-wide artifacts: type and address enumerations, parsers.
//!
//! Everything here needs the whole schema, so it runs after every
//! declaration was read. Enum ids follow declaration order and are framed by
//! the `Msg_NoType`/`Msg_LastType` sentinels.

use crate::artifact::Artifact;
use crate::embedded::{BASE_HEADER as EMBEDDED_BASE, MSG_TYPE};
use crate::host::{BASE_CLASS, BASE_HEADER as HOST_BASE};
use crate::render::{CommentStyle, hex_literal, preamble};
use msggen_core::naming::{enum_tag, header_guard};
use msggen_core::{OutputConfig, Registry, Representation, SchemaResult};
use tracing::debug;

pub(crate) const SHARED_ENUMS_HEADER: &str = "msg_enums.h";
pub(crate) const COMMON_TYPES_HEADER: &str = "common_types.h";

/// Hand-written type definitions shared by both trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommonTypes<'a> {
    pub types: &'a str,
    /// `BinaryOStream`/`BinaryIStream` operators for the types; host only.
    pub stream: Option<&'a str>,
}

/// Renders the registry-level files of both trees.
#[derive(Debug, Clone, Copy)]
pub struct RegistryEmitter<'c> {
    config: &'c OutputConfig,
    shared_enums: Option<&'c str>,
    common_types: Option<CommonTypes<'c>>,
}

impl<'c> RegistryEmitter<'c> {
    pub fn new(config: &'c OutputConfig) -> Self {
        Self {
            config,
            shared_enums: None,
            common_types: None,
        }
    }

    /// Contents of the hand-written enum file wrapped into `msg_enums.h`.
    pub fn with_shared_enums(mut self, contents: Option<&'c str>) -> Self {
        self.shared_enums = contents;
        self
    }

    pub fn with_common_types(mut self, common_types: Option<CommonTypes<'c>>) -> Self {
        self.common_types = common_types;
        self
    }

    /// Render every registry artifact.
    ///
    /// Fails when a dispatch table cannot be built, so no parser is ever
    /// emitted with a missing or doubled entry.
    pub fn emit(&self, registry: &Registry) -> SchemaResult<Vec<Artifact>> {
        let host_table = registry.dispatch_table(Representation::Host)?;
        let embedded_table = registry.dispatch_table(Representation::Embedded)?;
        debug!(
            host = host_table.len(),
            embedded = embedded_table.len(),
            "dispatch tables built"
        );

        let host_entries: Vec<&str> = host_table.iter().map(|e| e.name.as_str()).collect();
        let embedded_entries: Vec<&str> =
            embedded_table.iter().map(|e| e.name.as_str()).collect();
        let type_header = format!("{}.h", self.config.type_enum);
        let address_header = format!("{}.h", self.config.address_enum);

        let mut artifacts = vec![
            Artifact::new(
                Representation::Host,
                type_header.clone(),
                self.message_types(registry, Representation::Host),
            ),
            Artifact::new(
                Representation::Embedded,
                format!("inc/{type_header}"),
                self.message_types(registry, Representation::Embedded),
            ),
            Artifact::new(
                Representation::Host,
                address_header.clone(),
                self.addresses(registry, Representation::Host),
            ),
            Artifact::new(
                Representation::Embedded,
                format!("inc/{address_header}"),
                self.addresses(registry, Representation::Embedded),
            ),
            Artifact::new(Representation::Host, "Parser/Parser.h", self.host_parser_header()),
            Artifact::new(
                Representation::Host,
                "Parser/src/Parser.cpp",
                self.host_parser(&host_entries),
            ),
            Artifact::new(
                Representation::Embedded,
                "inc/Msg_Parser.h",
                self.embedded_parser_header(),
            ),
            Artifact::new(
                Representation::Embedded,
                "src/Msg_Parser.c",
                self.embedded_parser(registry, &embedded_entries),
            ),
        ];

        if let Some(contents) = self.shared_enums {
            artifacts.push(Artifact::new(
                Representation::Host,
                SHARED_ENUMS_HEADER,
                self.shared_enums_header(contents, Representation::Host),
            ));
            artifacts.push(Artifact::new(
                Representation::Embedded,
                format!("inc/{SHARED_ENUMS_HEADER}"),
                self.shared_enums_header(contents, Representation::Embedded),
            ));
        }
        if let Some(common) = self.common_types {
            artifacts.push(Artifact::new(
                Representation::Host,
                COMMON_TYPES_HEADER,
                self.common_types_header(common, Representation::Host),
            ));
            artifacts.push(Artifact::new(
                Representation::Embedded,
                format!("inc/{COMMON_TYPES_HEADER}"),
                self.common_types_header(common, Representation::Embedded),
            ));
        }
        Ok(artifacts)
    }

    fn guard(&self, name: &str, representation: Representation) -> String {
        match representation {
            Representation::Host => header_guard(&format!("{}_{name}", self.config.namespace)),
            Representation::Embedded => header_guard(name),
        }
    }

    fn open_namespace(&self, out: &mut String, representation: Representation) {
        if representation == Representation::Host {
            out.push_str(&format!("namespace {} {{\n\n", self.config.namespace));
        }
    }

    fn close_namespace(&self, out: &mut String, representation: Representation) {
        if representation == Representation::Host {
            out.push_str(&format!("}} /* namespace {} */\n\n", self.config.namespace));
        }
    }

    /// Master type enumeration plus its name table.
    pub fn message_types(&self, registry: &Registry, representation: Representation) -> String {
        let name = &self.config.type_enum;
        let guard = self.guard(name, representation);
        let names = registry.type_names();
        let mut out = preamble(self.config, &format!("{name}.h"), CommentStyle::Block);

        out.push_str(&format!("#ifndef {guard}\n#define {guard}\n\n"));
        match representation {
            Representation::Host => out.push_str("#include <vector>\n#include <string>\n\n"),
            Representation::Embedded => out.push_str("#include <stdint.h>\n\n"),
        }
        self.open_namespace(&mut out, representation);

        out.push_str(&format!("enum {name}\n{{\n"));
        for type_name in &names {
            out.push_str(&format!("\t{},\n", enum_tag(type_name)));
        }
        out.push_str("};\n");
        out.push_str(&format!("typedef enum {name} {name}_t;\n\n"));

        match representation {
            Representation::Host => {
                out.push_str(&format!("static const std::vector<std::string> {name}Str =\n{{\n"))
            }
            Representation::Embedded => {
                out.push_str(&format!("static const char* const {name}Str[] =\n{{\n"))
            }
        }
        for type_name in &names {
            out.push_str(&format!("\t\"{type_name}\",\n"));
        }
        out.push_str("};\n\n");

        self.close_namespace(&mut out, representation);
        out.push_str(&format!("#endif /* {guard} */\n"));
        out
    }

    /// Address and domain enumerations plus the address/name table.
    pub fn addresses(&self, registry: &Registry, representation: Representation) -> String {
        let name = &self.config.address_enum;
        let guard = self.guard(name, representation);
        let map = registry.addresses();
        let mut out = preamble(self.config, &format!("{name}.h"), CommentStyle::Block);

        out.push_str(&format!("#ifndef {guard}\n#define {guard}\n\n"));
        match representation {
            Representation::Host => {
                out.push_str("#include <cstdint>\n#include <map>\n#include <string>\n\n")
            }
            Representation::Embedded => out.push_str("#include <stdint.h>\n\n"),
        }
        self.open_namespace(&mut out, representation);

        // C forbids empty enumerations and empty initialiser lists.
        if !map.domains.is_empty() {
            out.push_str(&format!("enum {name}Domain\n{{\n"));
            for domain in &map.domains {
                out.push_str(&format!(
                    "\t{} = {},\n",
                    enum_tag(&domain.name),
                    hex_literal(domain.value())
                ));
            }
            out.push_str("};\n\n");
        }

        if !map.entries.is_empty() {
            out.push_str(&format!("enum {name}\n{{\n"));
            for entry in &map.entries {
                out.push_str(&format!(
                    "\t{} = {},\n",
                    enum_tag(&entry.name),
                    hex_literal(entry.address())
                ));
            }
            out.push_str("};\n");
            out.push_str(&format!("typedef enum {name} {name}_t;\n\n"));
        }

        match representation {
            Representation::Host => {
                out.push_str(&format!(
                    "static const std::map<uint32_t, std::string> {name}Str =\n{{\n"
                ));
                for entry in &map.entries {
                    out.push_str(&format!(
                        "\t{{{}, \"{}\"}},\n",
                        hex_literal(entry.address()),
                        enum_tag(&entry.name)
                    ));
                }
                out.push_str("};\n\n");
            }
            Representation::Embedded => {
                out.push_str(&format!(
                    "typedef struct\n{{\n\tuint32_t address;\n\tconst char* name;\n}}{name}Str_t;\n\n"
                ));
                out.push_str(&format!(
                    "#define {}_STR_COUNT ({})\n\n",
                    name.to_ascii_uppercase(),
                    map.entries.len()
                ));
                if !map.entries.is_empty() {
                    out.push_str(&format!("static const {name}Str_t {name}Str[] =\n{{\n"));
                    for entry in &map.entries {
                        out.push_str(&format!(
                            "\t{{{}, \"{}\"}},\n",
                            hex_literal(entry.address()),
                            enum_tag(&entry.name)
                        ));
                    }
                    out.push_str("};\n\n");
                }
            }
        }

        self.close_namespace(&mut out, representation);
        out.push_str(&format!("#endif /* {guard} */\n"));
        out
    }

    pub fn host_parser_header(&self) -> String {
        let guard = self.guard("Parser", Representation::Host);
        let mut out = preamble(self.config, "Parser.h", CommentStyle::Block);
        out.push_str(&format!("#ifndef {guard}\n#define {guard}\n\n"));
        out.push_str(&format!("#include <vector>\n#include \"{HOST_BASE}\"\n\n"));
        out.push_str(&format!("namespace {} {{\n\n", self.config.namespace));
        out.push_str("class Parser\n{\npublic:\n\tParser();\n\tvirtual ~Parser();\n\n");
        out.push_str(&format!(
            "\t{BASE_CLASS}::ptr parse(std::vector<unsigned char> data);\n"
        ));
        out.push_str("};\n\n");
        out.push_str(&format!("}} /* namespace {} */\n\n", self.config.namespace));
        out.push_str(&format!("#endif /* {guard} */\n"));
        out
    }

    /// Host parser: one `case` per host wire message.
    pub fn host_parser(&self, entries: &[&str]) -> String {
        let type_enum = format!("{}_t", self.config.type_enum);
        let mut out = preamble(self.config, "Parser.cpp", CommentStyle::Block);

        out.push_str("#include \"../Parser.h\"\n\n");
        out.push_str(&format!("#include \"{}.h\"\n", self.config.type_enum));
        for name in entries {
            out.push_str(&format!("#include \"{name}.h\"\n"));
        }
        out.push('\n');
        out.push_str(&format!("namespace {} {{\n\n", self.config.namespace));
        out.push_str("Parser::Parser()\n{\n}\n\nParser::~Parser()\n{\n}\n\n");
        out.push_str(&format!(
            "{BASE_CLASS}::ptr Parser::parse(std::vector<unsigned char> data)\n{{\n"
        ));
        out.push_str(&format!("\t{BASE_CLASS} msgBase;\n"));
        out.push_str("\tBinaryIStream is(data);\n");
        out.push_str(&format!("\t{BASE_CLASS}::ptr returnPtr;\n\n"));
        out.push_str("\tis >> msgBase;\n\tmsgBase.setSkipStreamHeader();\n");
        out.push_str("\tswitch (msgBase.getType())\n\t{\n");
        for name in entries {
            out.push_str(&format!("\tcase {type_enum}::{}:\n\t{{\n", enum_tag(name)));
            out.push_str(&format!(
                "\t\t{name}::ptr ptr = std::make_unique<{name}>(msgBase);\n"
            ));
            out.push_str("\t\tptr->setSkipStreamHeader();\n");
            out.push_str("\t\tis >> *ptr;\n");
            out.push_str("\t\treturnPtr = std::move(ptr);\n");
            out.push_str("\t\tbreak;\n\t}\n");
        }
        out.push_str("\tdefault:\n\t\tbreak;\n\t}\n");
        out.push_str("\treturn returnPtr;\n}\n\n");
        out.push_str(&format!("}} /* namespace {} */\n", self.config.namespace));
        out
    }

    pub fn embedded_parser_header(&self) -> String {
        let guard = header_guard("Msg_Parser");
        let mut out = preamble(self.config, "Msg_Parser.h", CommentStyle::Block);
        out.push_str(&format!("#ifndef {guard}\n#define {guard}\n\n"));
        out.push_str(&format!("#include <stdint.h>\n#include \"{EMBEDDED_BASE}\"\n\n"));
        out.push_str("/**\n * Decode a message of any wire type. Returns NULL for unknown\n * or internal types and for malformed input.\n */\n");
        out.push_str(&format!(
            "{MSG_TYPE}* Msg_Parse(uint8_t* buffer, uint32_t bufferLength);\n\n"
        ));
        out.push_str("/**\n * Serialize any message. Internal messages are not serializable\n * and yield NULL.\n */\n");
        out.push_str(&format!(
            "uint8_t* Msg_SerializeAny({MSG_TYPE}* msg, uint8_t* buffer, uint32_t buffer_size);\n\n"
        ));
        out.push_str(&format!("#endif /* {guard} */\n"));
        out
    }

    /// Embedded dispatcher: `Msg_Parse` over the wire table and
    /// `Msg_SerializeAny` over every embedded message.
    pub fn embedded_parser(&self, registry: &Registry, entries: &[&str]) -> String {
        let mut out = preamble(self.config, "Msg_Parser.c", CommentStyle::Block);
        out.push_str("#include \"../inc/Msg_Parser.h\"\n");
        for message in registry.messages_for(Representation::Embedded) {
            out.push_str(&format!("#include \"../inc/{}.h\"\n", message.name));
        }
        out.push('\n');

        out.push_str(&format!(
            "{MSG_TYPE}* Msg_Parse(uint8_t* buffer, uint32_t bufferLength)\n{{\n"
        ));
        out.push_str(&format!("    {MSG_TYPE} header = {{0}};\n"));
        out.push_str("    uint32_t remaining = bufferLength;\n");
        out.push_str("    if(!Msg_DeSerialize(&header, buffer, &remaining))\n    {\n        return NULL;\n    }\n\n");
        out.push_str(&format!("    {MSG_TYPE}* msgResult = NULL;\n"));
        out.push_str("    switch(header.type)\n    {\n");
        for name in entries {
            out.push_str(&format!("    case {}:\n    {{\n", enum_tag(name)));
            out.push_str(&format!(
                "        msgResult = {name}Deserialize(buffer, bufferLength);\n"
            ));
            out.push_str("        break;\n    }\n");
        }
        out.push_str("    default:\n        break;\n    }\n");
        out.push_str("    return msgResult;\n}\n\n");

        out.push_str(&format!(
            "uint8_t* Msg_SerializeAny({MSG_TYPE}* msg, uint8_t* buffer, uint32_t buffer_size)\n{{\n"
        ));
        out.push_str("    if(!msg)\n    {\n        return NULL;\n    }\n");
        out.push_str("    switch(msg->type)\n    {\n");
        for message in registry.messages_for(Representation::Embedded) {
            out.push_str(&format!("    case {}:\n", enum_tag(&message.name)));
            if message.internal {
                out.push_str("        /* Internal message: not serializable. */\n");
                out.push_str("        MSG_ASSERT(0);\n        return NULL;\n");
            } else {
                out.push_str(&format!(
                    "        return {}Serialize(msg, buffer, buffer_size);\n",
                    message.name
                ));
            }
        }
        out.push_str("    default:\n        return NULL;\n    }\n}\n");
        out
    }

    /// The configured shared enum file, guarded and namespaced.
    pub fn shared_enums_header(&self, contents: &str, representation: Representation) -> String {
        let guard = self.guard("msg_enums", representation);
        let mut out = preamble(self.config, SHARED_ENUMS_HEADER, CommentStyle::Block);
        out.push_str(&format!("#ifndef {guard}\n#define {guard}\n\n"));
        self.open_namespace(&mut out, representation);
        out.push_str(contents.trim_end());
        out.push_str("\n\n");
        self.close_namespace(&mut out, representation);
        out.push_str(&format!("#endif /* {guard} */\n"));
        out
    }

    /// The configured common types, with their stream operators in the host copy.
    pub fn common_types_header(
        &self,
        common: CommonTypes<'_>,
        representation: Representation,
    ) -> String {
        let guard = self.guard("common_types", representation);
        let mut out = preamble(self.config, COMMON_TYPES_HEADER, CommentStyle::Block);
        out.push_str(&format!("#ifndef {guard}\n#define {guard}\n\n"));
        match representation {
            Representation::Host => {
                out.push_str("#include <cstdint>\n");
                if common.stream.is_some() {
                    out.push_str(&format!("#include \"{HOST_BASE}\"\n"));
                }
            }
            Representation::Embedded => out.push_str("#include <stdint.h>\n"),
        }
        out.push('\n');
        self.open_namespace(&mut out, representation);
        out.push_str(common.types.trim_end());
        out.push_str("\n\n");
        if let (Representation::Host, Some(stream)) = (representation, common.stream) {
            out.push_str(stream.trim_end());
            out.push_str("\n\n");
        }
        self.close_namespace(&mut out, representation);
        out.push_str(&format!("#endif /* {guard} */\n"));
        out
    }
}
