//! C record emitter for the embedded representation.
//!
//! Each message becomes a record placed directly after the common
//! `moduleMsg_t` header, followed by one trailing buffer holding every text
//! payload back to back. `Create` sizes that buffer once from the capacity
//! arguments; nothing reallocates it afterwards.
//!
//! Wire layout produced by `<Name>Serialize`: the common header, the fixed
//! fields in declaration order at natural width, then every text field as a
//! `uint32_t` length followed by at most `capacity` bytes.

use crate::artifact::Artifact;
use crate::render::{CommentStyle, preamble, user_includes};
use msggen_core::naming::{enum_tag, header_guard};
use msggen_core::{MessageDescriptor, OutputConfig, PhysicalField, PhysicalRole, Representation};

pub(crate) const BASE_HEADER: &str = "message_base.h";
pub(crate) const MSG_TYPE: &str = "moduleMsg_t";

const LENGTH_PREFIX: usize = 4;

/// Renders embedded records.
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedEmitter<'c> {
    config: &'c OutputConfig,
}

impl<'c> EmbeddedEmitter<'c> {
    pub fn new(config: &'c OutputConfig) -> Self {
        Self { config }
    }

    /// `inc/<Name>.h` and `src/<Name>.c`.
    pub fn emit(&self, message: &MessageDescriptor) -> Vec<Artifact> {
        vec![
            Artifact::new(
                Representation::Embedded,
                format!("inc/{}.h", message.name),
                self.header(message),
            ),
            Artifact::new(
                Representation::Embedded,
                format!("src/{}.c", message.name),
                self.source(message),
            ),
        ]
    }

    pub fn header(&self, message: &MessageDescriptor) -> String {
        let name = &message.name;
        let guard = header_guard(name);
        let mut out = preamble(self.config, &format!("{name}.h"), CommentStyle::Block);

        out.push_str(&format!("#ifndef {guard}\n#define {guard}\n\n"));
        out.push_str("#include <stdint.h>\n");
        out.push_str(&format!("#include \"{BASE_HEADER}\"\n"));
        out.push_str(&format!("#include \"{}.h\"\n", self.config.address_enum));
        if self.config.shared_enums.is_some() {
            out.push_str("#include \"msg_enums.h\"\n");
        }
        out.push_str(&user_includes(&message.includes));
        out.push('\n');

        out.push_str(&format!("{};\n\n", create_signature(message)));
        for field in &message.physical {
            out.push_str(&format!("{};\n\n", getter_signature(name, field)));
            out.push_str(&format!("{};\n\n", setter_signature(name, field)));
        }

        if !message.internal {
            out.push_str(&format!("{};\n\n", serialize_signature(name)));
            out.push_str(&format!("{};\n\n", deserialize_signature(name)));
            out.push_str(&format!("{};\n\n", size_signature(name)));
        }

        out.push_str(&format!("#endif /* {guard} */\n"));
        out
    }

    pub fn source(&self, message: &MessageDescriptor) -> String {
        let name = &message.name;
        let mut out = preamble(self.config, &format!("{name}.c"), CommentStyle::Block);

        out.push_str(&format!("#include \"../inc/{name}.h\"\n"));
        out.push_str("#include <string.h>\n\n");

        if !message.physical.is_empty() {
            out.push_str("typedef struct\n{\n");
            for field in &message.physical {
                out.push_str(&format!("    {} {};\n", field.c_type, field.internal));
            }
            out.push_str(&format!("}}{};\n\n", record_type(name)));
        }

        out.push_str(&self.create(message));
        for field in &message.physical {
            out.push('\n');
            out.push_str(&getter(message, field));
            out.push('\n');
            out.push_str(&setter(message, field));
        }

        if !message.internal {
            out.push('\n');
            out.push_str(&serialize(message));
            out.push('\n');
            out.push_str(&deserialize(message));
            out.push('\n');
            out.push_str(&message_size(message));
        }
        out
    }

    fn create(&self, message: &MessageDescriptor) -> String {
        let name = &message.name;
        let record = record_type(name);
        let has_texts = message.text_fields().next().is_some();
        let capacities: String = capacity_slots(message)
            .map(|p| format!(" + ({})", p.name))
            .collect();
        let mut out = format!("{}\n{{\n", create_signature(message));

        if message.physical.is_empty() {
            out.push_str(&format!("    size_t size = sizeof({MSG_TYPE});\n"));
        } else {
            out.push_str(&format!(
                "    size_t size = sizeof({MSG_TYPE}) + sizeof({record}){capacities};\n"
            ));
        }
        out.push_str(&format!("    {MSG_TYPE}* msg = MSG_MALLOC(size);\n\n"));
        out.push_str("    if(msg)\n    {\n");
        out.push_str("        msg->mDestination = destination;\n");
        out.push_str("        msg->mSource = 0;\n");
        out.push_str("        msg->mMsgNr = msgNr;\n");
        out.push_str(&format!("        msg->type = {};\n", enum_tag(name)));
        out.push_str("        msg->mAllocatedSize = size;\n");

        if !message.physical.is_empty() {
            out.push_str(&format!(
                "\n        {record}* internal_data = ({record}*)(msg + 1);\n"
            ));
            if has_texts {
                out.push_str("        uint8_t* trailing = (uint8_t*)(internal_data + 1);\n");
            }
            for field in &message.physical {
                let member = &field.internal;
                match field.role {
                    PhysicalRole::Value | PhysicalRole::BufferCapacity => out.push_str(&format!(
                        "        internal_data->{member} = {};\n",
                        field.name
                    )),
                    PhysicalRole::PayloadLength => {
                        out.push_str(&format!("        internal_data->{member} = 0;\n"))
                    }
                    PhysicalRole::Payload => {
                        out.push_str(&format!("        internal_data->{member} = trailing;\n"));
                        if let Some(capacity) = capacity_of(message, field.source) {
                            out.push_str(&format!("        trailing += {};\n", capacity.name));
                        }
                    }
                }
            }
        }
        out.push_str("    }\n    return msg;\n}\n");
        out
    }
}

fn record_type(name: &str) -> String {
    format!("{name}_t")
}

fn create_signature(message: &MessageDescriptor) -> String {
    let mut params = vec!["uint32_t destination".to_string(), "uint8_t msgNr".to_string()];
    params.extend(
        message
            .physical
            .iter()
            .filter(|p| p.is_create_arg())
            .map(|p| format!("{} {}", p.c_type, p.name)),
    );
    format!("{MSG_TYPE}* {}Create({})", message.name, params.join(", "))
}

fn getter_signature(name: &str, field: &PhysicalField) -> String {
    format!("{} {name}Get{}({MSG_TYPE}* msg)", field.c_type, field.accessor)
}

fn setter_signature(name: &str, field: &PhysicalField) -> String {
    match field.role {
        PhysicalRole::Payload => format!(
            "void {name}Set{}({MSG_TYPE}* msg, const uint8_t* {}, uint32_t length)",
            field.accessor, field.name
        ),
        _ => format!(
            "void {name}Set{}({MSG_TYPE}* msg, {} {})",
            field.accessor, field.c_type, field.name
        ),
    }
}

fn serialize_signature(name: &str) -> String {
    format!("uint8_t* {name}Serialize({MSG_TYPE}* msg, uint8_t* buffer, uint32_t buffer_size)")
}

fn deserialize_signature(name: &str) -> String {
    format!("{MSG_TYPE}* {name}Deserialize(uint8_t* buffer, uint32_t buffer_size)")
}

fn size_signature(name: &str) -> String {
    format!("uint32_t {name}GetMessageSize({MSG_TYPE}* msg)")
}

fn capacity_slots(message: &MessageDescriptor) -> impl Iterator<Item = &PhysicalField> {
    message
        .physical
        .iter()
        .filter(|p| p.role == PhysicalRole::BufferCapacity)
}

fn slot_of(message: &MessageDescriptor, source: usize, role: PhysicalRole) -> Option<&PhysicalField> {
    message.physical_for(source).find(|p| p.role == role)
}

fn capacity_of(message: &MessageDescriptor, source: usize) -> Option<&PhysicalField> {
    slot_of(message, source, PhysicalRole::BufferCapacity)
}

fn length_of(message: &MessageDescriptor, source: usize) -> Option<&PhysicalField> {
    slot_of(message, source, PhysicalRole::PayloadLength)
}

/// Body wrapper shared by every accessor: type check, record lookup.
fn guarded(message: &MessageDescriptor, body: &str) -> String {
    let record = record_type(&message.name);
    let mut out = format!("    if(msg && (msg->type == {}))\n    {{\n", enum_tag(&message.name));
    out.push_str(&format!(
        "        {record}* internal_data = ({record}*)(msg + 1);\n"
    ));
    out.push_str(body);
    out.push_str("    }\n    else\n    {\n        MSG_ASSERT(0);\n    }\n");
    out
}

fn getter(message: &MessageDescriptor, field: &PhysicalField) -> String {
    let mut out = format!("{}\n{{\n", getter_signature(&message.name, field));
    out.push_str(&format!("    {} value = {{0}};\n", field.c_type));
    out.push_str(&guarded(
        message,
        &format!("        value = internal_data->{};\n", field.internal),
    ));
    out.push_str("    return value;\n}\n");
    out
}

fn setter(message: &MessageDescriptor, field: &PhysicalField) -> String {
    let member = &field.internal;
    let param = &field.name;
    let body = match field.role {
        PhysicalRole::Value => format!("        internal_data->{member} = {param};\n"),
        PhysicalRole::Payload => {
            let length = length_of(message, field.source).map(|p| p.internal.as_str());
            let capacity = capacity_of(message, field.source).map(|p| p.internal.as_str());
            match (length, capacity) {
                (Some(length), Some(capacity)) => format!(
                    "        if(length > internal_data->{capacity})\n        {{\n            MSG_ASSERT(0);\n            return;\n        }}\n        memcpy(internal_data->{member}, {param}, length);\n        internal_data->{length} = length;\n"
                ),
                _ => String::new(),
            }
        }
        PhysicalRole::PayloadLength => {
            let capacity = capacity_of(message, field.source)
                .map(|p| p.internal.as_str())
                .unwrap_or_default();
            format!(
                "        if({param} > internal_data->{capacity})\n        {{\n            MSG_ASSERT(0);\n            return;\n        }}\n        internal_data->{member} = {param};\n"
            )
        }
        PhysicalRole::BufferCapacity => format!(
            "        /* Fixed by Create: the trailing buffer is never resized. */\n        (void){param};\n        (void)internal_data;\n        MSG_ASSERT(0);\n"
        ),
    };

    let mut out = format!("{}\n{{\n", setter_signature(&message.name, field));
    out.push_str(&guarded(message, &body));
    out.push_str("}\n");
    out
}

fn serialize(message: &MessageDescriptor) -> String {
    let name = &message.name;
    let record = record_type(name);
    let mut out = format!("{}\n{{\n", serialize_signature(name));
    out.push_str(&format!(
        "    if(!msg || (msg->type != {}))\n    {{\n        return NULL;\n    }}\n",
        enum_tag(name)
    ));
    out.push_str("    buffer = Msg_Serialize(msg, buffer, &buffer_size);\n");

    if !message.physical.is_empty() {
        out.push_str(&format!("    {record}* data = ({record}*)(msg + 1);\n"));
        for (source, _) in message.fixed_fields() {
            if let Some(slot) = slot_of(message, source, PhysicalRole::Value) {
                out.push_str(&format!(
                    "    buffer = serialize_{}(buffer, &buffer_size, &data->{});\n",
                    slot.c_type, slot.internal
                ));
            }
        }
        for (source, _) in message.text_fields() {
            let (Some(payload), Some(length), Some(capacity)) = (
                slot_of(message, source, PhysicalRole::Payload),
                length_of(message, source),
                capacity_of(message, source),
            ) else {
                continue;
            };
            out.push_str(&format!(
                "    buffer = serialize_string(buffer, &buffer_size, data->{}, MSG_MIN(data->{}, data->{}));\n",
                payload.internal, length.internal, capacity.internal
            ));
        }
    }
    out.push_str("    return buffer;\n}\n");
    out
}

fn deserialize(message: &MessageDescriptor) -> String {
    let name = &message.name;
    let record = record_type(name);
    let has_texts = message.text_fields().next().is_some();
    let mut out = format!("{}\n{{\n", deserialize_signature(name));

    if message.physical.is_empty() {
        out.push_str(&format!("    size_t size = sizeof({MSG_TYPE});\n"));
    } else {
        out.push_str(&format!(
            "    size_t size = sizeof({MSG_TYPE}) + sizeof({record}) + buffer_size;\n"
        ));
    }
    out.push_str(&format!("    {MSG_TYPE}* msg = MSG_MALLOC(size);\n"));
    out.push_str("    if(!msg)\n    {\n        return NULL;\n    }\n");
    out.push_str("    msg->mAllocatedSize = size;\n");
    out.push_str("    buffer = Msg_DeSerialize(msg, buffer, &buffer_size);\n");

    if !message.physical.is_empty() {
        out.push_str(&format!("    {record}* data = ({record}*)(msg + 1);\n"));
        if has_texts {
            out.push_str("    uint8_t* trailing = (uint8_t*)(data + 1);\n");
            out.push_str("    uint32_t trailing_size = buffer_size;\n");
        }
        for (source, _) in message.fixed_fields() {
            if let Some(slot) = slot_of(message, source, PhysicalRole::Value) {
                out.push_str(&format!(
                    "    buffer = deserialize_{}(buffer, &buffer_size, &data->{});\n",
                    slot.c_type, slot.internal
                ));
            }
        }
        for (source, _) in message.text_fields() {
            let (Some(payload), Some(length), Some(capacity)) = (
                slot_of(message, source, PhysicalRole::Payload),
                length_of(message, source),
                capacity_of(message, source),
            ) else {
                continue;
            };
            out.push_str(&format!("    data->{} = trailing;\n", payload.internal));
            out.push_str(&format!(
                "    buffer = deserialize_string(buffer, &buffer_size, data->{}, &data->{}, trailing_size);\n",
                payload.internal, length.internal
            ));
            out.push_str(&format!(
                "    data->{} = data->{};\n",
                capacity.internal, length.internal
            ));
            out.push_str(&format!("    trailing += data->{};\n", length.internal));
            out.push_str(&format!("    trailing_size -= data->{};\n", length.internal));
        }
    }

    out.push_str(&format!(
        "    if(!buffer || (msg->type != {}))\n    {{\n        MSG_FREE(msg);\n        return NULL;\n    }}\n",
        enum_tag(name)
    ));
    out.push_str("    return msg;\n}\n");
    out
}

/// Natural wire width of the fixed section.
fn fixed_width(message: &MessageDescriptor) -> usize {
    message
        .physical
        .iter()
        .filter(|p| p.role == PhysicalRole::Value)
        .filter_map(|p| p.scalar)
        .map(|s| s.width())
        .sum()
}

fn message_size(message: &MessageDescriptor) -> String {
    let name = &message.name;
    let record = record_type(name);
    let mut out = format!("{}\n{{\n", size_signature(name));
    out.push_str(&format!(
        "    uint32_t size = MSG_HEADER_SIZE + {};\n",
        fixed_width(message)
    ));

    let capacities: Vec<_> = capacity_slots(message).collect();
    if !capacities.is_empty() {
        out.push_str(&format!(
            "    if(msg && (msg->type == {}))\n    {{\n",
            enum_tag(name)
        ));
        out.push_str(&format!("        {record}* data = ({record}*)(msg + 1);\n"));
        for capacity in capacities {
            out.push_str(&format!(
                "        size += {LENGTH_PREFIX} + data->{};\n",
                capacity.internal
            ));
        }
        out.push_str("    }\n");
    } else {
        out.push_str("    (void)msg;\n");
    }
    out.push_str("    return size;\n}\n");
    out
}
