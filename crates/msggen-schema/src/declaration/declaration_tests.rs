#![allow(non_snake_case)]

use super::*;
use msggen_core::Targets;
use test_case::test_case;

fn loc() -> SourceLocation {
    SourceLocation::new("messages.txt", 4)
}

fn interface(host: bool, embedded: bool) -> Interface {
    Interface::new("GS_FC_Control", Targets { host, embedded }, loc())
}

fn build(text: &str) -> SchemaResult<MessageDescriptor> {
    let config = CompilerConfig::default();
    DescriptorBuilder::new(&config).build(&interface(true, true), &loc(), text)
}

fn build_for(targets: (bool, bool), text: &str) -> SchemaResult<MessageDescriptor> {
    let config = CompilerConfig::default();
    DescriptorBuilder::new(&config).build(&interface(targets.0, targets.1), &loc(), text)
}

#[test]
fn DeclarationArgs___parse_line___collects_members_and_includes() {
    let args = DeclarationArgs::parse_line(
        &loc(),
        "Msg_Param --member uint8_t control --include a.h --member uint16_t value --internal",
    )
    .unwrap();

    assert_eq!(args.name, "Msg_Param");
    assert_eq!(
        args.member_pairs().collect::<Vec<_>>(),
        vec![("uint8_t", "control"), ("uint16_t", "value")]
    );
    assert_eq!(args.includes, vec!["a.h".to_string()]);
    assert!(args.internal);
}

#[test_case("--member uint8_t control" ; "missing name")]
#[test_case("Msg_Param --member uint8_t" ; "member with one value")]
#[test_case("Msg_Param --bogus" ; "unknown flag")]
#[test_case("Msg_Param Extra" ; "second positional")]
#[test_case("Msg_Param --internal --internal" ; "repeated flag")]
fn DeclarationArgs___malformed___is_syntax_error(text: &str) {
    let result = DeclarationArgs::parse_line(&loc(), text);

    match result {
        Err(SchemaError::Syntax { location, message }) => {
            assert_eq!(location, loc());
            assert!(!message.is_empty());
            assert!(!message.contains('\n'));
        }
        other => panic!("expected syntax error, got {other:?}"),
    }
}

#[test]
fn DescriptorBuilder___signal___has_no_fields() {
    let descriptor = build("Msg_Stop").unwrap();

    assert_eq!(descriptor.name, "Msg_Stop");
    assert!(descriptor.fields.is_empty());
    assert!(descriptor.physical.is_empty());
    assert_eq!(descriptor.targets, Targets { host: true, embedded: true });
    assert_eq!(descriptor.interface, "GS_FC_Control");
}

#[test]
fn DescriptorBuilder___field___normalises_names() {
    let descriptor = build("Msg_Param --member uint8_t sequenceNr").unwrap();

    let field = &descriptor.fields[0];
    assert_eq!(field.name, "sequenceNr");
    assert_eq!(field.internal, "mSequencenr");
    assert_eq!(field.accessor, "Sequencenr");
    assert_eq!(field.kind, FieldKind::Scalar(ScalarType::U8));
}

#[test]
fn DescriptorBuilder___text_field___expands_to_payload_length_capacity() {
    let descriptor =
        build("Msg_Param --member uint8_t control --member std::string payload").unwrap();

    let roles: Vec<_> = descriptor.physical.iter().map(|p| p.role).collect();
    let names: Vec<_> = descriptor
        .physical
        .iter()
        .map(|p| p.internal.as_str())
        .collect();
    assert_eq!(
        roles,
        vec![
            PhysicalRole::Value,
            PhysicalRole::Payload,
            PhysicalRole::PayloadLength,
            PhysicalRole::BufferCapacity,
        ]
    );
    assert_eq!(
        names,
        vec!["mControl", "mPayload", "mPayloadlength", "mPayloadbufferlength"]
    );
    assert_eq!(descriptor.physical[1].c_type, "uint8_t*");
    assert_eq!(descriptor.physical[3].name, "Payloadbufferlength");
    assert!(descriptor.physical.iter().skip(1).all(|p| p.source == 1));
}

#[test]
fn DescriptorBuilder___text_detection___is_exact() {
    let result = build("Msg_Param --member std::wstring payload");

    assert!(matches!(result, Err(SchemaError::Syntax { .. })));
}

#[test]
fn DescriptorBuilder___alias___resolves_to_scalar() {
    let mut config = CompilerConfig::default();
    config
        .aliases
        .insert("Addr_t".to_string(), "uint32_t".to_string());

    let descriptor = DescriptorBuilder::new(&config)
        .build(&interface(true, true), &loc(), "Msg_Route --member Addr_t target")
        .unwrap();

    assert_eq!(descriptor.fields[0].kind, FieldKind::Scalar(ScalarType::U32));
    assert_eq!(descriptor.fields[0].type_name, "Addr_t");
    assert_eq!(descriptor.physical[0].c_type, "uint32_t");
}

#[test_case("std::unique_ptr<uint32_t>", OwnedCore::Scalar(ScalarType::U32))]
#[test_case("std::unique_ptr<std::string>", OwnedCore::Text)]
#[test_case("std::unique_ptr<QuadGS::Tree>", OwnedCore::Opaque("QuadGS::Tree".into()))]
fn DescriptorBuilder___owned_value___resolves_core(type_name: &str, core: OwnedCore) {
    let text = format!("Msg_Tree --member {type_name} tree");

    let descriptor = build_for((true, false), &text).unwrap();

    assert_eq!(descriptor.fields[0].kind, FieldKind::OwnedValue(core));
    assert!(descriptor.physical.is_empty());
}

#[test]
fn DescriptorBuilder___owned_value_on_embedded___is_syntax_error() {
    let result = build("Msg_Tree --member std::unique_ptr<uint32_t> value");

    assert!(matches!(result, Err(SchemaError::Syntax { .. })));
}

#[test]
fn DescriptorBuilder___unknown_type___is_syntax_error() {
    let result = build("Msg_Param --member widget_t value");

    match result {
        Err(SchemaError::Syntax { message, .. }) => assert!(message.contains("widget_t")),
        other => panic!("expected syntax error, got {other:?}"),
    }
}

#[test]
fn DescriptorBuilder___duplicate_normalised_field___is_duplicate_name() {
    let result = build("Msg_Param --member uint8_t msgNr --member uint16_t msgnr");

    assert!(matches!(
        result,
        Err(SchemaError::DuplicateName {
            kind: NameKind::Field,
            ..
        })
    ));
}

#[test]
fn DescriptorBuilder___field_colliding_with_expansion___is_duplicate_name() {
    let result = build("Msg_Param --member uint32_t payloadLength --member std::string payload");

    assert!(matches!(result, Err(SchemaError::DuplicateName { .. })));
}

#[test]
fn DescriptorBuilder___expansion_collision_ignored_for_host_only() {
    let result = build_for(
        (true, false),
        "Msg_Param --member uint32_t payloadLength --member std::string payload",
    );

    assert!(result.is_ok());
}

#[test]
fn DescriptorBuilder___host_text_not_last___is_syntax_error() {
    let result = build_for(
        (true, false),
        "Msg_Log --member std::string name --member uint8_t level",
    );

    assert!(matches!(result, Err(SchemaError::Syntax { .. })));
}

#[test]
fn DescriptorBuilder___embedded_only_allows_text_anywhere() {
    let descriptor = build_for(
        (false, true),
        "Msg_Log --member std::string name --member std::string value --member uint8_t level",
    )
    .unwrap();

    assert_eq!(descriptor.text_fields().count(), 2);
    assert_eq!(descriptor.physical.len(), 7);
}

#[test]
fn DescriptorBuilder___invalid_identifiers___are_syntax_errors() {
    assert!(matches!(
        build("Msg-Param"),
        Err(SchemaError::Syntax { .. })
    ));
    assert!(matches!(
        build("Msg_Param --member uint8_t 2fast"),
        Err(SchemaError::Syntax { .. })
    ));
}

#[test]
fn DescriptorBuilder___internal_flag___is_recorded() {
    let descriptor = build("Msg_Tick --internal").unwrap();

    assert!(descriptor.internal);
    assert!(!descriptor.is_wire(msggen_core::Representation::Embedded));
}
