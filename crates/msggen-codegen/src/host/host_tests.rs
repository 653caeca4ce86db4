#![allow(non_snake_case)]

use super::*;
use msggen_core::Registry;
use msggen_schema::{CompilerContext, SchemaSource};

const SCHEMA: &str = "\
*GS_Ui
Msg_Display --member uint8_t level --member std::string text --include Display.h
Msg_Tree --member uint16_t depth --member std::unique_ptr<QuadGS::ParamTree> tree
Msg_Stop
Msg_Cache --member std::unique_ptr<uint32_t> hits --internal
*
";

fn registry() -> Registry {
    CompilerContext::default()
        .compile(&SchemaSource::new("messages.txt", SCHEMA), None)
        .unwrap()
}

fn emitter_output(name: &str) -> (String, String) {
    let registry = registry();
    let config = OutputConfig::default();
    let emitter = HostEmitter::new(&config);
    let message = registry.message(name).unwrap();
    (emitter.header(message), emitter.source(message))
}

#[test]
fn HostEmitter___emit___places_files_in_interface_directory() {
    let registry = registry();
    let config = OutputConfig::default();

    let artifacts = HostEmitter::new(&config).emit(registry.message("Msg_Display").unwrap());

    let paths: Vec<_> = artifacts.iter().map(|a| a.path.clone()).collect();
    assert_eq!(
        paths,
        vec![
            PathBuf::from("GS_Ui/Msg_Display.h"),
            PathBuf::from("GS_Ui/src/Msg_Display.cpp")
        ]
    );
    assert!(artifacts.iter().all(|a| a.representation == Representation::Host));
}

#[test]
fn HostEmitter___header___declares_constructor_with_all_fields() {
    let (header, _) = emitter_output("Msg_Display");

    assert!(header.contains("class Msg_Display: public QGS_ModuleMsgBase"));
    assert!(header.contains("\tMsg_Display(uint8_t level, std::string text);\n"));
    assert!(header.contains("\tMsg_Display(const Msg_Display& msg);\n"));
    assert!(header.contains("#include \"Display.h\"\n"));
    assert!(header.contains("#ifndef QUADGS_MSG_DISPLAY_H_"));
}

#[test]
fn HostEmitter___header___uses_title_cased_accessors() {
    let (header, _) = emitter_output("Msg_Display");

    assert!(header.contains("\tuint8_t getLevel() const;\n"));
    assert!(header.contains("\tvoid setText(const std::string text);\n"));
    assert!(header.contains("\tstd::string mText;\n"));
}

#[test]
fn HostEmitter___source___streams_fields_in_declaration_order() {
    let (_, source) = emitter_output("Msg_Display");

    let level = source.find("\tos << mLevel;").unwrap();
    let text = source.find("\tos << mText;").unwrap();
    assert!(level < text);
    assert!(source.contains("\tmText.erase();\n\tis >> mText;\n"));
}

#[test]
fn HostEmitter___owned_value___copy_constructor_deep_clones() {
    let (header, source) = emitter_output("Msg_Tree");

    assert!(header.contains("std::unique_ptr<QuadGS::ParamTree> getCloneTree() const;"));
    assert!(source.contains("\t, mTree(msg.getCloneTree())\n"));
    assert!(source.contains("\t, mTree(std::move(tree))\n"));
    assert!(source.contains("return std::make_unique<QuadGS::ParamTree>(*mTree);"));
    assert!(source.contains("\tos << *mTree;\n"));
    assert!(source.contains("\tis >> *mTree;\n"));
}

#[test]
fn HostEmitter___signal___has_empty_field_constructor() {
    let (header, source) = emitter_output("Msg_Stop");

    assert!(header.contains("\tMsg_Stop();\n"));
    assert!(!header.contains("protected:"));
    assert!(source.contains("\t: QGS_ModuleMsgBase(messageTypes_t::Msg_Stop_e)\n"));
}

#[test]
fn HostEmitter___namespace___follows_configuration() {
    let registry = registry();
    let config = OutputConfig {
        namespace: "Ground".to_string(),
        ..OutputConfig::default()
    };

    let header = HostEmitter::new(&config).header(registry.message("Msg_Stop").unwrap());

    assert!(header.contains("namespace Ground {"));
    assert!(header.contains("#ifndef GROUND_MSG_STOP_H_"));
}

#[test]
fn HostEmitter___internal___has_no_stream_operators() {
    let (header, source) = emitter_output("Msg_Cache");

    assert!(!header.contains("stream("));
    assert!(!source.contains("::stream("));
    assert!(source.contains("std::unique_ptr<uint32_t> Msg_Cache::getCloneHits() const"));
    assert!(source.ends_with("}\n\n} /* namespace QuadGS */\n"));
}

#[test]
fn HostEmitter___owned_scalar___pointee_from_resolved_core() {
    let (_, source) = emitter_output("Msg_Cache");

    assert!(source.contains("return std::make_unique<uint32_t>(*mHits);"));
}

#[test]
fn HostEmitter___owned_value_unset___streams_default_instead_of_null() {
    let (_, source) = emitter_output("Msg_Tree");

    assert!(source.contains(
        "\tif(mTree)\n\t{\n\t\tos << *mTree;\n\t}\n\telse\n\t{\n\t\tos << QuadGS::ParamTree();\n\t}\n"
    ));
    assert!(source.contains(
        "\tif(!mTree)\n\t{\n\t\tmTree = std::make_unique<QuadGS::ParamTree>();\n\t}\n\tis >> *mTree;\n"
    ));
}
